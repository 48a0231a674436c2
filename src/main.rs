use clap::{Parser, Subcommand};
use composer_rs::composer::config::ComposerConfig;
use composer_rs::composer::server;
use composer_rs::composer::workflow::builder::Builder;
use composer_rs::composer::workflow::document::{WorkflowDocument, WorkflowMetadata};
use composer_rs::composer::workflow::loader::WorkflowLoader;
use dotenv::dotenv;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a workflow graph for structural problems
    Validate {
        /// Path to the graph file (.json or .yaml)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Compile a workflow graph into a workflow document
    Compile {
        /// Path to the graph file (.json or .yaml)
        #[arg(short, long)]
        file: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Workflow name
        #[arg(long)]
        name: Option<String>,

        /// Workflow purpose
        #[arg(long)]
        purpose: Option<String>,

        /// Model hint for the generated command
        #[arg(long)]
        model: Option<String>,

        /// Argument hint for the generated command
        #[arg(long)]
        argument_hint: Option<String>,
    },
    /// Compile a wizard plan (ordered list of steps)
    Plan {
        /// Path to the plan file (.json or .yaml)
        #[arg(short, long)]
        file: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the editor API
    Serve {
        /// Port to listen on (overrides COMPOSER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let builder = Builder::new();

    match args.command {
        Commands::Validate { file } => {
            let doc = WorkflowLoader::new().load_graph(&file)?;
            let report = builder.validate(&doc.graph);

            if report.is_valid {
                println!("{}: valid", file.display());
            } else {
                for message in report.messages() {
                    println!("error: {}", message);
                }
                std::process::exit(1);
            }
        }
        Commands::Compile {
            file,
            output,
            name,
            purpose,
            model,
            argument_hint,
        } => {
            let overrides = WorkflowMetadata {
                workflow_name: name,
                workflow_purpose: purpose,
                workflow_model: model,
                workflow_argument_hint: argument_hint,
            };

            match builder.compile_file(&file, overrides) {
                Ok(document) => emit(&document, output)?,
                Err(e) => {
                    if let Some(report) = e.validation_report() {
                        for message in report.messages() {
                            eprintln!("error: {}", message);
                        }
                        std::process::exit(1);
                    }
                    return Err(e.into());
                }
            }
        }
        Commands::Plan { file, output } => {
            let document = builder.compile_plan_file(&file)?;
            emit(&document, output)?;
        }
        Commands::Serve { port } => {
            let mut config = ComposerConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(config).await?;
        }
    }

    Ok(())
}

fn emit(
    document: &WorkflowDocument,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let text = document.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, text)?;
            log::info!("Wrote workflow document to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
