// SPDX-License-Identifier: MIT

//! composer-rs compiles agent workflow graphs into ordered step documents
//!
//! A workflow is drawn as a directed graph of Start, End, agent and
//! step-group nodes. The compiler validates the graph's structure and turns
//! it into the JSON document consumed by the command generator.

pub mod composer;
pub mod error;

pub use error::{ComposerError, WorkflowError};
