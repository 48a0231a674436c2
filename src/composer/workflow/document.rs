// SPDX-License-Identifier: MIT

//! The workflow document handed to the command generator
//!
//! Key order is fixed by field order, so identical input always renders to
//! identical text.

use serde::{Deserialize, Serialize};

use super::graph::StepDescriptor;

/// Model hint used when the caller leaves it out
pub const DEFAULT_MODEL: &str = "default";

/// Caller-supplied metadata, opaque to the compiler
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_argument_hint: Option<String>,
}

impl WorkflowMetadata {
    /// Replace fields with any that are set in `overrides`
    pub fn merge(self, overrides: WorkflowMetadata) -> Self {
        Self {
            workflow_name: overrides.workflow_name.or(self.workflow_name),
            workflow_purpose: overrides.workflow_purpose.or(self.workflow_purpose),
            workflow_model: overrides.workflow_model.or(self.workflow_model),
            workflow_argument_hint: overrides
                .workflow_argument_hint
                .or(self.workflow_argument_hint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub workflow_name: String,
    pub workflow_purpose: String,
    pub workflow_model: String,
    pub workflow_argument_hint: String,
    pub workflow_steps: Vec<StepDescriptor>,
}

impl WorkflowDocument {
    pub fn new(metadata: &WorkflowMetadata, steps: Vec<StepDescriptor>) -> Self {
        Self {
            workflow_name: metadata.workflow_name.clone().unwrap_or_default(),
            workflow_purpose: metadata.workflow_purpose.clone().unwrap_or_default(),
            workflow_model: metadata
                .workflow_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            workflow_argument_hint: metadata.workflow_argument_hint.clone().unwrap_or_default(),
            workflow_steps: steps,
        }
    }

    /// Pretty-printed JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Merge metadata with compiled steps and render the JSON text
pub fn serialize(
    metadata: &WorkflowMetadata,
    steps: Vec<StepDescriptor>,
) -> Result<String, serde_json::Error> {
    WorkflowDocument::new(metadata, steps).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::workflow::graph::StepMode;

    fn step(title: &str, mode: StepMode, agents: &[&str]) -> StepDescriptor {
        StepDescriptor {
            title: title.to_string(),
            mode,
            purpose: String::new(),
            agents: agents.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_defaults_for_missing_metadata() {
        let doc = WorkflowDocument::new(&WorkflowMetadata::default(), vec![]);

        assert_eq!(doc.workflow_name, "");
        assert_eq!(doc.workflow_purpose, "");
        assert_eq!(doc.workflow_model, "default");
        assert_eq!(doc.workflow_argument_hint, "");
        assert!(doc.workflow_steps.is_empty());
    }

    #[test]
    fn test_serialize_exact_layout() {
        let metadata = WorkflowMetadata {
            workflow_name: Some("ship".to_string()),
            workflow_purpose: Some("Ship it".to_string()),
            workflow_model: None,
            workflow_argument_hint: Some("<branch>".to_string()),
        };
        let steps = vec![step("Checks", StepMode::Parallel, &["A", "B"])];

        let text = serialize(&metadata, steps).unwrap();
        let expected = r#"{
  "workflowName": "ship",
  "workflowPurpose": "Ship it",
  "workflowModel": "default",
  "workflowArgumentHint": "<branch>",
  "workflowSteps": [
    {
      "title": "Checks",
      "mode": "parallel",
      "purpose": "",
      "agents": [
        "A",
        "B"
      ]
    }
  ]
}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let metadata = WorkflowMetadata {
            workflow_name: Some("x".to_string()),
            ..Default::default()
        };
        let steps = vec![
            step("one", StepMode::Sequential, &["a"]),
            step("two", StepMode::Parallel, &["b", "c"]),
        ];

        let first = serialize(&metadata, steps.clone()).unwrap();
        let second = serialize(&metadata, steps).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = WorkflowMetadata {
            workflow_name: Some("base".to_string()),
            workflow_model: Some("haiku".to_string()),
            ..Default::default()
        };
        let overrides = WorkflowMetadata {
            workflow_model: Some("opus".to_string()),
            workflow_purpose: Some("p".to_string()),
            ..Default::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.workflow_name.as_deref(), Some("base"));
        assert_eq!(merged.workflow_model.as_deref(), Some("opus"));
        assert_eq!(merged.workflow_purpose.as_deref(), Some("p"));
        assert!(merged.workflow_argument_hint.is_none());
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = WorkflowDocument::new(
            &WorkflowMetadata::default(),
            vec![step("one", StepMode::Sequential, &["a"])],
        );
        let back: WorkflowDocument = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
