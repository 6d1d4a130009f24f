//! MCP `process_thought` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::thinking::ThoughtFields;

/// Parameters for the `process_thought` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessThoughtParams {
    #[schemars(description = "The content of the thought")]
    pub thought: String,

    #[schemars(description = "The sequence number of this thought")]
    pub thought_number: i64,

    #[schemars(description = "The total expected thoughts in the sequence")]
    pub total_thoughts: i64,

    #[schemars(description = "Whether more thoughts are needed after this one")]
    pub next_thought_needed: bool,

    #[schemars(
        description = "The thinking stage: 'Problem Definition', 'Research', 'Analysis', 'Synthesis' or 'Conclusion' (case-insensitive)"
    )]
    pub stage: String,

    #[schemars(description = "Optional keywords or categories for the thought")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Optional list of principles or axioms used in this thought")]
    pub axioms_used: Option<Vec<String>>,

    #[schemars(description = "Optional list of assumptions challenged by this thought")]
    pub assumptions_challenged: Option<Vec<String>>,
}

impl From<ProcessThoughtParams> for ThoughtFields {
    fn from(params: ProcessThoughtParams) -> Self {
        Self {
            text: params.thought,
            sequence_number: params.thought_number,
            total_sequence_length: params.total_thoughts,
            continuation: params.next_thought_needed,
            stage: params.stage,
            tags: params.tags.unwrap_or_default(),
            principles_applied: params.axioms_used.unwrap_or_default(),
            assumptions_challenged: params.assumptions_challenged.unwrap_or_default(),
            created_at: None,
            id: None,
        }
    }
}
