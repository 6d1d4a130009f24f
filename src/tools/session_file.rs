//! Parameters shared by the `export_session` and `import_session` tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionFileParams {
    #[schemars(description = "Path of the session JSON file")]
    pub file_path: String,
}
