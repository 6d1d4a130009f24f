pub mod analysis;
pub mod lock;
pub mod store;
pub mod summary;
pub mod types;

pub use analysis::{analyze, find_related, is_first_in_stage, ThoughtAnalysis};
pub use store::ThoughtStore;
pub use summary::{summarize, SummaryResponse};
pub use types::{Thought, ThoughtFields, ThoughtStage};
