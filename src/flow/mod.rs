//! Conversation flow: the fixed stage progression and the heuristics that
//! feed it.

pub mod classify;
pub mod prompts;
pub mod selector;
pub mod stage;

pub use classify::{Category, classify, extract_name};
pub use selector::next_stage;
pub use stage::Stage;
