//! Per-client conversation state and the store that holds it.

pub mod memory;
pub mod sheet;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::StateError;
use crate::flow::{Category, Stage};

pub use memory::MemoryStore;
pub use sheet::SheetStore;

/// Conversation state for one client channel identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    /// Stable channel address, e.g. `whatsapp:+5511999999999`.
    pub client_id: String,
    /// Human name, set once and never overwritten.
    pub display_name: Option<String>,
    /// Audience segment. `Some(Category::Unknown)` means classification ran
    /// and could not decide; `None` means it has not run yet.
    pub category: Option<Category>,
    /// Stages already satisfied. Grows monotonically.
    pub completed: BTreeSet<Stage>,
}

impl ClientState {
    /// Ground-zero state for a previously unseen client.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            display_name: None,
            category: None,
            completed: BTreeSet::new(),
        }
    }
}

/// Keyed store of [`ClientState`], one of two backends.
///
/// `get` must never fail the request: a backend that cannot be reached
/// degrades to the ground-zero state (the conversation restarts) instead of
/// erroring out.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current state for a client, default state if unseen or unreachable.
    async fn get(&self, client_id: &str) -> ClientState;

    /// Record one more satisfied stage. Idempotent.
    async fn mark_stage_complete(&self, client_id: &str, stage: Stage) -> Result<(), StateError>;

    /// Set the display name unless one is already present.
    async fn set_name_if_absent(&self, client_id: &str, name: &str) -> Result<(), StateError>;

    /// Set the category unless one is already present.
    async fn set_category_if_absent(
        &self,
        client_id: &str,
        category: Category,
    ) -> Result<(), StateError>;
}
