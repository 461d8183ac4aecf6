//! Transient in-process state store.
//!
//! Lost on restart and not shared across instances — acceptable for
//! single-instance deployments only. No per-client locking: two
//! near-simultaneous messages from one client can both read the same state
//! and double-send a stage, an accepted limitation at real chat cadence.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StateError;
use crate::flow::{Category, Stage};

use super::{ClientState, StateStore};

/// In-memory keyed store, process lifetime.
#[derive(Default)]
pub struct MemoryStore {
    clients: RwLock<HashMap<String, ClientState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, client_id: &str) -> ClientState {
        self.clients
            .read()
            .await
            .get(client_id)
            .cloned()
            .unwrap_or_else(|| ClientState::new(client_id))
    }

    async fn mark_stage_complete(&self, client_id: &str, stage: Stage) -> Result<(), StateError> {
        let mut clients = self.clients.write().await;
        let state = clients
            .entry(client_id.to_string())
            .or_insert_with(|| ClientState::new(client_id));
        state.completed.insert(stage);
        Ok(())
    }

    async fn set_name_if_absent(&self, client_id: &str, name: &str) -> Result<(), StateError> {
        if name.trim().is_empty() {
            return Ok(());
        }
        let mut clients = self.clients.write().await;
        let state = clients
            .entry(client_id.to_string())
            .or_insert_with(|| ClientState::new(client_id));
        if state.display_name.is_none() {
            state.display_name = Some(name.trim().to_string());
        }
        Ok(())
    }

    async fn set_category_if_absent(
        &self,
        client_id: &str,
        category: Category,
    ) -> Result<(), StateError> {
        let mut clients = self.clients.write().await;
        let state = clients
            .entry(client_id.to_string())
            .or_insert_with(|| ClientState::new(client_id));
        if state.category.is_none() {
            state.category = Some(category);
        }
        Ok(())
    }
}
