//! Orchestration: one inbound message in, at most one staged reply out.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::audit::{LeadRecord, LeadRecorder};
use crate::dispatch::Dispatcher;
use crate::flow::{self, Category, Stage};
use crate::llm::{GenerationRequest, ResponseGenerator};
use crate::state::StateStore;

/// An inbound webhook message. Ephemeral, never persisted as-is.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub text: String,
    pub sender_id: String,
    pub sender_display_name: Option<String>,
}

/// What handling one message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty/whitespace text: acknowledged, nothing done.
    Ignored,
    /// All stages already complete: acknowledged, silence.
    FlowComplete,
    /// A reply for `stage` was dispatched and the stage marked complete.
    Responded { stage: Stage },
    /// A downstream call failed; logged, request still acknowledged.
    Failed { stage: Stage, reason: String },
}

/// Wires the state store, stage selector, generator, dispatcher, and
/// recorder into the webhook sequence.
pub struct Engine {
    store: Arc<dyn StateStore>,
    generator: Arc<dyn ResponseGenerator>,
    dispatcher: Arc<dyn Dispatcher>,
    recorder: Arc<dyn LeadRecorder>,
    /// Humanizing delay range before dispatch, milliseconds. `(0, 0)` in tests.
    reply_delay_ms: (u64, u64),
}

impl Engine {
    pub fn new(
        store: Arc<dyn StateStore>,
        generator: Arc<dyn ResponseGenerator>,
        dispatcher: Arc<dyn Dispatcher>,
        recorder: Arc<dyn LeadRecorder>,
        reply_delay_ms: (u64, u64),
    ) -> Self {
        Self {
            store,
            generator,
            dispatcher,
            recorder,
            reply_delay_ms,
        }
    }

    /// Handle one inbound message end to end.
    ///
    /// Sequence: load state → set name/category if absent → select the next
    /// stage → generate → pacing delay → dispatch → mark the one stage
    /// complete → append the audit row. Partial failures after a successful
    /// dispatch are logged only; the stage stays marked and the caller still
    /// acknowledges.
    pub async fn handle(&self, msg: InboundMessage) -> Outcome {
        let text = msg.text.trim();
        if text.is_empty() {
            tracing::debug!(client_id = %msg.sender_id, "Ignoring empty message");
            return Outcome::Ignored;
        }

        let mut state = self.store.get(&msg.sender_id).await;

        // Name: channel profile wins, then a self-declaration in the text.
        // First non-empty value sticks.
        if state.display_name.is_none() {
            let candidate = msg
                .sender_display_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .or_else(|| flow::extract_name(text));
            if let Some(name) = candidate {
                if let Err(e) = self.store.set_name_if_absent(&msg.sender_id, &name).await {
                    tracing::warn!(client_id = %msg.sender_id, error = %e, "Could not persist name");
                }
                state.display_name = Some(name);
            }
        }

        // Reclassify while undecided; a determined category is first-write-
        // wins. Unknown is kept in-request (the showcase stage asks the
        // client) but never claims the persisted slot, so a later
        // self-declaration can still settle it.
        if state.category.is_none() || state.category == Some(Category::Unknown) {
            let category = flow::classify(state.display_name.as_deref(), text);
            if category != Category::Unknown {
                if let Err(e) = self
                    .store
                    .set_category_if_absent(&msg.sender_id, category)
                    .await
                {
                    tracing::warn!(client_id = %msg.sender_id, error = %e, "Could not persist category");
                }
            }
            state.category = Some(category);
        }

        let Some((stage, instruction)) = flow::next_stage(&state) else {
            tracing::info!(client_id = %msg.sender_id, "Flow already complete, staying silent");
            return Outcome::FlowComplete;
        };

        tracing::info!(client_id = %msg.sender_id, %stage, "Handling inbound message");

        let reply = match self
            .generator
            .generate(GenerationRequest {
                instruction,
                client_name: state.display_name.clone(),
                inbound_text: text.to_string(),
            })
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(client_id = %msg.sender_id, %stage, error = %e, "Generation failed");
                return Outcome::Failed {
                    stage,
                    reason: e.to_string(),
                };
            }
        };

        self.pacing_delay().await;

        if let Err(e) = self.dispatcher.send(&msg.sender_id, &reply).await {
            tracing::error!(client_id = %msg.sender_id, %stage, error = %e, "Dispatch failed");
            // The stage is not marked: the client never saw the reply.
            return Outcome::Failed {
                stage,
                reason: e.to_string(),
            };
        }

        if let Err(e) = self.store.mark_stage_complete(&msg.sender_id, stage).await {
            tracing::error!(client_id = %msg.sender_id, %stage, error = %e, "Could not mark stage complete");
        }

        let record = LeadRecord {
            timestamp: Utc::now(),
            client_id: msg.sender_id.clone(),
            display_name: state.display_name.clone(),
            inbound_text: text.to_string(),
            stage_completed: stage,
        };
        if let Err(e) = self.recorder.append(&record).await {
            tracing::error!(client_id = %msg.sender_id, %stage, error = %e, "Audit append failed");
        }

        Outcome::Responded { stage }
    }

    /// Sleep a jittered interval so replies read as human-paced.
    async fn pacing_delay(&self) {
        let (min, max) = self.reply_delay_ms;
        if max == 0 {
            return;
        }
        let millis = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
    }
}
