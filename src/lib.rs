//! Studio Assist — WhatsApp receptionist for a photography studio.

pub mod audit;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod flow;
pub mod llm;
pub mod routes;
pub mod state;
