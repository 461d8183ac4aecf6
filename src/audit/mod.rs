//! Append-only lead audit log in Google Sheets.
//!
//! One row per handled interaction, fixed schema:
//! `(timestampISO8601, clientId, displayName, inboundText, stageCompleted)`.
//! The explicit stage column is what lets the sheet-backed state store
//! reconstruct a conversation without guessing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::error::AuditError;
use crate::flow::Stage;

/// Appends are retried because the row is idempotent in practice (a rare
/// duplicate is harmless in a lead sheet, a missing row is not).
const APPEND_ATTEMPTS: u32 = 3;
const APPEND_BACKOFF: Duration = Duration::from_millis(500);

/// One audit row.
#[derive(Debug, Clone)]
pub struct LeadRecord {
    pub timestamp: DateTime<Utc>,
    pub client_id: String,
    pub display_name: Option<String>,
    pub inbound_text: String,
    pub stage_completed: Stage,
}

impl LeadRecord {
    /// Cells in the persisted column order.
    pub fn cells(&self) -> [String; 5] {
        [
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.client_id.clone(),
            self.display_name.clone().unwrap_or_default(),
            self.inbound_text.clone(),
            self.stage_completed.to_string(),
        ]
    }
}

/// Records one audit row per interaction.
#[async_trait]
pub trait LeadRecorder: Send + Sync {
    async fn append(&self, record: &LeadRecord) -> Result<(), AuditError>;
}

/// Google Sheets `values:append` client.
pub struct SheetsRecorder {
    client: reqwest::Client,
    spreadsheet_id: String,
    tab: String,
    access_token: SecretString,
}

impl SheetsRecorder {
    pub fn new(
        client: reqwest::Client,
        spreadsheet_id: String,
        tab: String,
        access_token: SecretString,
    ) -> Self {
        Self {
            client,
            spreadsheet_id,
            tab,
            access_token,
        }
    }

    fn append_url(&self) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}!A:E:append?valueInputOption=RAW",
            self.spreadsheet_id, self.tab
        )
    }

    async fn append_once(&self, record: &LeadRecord) -> Result<(), AuditError> {
        let body = serde_json::json!({ "values": [record.cells()] });

        let resp = self
            .client
            .post(self.append_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuditError::AppendFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuditError::Rejected { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl LeadRecorder for SheetsRecorder {
    async fn append(&self, record: &LeadRecord) -> Result<(), AuditError> {
        let mut last = None;
        for attempt in 1..=APPEND_ATTEMPTS {
            match self.append_once(record).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        client_id = %record.client_id,
                        attempt,
                        error = %e,
                        "Audit append failed"
                    );
                    last = Some(e);
                    if attempt < APPEND_ATTEMPTS {
                        // Doubling backoff: 500ms, 1s.
                        tokio::time::sleep(APPEND_BACKOFF * 2u32.pow(attempt - 1)).await;
                    }
                }
            }
        }
        Err(AuditError::RetriesExhausted {
            attempts: APPEND_ATTEMPTS,
            last: last.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> LeadRecord {
        LeadRecord {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap(),
            client_id: "whatsapp:+1555".to_string(),
            display_name: Some("Carla".to_string()),
            inbound_text: "oi".to_string(),
            stage_completed: Stage::Greeting,
        }
    }

    #[test]
    fn cells_follow_schema_order() {
        let cells = record().cells();
        assert_eq!(cells[0], "2026-08-23T12:00:00Z");
        assert_eq!(cells[1], "whatsapp:+1555");
        assert_eq!(cells[2], "Carla");
        assert_eq!(cells[3], "oi");
        assert_eq!(cells[4], "greeting");
    }

    #[test]
    fn missing_name_becomes_empty_cell() {
        let mut r = record();
        r.display_name = None;
        assert_eq!(r.cells()[2], "");
    }

    #[test]
    fn append_url_targets_the_configured_tab() {
        let recorder = SheetsRecorder::new(
            reqwest::Client::new(),
            "sheet-1".to_string(),
            "Leads".to_string(),
            SecretString::from("token"),
        );
        assert_eq!(
            recorder.append_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/Leads!A:E:append?valueInputOption=RAW"
        );
    }
}
