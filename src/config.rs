//! Configuration, loaded from the environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Which backend holds per-client conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateBackend {
    /// In-process map, lost on restart. Single-instance deployments only.
    #[default]
    Memory,
    /// Reconstructed from the last audit row in the lead spreadsheet.
    Sheet,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Twilio account SID.
    pub twilio_account_sid: String,
    /// Twilio auth token.
    pub twilio_auth_token: SecretString,
    /// Sender number, E.164 without the `whatsapp:` prefix.
    pub twilio_phone_number: String,
    /// OpenAI API key.
    pub openai_api_key: SecretString,
    /// OpenAI chat model.
    pub openai_model: String,
    /// Lead spreadsheet ID.
    pub sheets_spreadsheet_id: String,
    /// Bearer token for the Sheets API (injected by the deployment).
    pub sheets_access_token: SecretString,
    /// Tab name within the spreadsheet.
    pub sheets_tab: String,
    /// State store backend.
    pub state_backend: StateBackend,
    /// HTTP listen port.
    pub port: u16,
    /// Humanizing delay range before dispatch, milliseconds.
    pub reply_delay_ms: (u64, u64),
    /// Timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let reply_delay_min = parse_or("REPLY_DELAY_MS_MIN", 1500u64)?;
        let reply_delay_max = parse_or("REPLY_DELAY_MS_MAX", 3000u64)?;
        if reply_delay_min > reply_delay_max {
            return Err(ConfigError::InvalidValue {
                key: "REPLY_DELAY_MS_MIN".to_string(),
                message: format!(
                    "minimum delay {reply_delay_min}ms exceeds maximum {reply_delay_max}ms"
                ),
            });
        }

        Ok(Self {
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: SecretString::from(required("TWILIO_AUTH_TOKEN")?),
            twilio_phone_number: required("TWILIO_PHONE_NUMBER")?,
            openai_api_key: SecretString::from(required("OPENAI_API_KEY")?),
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            sheets_spreadsheet_id: required("SHEETS_SPREADSHEET_ID")?,
            sheets_access_token: SecretString::from(required("SHEETS_ACCESS_TOKEN")?),
            sheets_tab: optional("SHEETS_TAB").unwrap_or_else(|| "Leads".to_string()),
            state_backend: parse_backend(optional("STATE_BACKEND").as_deref())?,
            port: parse_or("PORT", 3000u16)?,
            reply_delay_ms: (reply_delay_min, reply_delay_max),
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 10u64)?),
        })
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match optional(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_backend(raw: Option<&str>) -> Result<StateBackend, ConfigError> {
    match raw {
        None => Ok(StateBackend::default()),
        Some("memory") => Ok(StateBackend::Memory),
        Some("sheet") => Ok(StateBackend::Sheet),
        Some(other) => Err(ConfigError::InvalidValue {
            key: "STATE_BACKEND".to_string(),
            message: format!("expected \"memory\" or \"sheet\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_known_values() {
        assert_eq!(parse_backend(None).unwrap(), StateBackend::Memory);
        assert_eq!(parse_backend(Some("memory")).unwrap(), StateBackend::Memory);
        assert_eq!(parse_backend(Some("sheet")).unwrap(), StateBackend::Sheet);
    }

    #[test]
    fn backend_rejects_unknown_value() {
        assert!(parse_backend(Some("redis")).is_err());
    }
}
