//! Conversation stages — the fixed linear progression every lead walks.
//!
//! Progresses linearly: Greeting → Qualify → Showcase → Schedule → Close.
//! A stage is eligible only once every stage before it is complete; once all
//! five are complete the conversation goes silent.

use serde::{Deserialize, Serialize};

/// One discrete step in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greeting,
    Qualify,
    Showcase,
    Schedule,
    Close,
}

impl Stage {
    /// All stages, in conversation order.
    pub const ORDER: [Stage; 5] = [
        Stage::Greeting,
        Stage::Qualify,
        Stage::Showcase,
        Stage::Schedule,
        Stage::Close,
    ];

    /// The stage after this one, if any.
    pub fn next(&self) -> Option<Stage> {
        let idx = Stage::ORDER.iter().position(|s| s == self)?;
        Stage::ORDER.get(idx + 1).copied()
    }

    /// Parse the persisted identifier written to the audit log.
    pub fn parse(s: &str) -> Option<Stage> {
        match s {
            "greeting" => Some(Stage::Greeting),
            "qualify" => Some(Stage::Qualify),
            "showcase" => Some(Stage::Showcase),
            "schedule" => Some(Stage::Schedule),
            "close" => Some(Stage::Close),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Greeting => "greeting",
            Stage::Qualify => "qualify",
            Stage::Showcase => "showcase",
            Stage::Schedule => "schedule",
            Stage::Close => "close",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_all_stages() {
        let expected = [Stage::Qualify, Stage::Showcase, Stage::Schedule, Stage::Close];
        let mut current = Stage::Greeting;
        for expected_next in expected {
            let next = current.next().unwrap();
            assert_eq!(next, expected_next);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for stage in Stage::ORDER {
            assert_eq!(Stage::parse(&stage.to_string()), Some(stage));
        }
        assert_eq!(Stage::parse("retarget"), None);
    }

    #[test]
    fn order_is_total() {
        for pair in Stage::ORDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
