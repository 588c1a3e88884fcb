use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Editorial action requested from the generation gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationAction {
    Summarize,
    FixGrammar,
    Expand,
    Title,
}

impl GenerationAction {
    pub const ALL: [GenerationAction; 4] = [
        GenerationAction::Summarize,
        GenerationAction::FixGrammar,
        GenerationAction::Expand,
        GenerationAction::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationAction::Summarize => "summarize",
            GenerationAction::FixGrammar => "fix_grammar",
            GenerationAction::Expand => "expand",
            GenerationAction::Title => "title",
        }
    }
}

impl fmt::Display for GenerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "action must be one of: summarize, fix_grammar, expand, title (got '{s}')"
                ))
            })
    }
}
