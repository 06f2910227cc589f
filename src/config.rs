//! Parser configuration
//!
//! Field and variant names are camelCase on the wire, so a host can load a
//! configuration like `{"emitTrivia": true, "tieBreak": "longestParse"}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which success `alternative` keeps when several branches match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    /// The first branch that succeeds wins; later branches are not tried.
    #[default]
    FirstMatch,
    /// Every branch is tried; the one that consumed the most tokens wins.
    LongestParse,
}

/// Which failure `alternative` reports when every branch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureSelection {
    /// The failure that got furthest, with abandoned attempts tracked.
    #[default]
    Furthest,
    /// The first branch's failure. Abandoned attempts are not tracked.
    First,
}

/// What `TokenStream::advance` does at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvancePolicy {
    #[default]
    Saturate,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseConfig {
    pub emit_trivia: bool,
    pub lookahead_depth: usize,
    pub max_depth: Option<usize>,
    pub tie_break: TieBreak,
    pub failure_selection: FailureSelection,
    pub advance_past_end: AdvancePolicy,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            emit_trivia: false,
            lookahead_depth: 1,
            max_depth: None,
            tie_break: TieBreak::default(),
            failure_selection: FailureSelection::default(),
            advance_past_end: AdvancePolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lookaheadDepth must be at least 1")]
    ZeroLookahead,
}

impl ParseConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ParseConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead_depth == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        Ok(())
    }

    pub fn with_emit_trivia(self, emit_trivia: bool) -> Self {
        Self {
            emit_trivia,
            ..self
        }
    }

    pub fn with_lookahead_depth(self, lookahead_depth: usize) -> Self {
        Self {
            lookahead_depth,
            ..self
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..self
        }
    }

    pub fn with_tie_break(self, tie_break: TieBreak) -> Self {
        Self { tie_break, ..self }
    }

    pub fn with_failure_selection(self, failure_selection: FailureSelection) -> Self {
        Self {
            failure_selection,
            ..self
        }
    }

    pub fn with_advance_past_end(self, advance_past_end: AdvancePolicy) -> Self {
        Self {
            advance_past_end,
            ..self
        }
    }
}
