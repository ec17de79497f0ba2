use thiserror::Error;

use crate::token::EmitError;

/// Errors raised while turning a table description into a `RuleTable`.
///
/// These are fatal: a table that fails to build never runs. The cache keeps
/// the first failure, so it is `Clone`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("{language}: invalid pattern for rule #{index} in state `{state}`: {source}")]
    Pattern {
        language: &'static str,
        state: &'static str,
        index: usize,
        #[source]
        source: regex::Error,
    },
    #[error("{language}: rule #{index} in state `{state}` pushes unknown state `{target}`")]
    UnknownState { language: &'static str, state: &'static str, index: usize, target: &'static str },
    #[error("{language}: rule #{index} in state `{state}` uses group {group} but the pattern has {groups}")]
    Group { language: &'static str, state: &'static str, index: usize, group: usize, groups: usize },
    #[error("{language}: state `{state}` is declared twice")]
    DuplicateState { language: &'static str, state: &'static str },
    #[error("{language}: missing `{root}` state")]
    MissingRoot { language: &'static str, root: &'static str },
    #[error("unknown language `{0}`")]
    UnknownLanguage(String),
}

/// Errors raised during a scan.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("no rule matched at byte {offset} in state `{state}`")]
    Stall { offset: usize, state: &'static str },
    #[error("pop of the last state at byte {offset}")]
    PopRoot { offset: usize },
    #[error("delegation nested deeper than {limit} levels at byte {offset}")]
    DepthExceeded { limit: usize, offset: usize },
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
