use std::io::Read;

use crate::engine::{Lexer, RunMetrics};
use crate::error::LexError;
use crate::languages::Registry;
use crate::token::{Emitter, Token};

/// What to do when no rule of the active state matches at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StallPolicy {
    /// Abort the run with [`LexError::Stall`].
    #[default]
    Strict,
    /// Emit the next character as a `TokenKind::Error` token and carry on.
    Lenient,
}

/// Options that affect a scan.
#[derive(Debug, Clone)]
pub struct Options {
    pub stall: StallPolicy,
    /// Maximum delegation nesting; a top-level run is depth 0.
    pub max_depth: usize,
    /// Log every rule selection at `trace` level. Never changes the output.
    pub trace: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { stall: StallPolicy::Strict, max_depth: 32, trace: false }
    }
}

/// Tokenize `input` as `language` (name or alias) with default options.
///
/// # Example
/// ```
/// use beni::{TokenKind, tokenize};
///
/// let tokens = tokenize("java", "int x;").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::KeywordType);
/// assert_eq!(tokens.iter().map(|t| t.text.as_str()).collect::<String>(), "int x;");
/// ```
pub fn tokenize(language: &str, input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    tokenize_with(language, input, &Options::default(), &mut tokens)?;
    Ok(tokens)
}

/// Tokenize `input` into `emitter` using the built-in registry.
pub fn tokenize_with(
    language: &str,
    input: &str,
    options: &Options,
    emitter: &mut dyn Emitter,
) -> Result<RunMetrics, LexError> {
    let registry = Registry::global();
    let table = registry.table(language)?;
    Lexer::new(&table, registry, options).run_with_metrics(input, emitter)
}

/// Read all of `reader` as UTF-8 and tokenize it.
pub fn tokenize_reader<R: Read>(
    language: &str,
    mut reader: R,
    options: &Options,
    emitter: &mut dyn Emitter,
) -> Result<RunMetrics, LexError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    tokenize_with(language, &input, options, emitter)
}
