//! `beni` turns source text into a stream of classified tokens using
//! declarative, per-language regex tables.
//!
//! A language is a [`RuleTable`]: named states, each an ordered list of
//! anchored patterns with a [`Behavior`]. The [`Lexer`] walks the input with
//! a cursor and a stack of states, committing to the first rule that matches
//! at the cursor. Rules may hand a captured substring to a nested lexer run
//! (of the same or another language); the nested tokens are streamed into the
//! same [`Emitter`] before the rule's own remaining tokens.
//!
//! ```
//! use beni::{Token, TokenKind, tokenize};
//!
//! let tokens = tokenize("java", "class Foo {").unwrap();
//! assert_eq!(tokens[2], Token::new(TokenKind::NameClass, "Foo"));
//! ```

#[macro_use]
mod macros;
mod api;
pub mod engine;
mod error;
pub mod languages;
mod token;

pub use api::{Options, StallPolicy, tokenize, tokenize_reader, tokenize_with};
pub use engine::{Action, Behavior, Lexer, RuleSpec, RuleTable, RunMetrics, Target};
pub use error::{BuildError, LexError};
pub use languages::{LanguageDef, Registry};
pub use token::{EmitError, Emitter, FnEmitter, Token, TokenKind};
