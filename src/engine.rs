//! Tokenizing engine.
//!
//! The engine is language-agnostic; languages plug in as [`RuleTable`]s.
//!
//! ## How the parts work together
//!
//! ```text
//! TableBuilder ── build ──> RuleTable        (table.rs)
//!                   │         states -> ordered rules (anchored regex + behavior)
//!                   │
//! TableCache::get_or_build                   (cache.rs)
//!                   │         once per language, shared as Arc<RuleTable>
//!                   v
//! Lexer::run(input, emitter)                 (lexer.rs)
//!     loop step():
//!       - top of StateStack selects the rule set
//!       - first rule matching at the cursor wins
//!       - Behavior::apply                    (behavior.rs)
//!           emit / push / pop / delegate -> child Lexer over a substring
//!       - cursor += match length
//! ```
//!
//! ## Responsibilities by module
//!
//! - `table.rs`: descriptors, pattern flags, the builder and compiled table.
//! - `behavior.rs`: the behavior/action data types and how they execute.
//! - `lexer.rs`: cursor/stack driving, stall policy, delegation.
//! - `cache.rs`: thread-safe once-per-key table memoization.
//! - `metrics.rs`: counters and timing for a run.
//!
//! ## Debugging
//!
//! Set `Options::trace` and run with `RUST_LOG=beni=trace` to log every rule
//! selection.

#[path = "engine/behavior.rs"]
mod behavior;
#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/lexer.rs"]
mod lexer;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/table.rs"]
mod table;
#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use behavior::{Action, Behavior, Target};
pub use cache::TableCache;
pub use lexer::{Context, Lexer, Scan, StateStack};
pub use metrics::RunMetrics;
pub use table::{
    LanguageDescriptor, PatternFlags, ROOT, Rule, RuleSpec, RuleTable, State, StateId, TableBuilder, words,
};
