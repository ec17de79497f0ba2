//! Run metrics.
//!
//! Counters are collected for every run (they are a handful of integer adds
//! per step); timing is only taken by [`Lexer::run_with_metrics`].
//!
//! Child runs started by delegation fold their counters into the parent, so
//! the metrics of a top-level run describe the whole token stream.
//!
//! [`Lexer::run_with_metrics`]: super::Lexer::run_with_metrics

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunMetrics {
    /// Rule selections attempted, including stalls handled leniently.
    pub steps: usize,
    /// Tokens handed to the emitter.
    pub tokens: usize,
    /// Nested runs started.
    pub delegations: usize,
    /// Error tokens emitted by the lenient stall policy.
    pub fallbacks: usize,
    /// Deepest delegation level reached (0 when nothing was delegated).
    pub max_depth: usize,
    /// Wall-clock time of the top-level run.
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Fold a finished child run at nesting level `depth` into these metrics.
    pub(crate) fn absorb(&mut self, child: &RunMetrics, depth: usize) {
        self.steps += child.steps;
        self.tokens += child.tokens;
        self.delegations += child.delegations + 1;
        self.fallbacks += child.fallbacks;
        self.max_depth = self.max_depth.max(depth).max(child.max_depth);
    }
}
