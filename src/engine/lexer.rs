//! The execution engine.
//!
//! A [`Lexer`] binds one compiled [`RuleTable`] to a registry (for named
//! delegation) and [`Options`]. Each call to [`Lexer::run`] owns its own
//! [`Scan`]: a cursor into the input and a [`StateStack`].
//!
//! One step:
//!
//! ```text
//! tail = input[cursor..]
//! for rule in table[stack.top()]:          (declaration order)
//!     if rule matches at the start of tail with length > 0:
//!         rule.behavior(captures, Context)  (emit / delegate / push / pop)
//!         cursor += match length
//!         return
//! stall -> StallPolicy
//! ```
//!
//! Delegation runs a brand-new `Lexer` over the captured substring, to
//! completion, before the delegating behavior continues. The child writes to
//! the same emitter, so tokens come out in source order. Nesting is bounded by
//! `Options::max_depth`.
//!
//! Offsets in errors are absolute byte offsets into the outermost input, even
//! when raised inside a child run.

use std::time::Instant;

use log::{debug, trace, warn};

use super::behavior::Target;
use super::metrics::RunMetrics;
use super::table::{RuleTable, StateId};
use crate::api::{Options, StallPolicy};
use crate::error::LexError;
use crate::languages::Registry;
use crate::token::{Emitter, TokenKind};

/// Non-empty stack of active states. The top selects the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStack(Vec<StateId>);

impl StateStack {
    pub fn new(root: StateId) -> Self {
        StateStack(vec![root])
    }

    pub fn top(&self) -> StateId {
        // Never empty: `pop` refuses to remove the last entry.
        self.0[self.0.len() - 1]
    }

    pub fn push(&mut self, state: StateId) {
        self.0.push(state);
    }

    /// Remove the top entry. Returns `None`, leaving the stack untouched, when
    /// only one entry remains.
    pub fn pop(&mut self) -> Option<StateId> {
        if self.0.len() > 1 { self.0.pop() } else { None }
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Per-run state: the input, a cursor into it and the state stack.
#[derive(Debug)]
pub struct Scan<'i> {
    input: &'i str,
    cursor: usize,
    stack: StateStack,
    metrics: RunMetrics,
}

impl<'i> Scan<'i> {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.input.len()
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}

/// A lexer instance bound to one rule table.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    table: &'a RuleTable,
    registry: &'a Registry,
    options: &'a Options,
    /// Nesting level: 0 for a top-level run.
    depth: usize,
    /// Absolute offset of this run's input within the outermost input.
    base: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(table: &'a RuleTable, registry: &'a Registry, options: &'a Options) -> Self {
        Lexer { table, registry, options, depth: 0, base: 0 }
    }

    /// Start a scan of `input` at the root state.
    pub fn scan<'i>(&self, input: &'i str) -> Scan<'i> {
        Scan { input, cursor: 0, stack: StateStack::new(self.table.root()), metrics: RunMetrics::default() }
    }

    /// Tokenize `input` into `emitter`.
    pub fn run(&self, input: &str, emitter: &mut dyn Emitter) -> Result<(), LexError> {
        self.run_with_metrics(input, emitter).map(|_| ())
    }

    /// Same as [`Lexer::run`], also returning counters for the run (children
    /// included).
    pub fn run_with_metrics(&self, input: &str, emitter: &mut dyn Emitter) -> Result<RunMetrics, LexError> {
        let start = Instant::now();
        let mut scan = self.scan(input);
        self.drive(&mut scan, emitter)?;
        let mut metrics = scan.metrics;
        metrics.elapsed = start.elapsed();
        Ok(metrics)
    }

    /// Step until the end of the scan's input or the first error.
    pub fn drive(&self, scan: &mut Scan<'_>, emitter: &mut dyn Emitter) -> Result<(), LexError> {
        while !scan.is_done() {
            self.step(scan, emitter)?;
        }
        Ok(())
    }

    /// Apply exactly one rule (or the stall policy) at the scan's cursor.
    pub fn step(&self, scan: &mut Scan<'_>, emitter: &mut dyn Emitter) -> Result<(), LexError> {
        let input = scan.input;
        let tail = &input[scan.cursor..];
        let origin = self.base + scan.cursor;
        let state = self.table.state(scan.stack.top());
        scan.metrics.steps += 1;

        let selected = state.rules().iter().enumerate().find_map(|(index, rule)| {
            rule.pattern().captures(tail).filter(|caps| !caps[0].is_empty()).map(|caps| (index, rule, caps))
        });

        let Some((index, rule, caps)) = selected else {
            return match self.options.stall {
                StallPolicy::Strict => Err(LexError::Stall { offset: origin, state: state.name() }),
                StallPolicy::Lenient => {
                    let len = tail.chars().next().map_or(1, char::len_utf8);
                    let skipped = &tail[..len];
                    warn!("{}: no rule matched at byte {origin} in `{}`, skipping {skipped:?}", self.name(), state.name());
                    emitter.emit(TokenKind::Error, skipped)?;
                    scan.metrics.tokens += 1;
                    scan.metrics.fallbacks += 1;
                    scan.cursor += len;
                    Ok(())
                }
            };
        };

        let consumed = caps[0].len();
        if self.options.trace {
            trace!(
                "{}[{}] {} @{origin}: rule #{index} /{}/ matched {:?}",
                self.name(),
                self.depth,
                state.name(),
                rule.source(),
                &caps[0]
            );
        }

        let mut cx = Context { lexer: self, stack: &mut scan.stack, emitter, metrics: &mut scan.metrics, origin };
        rule.behavior().apply(&caps, &mut cx)?;
        scan.cursor += consumed;
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.table.descriptor().name
    }

    fn child<'t>(&self, table: &'t RuleTable, offset: usize) -> Result<Lexer<'t>, LexError>
    where
        'a: 't,
    {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(LexError::DepthExceeded { limit: self.options.max_depth, offset });
        }
        Ok(Lexer { table, registry: self.registry, options: self.options, depth, base: offset })
    }
}

/// What a behavior may do while it runs. Lives for one rule invocation.
pub struct Context<'c, 'a> {
    lexer: &'c Lexer<'a>,
    stack: &'c mut StateStack,
    emitter: &'c mut dyn Emitter,
    metrics: &'c mut RunMetrics,
    /// Absolute offset of the match start.
    origin: usize,
}

impl Context<'_, '_> {
    /// Send one token downstream. Empty text is dropped.
    pub fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), LexError> {
        if text.is_empty() {
            return Ok(());
        }
        self.emitter.emit(kind, text)?;
        self.metrics.tokens += 1;
        Ok(())
    }

    pub fn push(&mut self, state: StateId) {
        self.stack.push(state);
    }

    pub fn pop(&mut self) -> Result<(), LexError> {
        match self.stack.pop() {
            Some(_) => Ok(()),
            None => Err(LexError::PopRoot { offset: self.origin }),
        }
    }

    /// Scan `text` with a fresh lexer of `target`, streaming its tokens into
    /// this run's emitter. `start` is the offset of `text` within the match.
    pub fn delegate(&mut self, target: Target, text: &str, start: usize) -> Result<(), LexError> {
        if text.is_empty() {
            return Ok(());
        }
        let offset = self.origin + start;
        let named;
        let table = match target {
            Target::Current => self.lexer.table,
            Target::Named(language) => {
                named = self.lexer.registry.table(language)?;
                &*named
            }
        };

        let child = self.lexer.child(table, offset)?;
        debug!("{} delegates {} bytes at {offset} to {} (depth {})", self.lexer.name(), text.len(), child.name(), child.depth);

        let mut scan = child.scan(text);
        let result = child.drive(&mut scan, &mut *self.emitter);

        self.metrics.absorb(&scan.metrics, child.depth);
        result
    }
}
