//! Behavior combinators.
//!
//! A behavior is what a rule does once its pattern matched. Behaviors are
//! plain data so tables stay declarative and can be inspected in tests:
//!
//! ```text
//! Emit(kind)               whole match -> one token
//! EmitAndPush(kind, s)     ... then push state `s`
//! EmitAndPop(kind)         ... then pop the active state
//! Delegate(target)         whole match -> nested run of `target`
//! Composite([action..])    ordered actions over individual capture groups
//! ```
//!
//! `S` is the state reference: `&'static str` while a table is being written,
//! [`StateId`] once it is compiled.

use regex::Captures;

use super::lexer::Context;
use super::table::StateId;
use crate::error::LexError;
use crate::token::TokenKind;

/// Which language a delegated substring is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A fresh run of the table doing the delegating.
    Current,
    /// A fresh run of another registered language, by name or alias.
    Named(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<S = StateId> {
    Emit { group: usize, kind: TokenKind },
    Delegate { group: usize, target: Target },
    Push(S),
    Pop,
}

impl<S> Action<S> {
    pub fn emit(group: usize, kind: TokenKind) -> Self {
        Action::Emit { group, kind }
    }

    pub fn delegate(group: usize, target: Target) -> Self {
        Action::Delegate { group, target }
    }

    fn group(&self) -> Option<usize> {
        match self {
            Action::Emit { group, .. } | Action::Delegate { group, .. } => Some(*group),
            Action::Push(_) | Action::Pop => None,
        }
    }

    fn resolve<T, E>(self, f: &mut impl FnMut(S) -> Result<T, E>) -> Result<Action<T>, E> {
        Ok(match self {
            Action::Emit { group, kind } => Action::Emit { group, kind },
            Action::Delegate { group, target } => Action::Delegate { group, target },
            Action::Push(state) => Action::Push(f(state)?),
            Action::Pop => Action::Pop,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior<S = StateId> {
    Emit(TokenKind),
    EmitAndPush(TokenKind, S),
    EmitAndPop(TokenKind),
    Delegate(Target),
    Composite(Vec<Action<S>>),
}

impl<S> Behavior<S> {
    /// Capture groups this behavior reads (0 is the whole match).
    pub fn groups(&self) -> impl Iterator<Item = usize> + '_ {
        let actions: &[Action<S>] = match self {
            Behavior::Composite(actions) => actions.as_slice(),
            _ => &[],
        };
        actions.iter().filter_map(Action::group)
    }

    /// Map every state reference through `f`.
    pub fn resolve<T, E>(self, mut f: impl FnMut(S) -> Result<T, E>) -> Result<Behavior<T>, E> {
        Ok(match self {
            Behavior::Emit(kind) => Behavior::Emit(kind),
            Behavior::EmitAndPush(kind, state) => Behavior::EmitAndPush(kind, f(state)?),
            Behavior::EmitAndPop(kind) => Behavior::EmitAndPop(kind),
            Behavior::Delegate(target) => Behavior::Delegate(target),
            Behavior::Composite(actions) => {
                Behavior::Composite(actions.into_iter().map(|a| a.resolve(&mut f)).collect::<Result<_, _>>()?)
            }
        })
    }
}

impl Behavior {
    /// Run the behavior for one match.
    pub(crate) fn apply(&self, caps: &Captures<'_>, cx: &mut Context<'_, '_>) -> Result<(), LexError> {
        let whole = &caps[0];
        match self {
            Behavior::Emit(kind) => cx.emit(*kind, whole),
            Behavior::EmitAndPush(kind, state) => {
                cx.emit(*kind, whole)?;
                cx.push(*state);
                Ok(())
            }
            Behavior::EmitAndPop(kind) => {
                cx.emit(*kind, whole)?;
                cx.pop()
            }
            Behavior::Delegate(target) => cx.delegate(*target, whole, 0),
            Behavior::Composite(actions) => {
                for action in actions {
                    match *action {
                        Action::Emit { group, kind } => {
                            if let Some(m) = caps.get(group) {
                                cx.emit(kind, m.as_str())?;
                            }
                        }
                        Action::Delegate { group, target } => {
                            if let Some(m) = caps.get(group) {
                                cx.delegate(target, m.as_str(), m.start())?;
                            }
                        }
                        Action::Push(state) => cx.push(state),
                        Action::Pop => cx.pop()?,
                    }
                }
                Ok(())
            }
        }
    }
}
