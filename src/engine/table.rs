//! Rule tables: the declarative description of one language.
//!
//! A table is described with a [`TableBuilder`] (states named by string,
//! rules as pattern source + behavior) and compiled once into a
//! [`RuleTable`]. Compilation does all the checking that can be done ahead of
//! a scan:
//!
//! - every pattern must compile (wrapped as `\A(?:...)` so it can only match
//!   at the cursor),
//! - every state a rule pushes must exist in the same table,
//! - every capture group a behavior refers to must exist in its pattern,
//! - state names are unique and a `root` state is present.
//!
//! ## Invariants
//!
//! - `StateId` is an index into `RuleTable::states` and is only meaningful for
//!   the table that produced it. Delegation always starts a child at the
//!   child table's own root, so ids never cross tables.
//! - Rules keep their declaration order; the lexer relies on it for
//!   first-match selection.

use regex::{Regex, RegexBuilder};

use super::behavior::Behavior;
use crate::error::BuildError;

/// Name of the state every scan starts in.
pub const ROOT: &str = "root";

bitflags::bitflags! {
    /// Regex flags applied to every pattern of a table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PatternFlags: u8 {
        /// `^`/`$` also match at line boundaries inside the remaining input.
        const MULTI_LINE           = 1 << 0;
        /// `.` matches `\n`.
        const DOT_MATCHES_NEW_LINE = 1 << 1;
        const CASE_INSENSITIVE     = 1 << 2;
    }
}

impl Default for PatternFlags {
    fn default() -> Self {
        PatternFlags::MULTI_LINE
    }
}

/// Static metadata about a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageDescriptor {
    /// Canonical name; also the cache key.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Filename globs such as `*.java`.
    pub filenames: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
    pub description: &'static str,
}

impl LanguageDescriptor {
    /// Case-insensitive match on the name or any alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Match the final path component of `path` against the filename globs.
    pub fn matches_filename(&self, path: &str) -> bool {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        self.filenames.iter().any(|glob| glob_match(glob, file))
    }

    pub fn matches_mimetype(&self, mime: &str) -> bool {
        self.mimetypes.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }
}

/// `*` matches any run of characters, `?` exactly one; everything else is literal.
fn glob_match(glob: &str, name: &str) -> bool {
    let glob: Vec<char> = glob.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut g, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        match glob.get(g) {
            Some('*') => {
                star = Some((g, n));
                g += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                g += 1;
                n += 1;
            }
            _ => match star {
                Some((sg, sn)) => {
                    g = sg + 1;
                    n = sn + 1;
                    star = Some((sg, sn + 1));
                }
                None => return false,
            },
        }
    }

    glob[g..].iter().all(|&c| c == '*')
}

/// Build `(?:a|b|c)\b` from a word list.
pub fn words(list: &[&str]) -> String {
    format!(r"(?:{})\b", list.join("|"))
}

/// Identifier of a state within one compiled [`RuleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

/// An uncompiled rule as written in a table description.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub pattern: String,
    pub behavior: Behavior<&'static str>,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, behavior: Behavior<&'static str>) -> Self {
        RuleSpec { pattern: pattern.into(), behavior }
    }
}

/// A compiled rule: anchored pattern plus behavior with resolved states.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    source: String,
    behavior: Behavior,
}

impl Rule {
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The pattern as written in the table, before anchoring.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}

#[derive(Debug)]
pub struct State {
    name: &'static str,
    rules: Vec<Rule>,
}

impl State {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Immutable, compiled lexical grammar of one language.
#[derive(Debug)]
pub struct RuleTable {
    descriptor: &'static LanguageDescriptor,
    states: Vec<State>,
    root: StateId,
}

impl RuleTable {
    pub fn builder(descriptor: &'static LanguageDescriptor) -> TableBuilder {
        TableBuilder { descriptor, flags: PatternFlags::default(), states: Vec::new() }
    }

    pub fn descriptor(&self) -> &'static LanguageDescriptor {
        self.descriptor
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }
}

/// Declarative construction surface for a [`RuleTable`].
pub struct TableBuilder {
    descriptor: &'static LanguageDescriptor,
    flags: PatternFlags,
    states: Vec<(&'static str, Vec<RuleSpec>)>,
}

impl TableBuilder {
    pub fn flags(mut self, flags: PatternFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn state(mut self, name: &'static str, rules: Vec<RuleSpec>) -> Self {
        self.states.push((name, rules));
        self
    }

    /// Compile every pattern and resolve every state reference.
    pub fn build(self) -> Result<RuleTable, BuildError> {
        let language = self.descriptor.name;

        for (i, &(name, _)) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|&(other, _)| other == name) {
                return Err(BuildError::DuplicateState { language, state: name });
            }
        }

        let root = self
            .states
            .iter()
            .position(|(name, _)| *name == ROOT)
            .map(StateId)
            .ok_or(BuildError::MissingRoot { language, root: ROOT })?;

        let lookup = |name: &'static str| self.states.iter().position(|(n, _)| *n == name).map(StateId);

        let mut states = Vec::with_capacity(self.states.len());
        for &(state, ref specs) in &self.states {
            let mut rules = Vec::with_capacity(specs.len());
            for (index, spec) in specs.iter().enumerate() {
                let pattern = compile(&spec.pattern, self.flags)
                    .map_err(|source| BuildError::Pattern { language, state, index, source })?;

                let groups = pattern.captures_len() - 1;
                if let Some(group) = spec.behavior.groups().find(|&g| g > groups) {
                    return Err(BuildError::Group { language, state, index, group, groups });
                }

                let behavior = spec.behavior.clone().resolve(|target| {
                    lookup(target).ok_or(BuildError::UnknownState { language, state, index, target })
                })?;

                rules.push(Rule { pattern, source: spec.pattern.clone(), behavior });
            }
            states.push(State { name: state, rules });
        }

        log::debug!(
            "{language}: compiled {} states, {} rules",
            states.len(),
            states.iter().map(|s| s.rules.len()).sum::<usize>()
        );

        Ok(RuleTable { descriptor: self.descriptor, states, root })
    }
}

fn compile(source: &str, flags: PatternFlags) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\A(?:{source})"))
        .multi_line(flags.contains(PatternFlags::MULTI_LINE))
        .dot_matches_new_line(flags.contains(PatternFlags::DOT_MATCHES_NEW_LINE))
        .case_insensitive(flags.contains(PatternFlags::CASE_INSENSITIVE))
        .build()
}
