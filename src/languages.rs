//! Language registry.
//!
//! A [`Registry`] pairs language descriptors with their table constructors
//! and memoizes the compiled tables in a [`TableCache`]. Lookups by alias,
//! filename or MIME type only read descriptors; nothing is compiled until a
//! table is actually requested.
//!
//! Named delegation (`Target::Named`) is resolved through the registry that
//! started the run.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::engine::{LanguageDescriptor, RuleTable, TableCache};
use crate::error::BuildError;

pub mod java;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::with_builtins);

/// A registrable language: metadata plus a table constructor.
#[derive(Debug, Clone, Copy)]
pub struct LanguageDef {
    pub descriptor: &'static LanguageDescriptor,
    pub build: fn() -> Result<RuleTable, BuildError>,
}

#[derive(Debug, Default)]
pub struct Registry {
    languages: Vec<LanguageDef>,
    cache: TableCache,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every language shipped with the crate.
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        registry.register(java::LANGUAGE);
        registry
    }

    /// The process-wide registry of built-in languages.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Add a language. Lookups return the first registered match, so an
    /// earlier registration wins over a later one answering to the same name.
    pub fn register(&mut self, def: LanguageDef) {
        self.languages.push(def);
    }

    pub fn languages(&self) -> impl Iterator<Item = &'static LanguageDescriptor> + '_ {
        self.languages.iter().map(|def| def.descriptor)
    }

    /// Find a language by name or alias (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&LanguageDef> {
        self.languages.iter().find(|def| def.descriptor.answers_to(name))
    }

    pub fn find_by_filename(&self, path: &str) -> Option<&LanguageDef> {
        self.languages.iter().find(|def| def.descriptor.matches_filename(path))
    }

    pub fn find_by_mimetype(&self, mime: &str) -> Option<&LanguageDef> {
        self.languages.iter().find(|def| def.descriptor.matches_mimetype(mime))
    }

    /// The compiled table for `name`, built on first use.
    pub fn table(&self, name: &str) -> Result<Arc<RuleTable>, BuildError> {
        let def = self.find(name).ok_or_else(|| BuildError::UnknownLanguage(name.to_string()))?;
        self.cache.get_or_build(def.descriptor.name, def.build)
    }
}
