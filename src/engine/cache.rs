//! Once-per-language memoization of compiled rule tables.
//!
//! Each language id owns a slot (`OnceCell`). The map lock is held only long
//! enough to fetch or insert the slot; initialisation then happens on the
//! slot itself, so:
//!
//! - concurrent first use of one language compiles its table exactly once
//!   (other callers block on that slot until it is filled),
//! - different languages compile independently,
//! - a failed build is stored like a successful one and handed back to every
//!   later caller without being retried.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;

use super::table::RuleTable;
use crate::error::BuildError;

type Slot = Arc<OnceCell<Result<Arc<RuleTable>, BuildError>>>;

#[derive(Debug, Default)]
pub struct TableCache {
    slots: Mutex<HashMap<&'static str, Slot>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table cached under `key`, building it with `build` on first use.
    pub fn get_or_build<F>(&self, key: &'static str, build: F) -> Result<Arc<RuleTable>, BuildError>
    where
        F: FnOnce() -> Result<RuleTable, BuildError>,
    {
        let slot = self.slot(key);
        slot.get_or_init(|| {
            log::debug!("building rule table for {key}");
            let built = build().map(Arc::new);
            if let Err(err) = &built {
                log::error!("rule table for {key} failed to build: {err}");
            }
            built
        })
        .clone()
    }

    /// Whether `key` has been built (successfully or not).
    pub fn is_built(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|slot| slot.get().is_some())
    }

    fn slot(&self, key: &'static str) -> Slot {
        self.lock().entry(key).or_default().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, Slot>> {
        // The map only ever holds fully-formed slots, so a poisoned lock is still usable.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Behavior, LanguageDescriptor, ROOT, RuleSpec};
    use crate::token::TokenKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTED: LanguageDescriptor =
        LanguageDescriptor { name: "Counted", aliases: &[], filenames: &[], mimetypes: &[], description: "" };

    fn counted_table(builds: &AtomicUsize) -> Result<RuleTable, BuildError> {
        builds.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(5));
        RuleTable::builder(&COUNTED).state(ROOT, vec![RuleSpec::new(r"\w+", Behavior::Emit(TokenKind::Name))]).build()
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let cache = TableCache::new();
        let builds = AtomicUsize::new(0);

        let tables: Vec<Arc<RuleTable>> = std::thread::scope(|s| {
            let handles: Vec<_> =
                (0..8).map(|_| s.spawn(|| cache.get_or_build("Counted", || counted_table(&builds)))).collect();
            handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert!(cache.is_built("Counted"));
    }

    #[test]
    fn failed_build_is_memoized() {
        let cache = TableCache::new();
        let builds = AtomicUsize::new(0);
        let broken = || {
            builds.fetch_add(1, Ordering::SeqCst);
            RuleTable::builder(&COUNTED).state(ROOT, vec![RuleSpec::new("[", Behavior::Emit(TokenKind::Name))]).build()
        };

        let first = cache.get_or_build("Broken", broken).unwrap_err();
        let second = cache.get_or_build("Broken", broken).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn keys_are_independent() {
        let cache = TableCache::new();
        let builds = AtomicUsize::new(0);
        cache.get_or_build("a", || counted_table(&builds)).unwrap();
        assert!(!cache.is_built("b"));
        cache.get_or_build("b", || counted_table(&builds)).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
