// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for evaluated modules.
//!
//! Keyed by module id; an entry exists only for modules whose last
//! evaluation succeeded. Absence means "must recompile". Validity is
//! enforced by explicit deletion, never by versioning.

use crate::graph::{Module, ModuleId};
use crate::value::Value;
use std::collections::HashMap;

/// Memoized result of one successful evaluation.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The module's export value
    pub exports: Value,
    /// Module ids required while producing `exports`, in require order,
    /// duplicates allowed
    pub requires: Vec<ModuleId>,
    /// The module the entry was produced from
    pub module: Module,
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: usize,
    /// Lookups that found no entry
    pub misses: usize,
}

/// Cache of successfully evaluated modules.
#[derive(Debug, Default)]
pub struct ModuleCache {
    entries: HashMap<ModuleId, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl ModuleCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a cached entry, counting the lookup.
    pub fn get(&mut self, id: &str) -> Option<&CacheEntry> {
        match self.entries.get(id) {
            Some(entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Gets a cached entry without touching the counters.
    pub fn peek(&self, id: &str) -> Option<&CacheEntry> {
        self.entries.get(id)
    }

    /// Checks whether a module is cached.
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Stores an entry, overwriting unconditionally.
    pub fn set(&mut self, id: ModuleId, entry: CacheEntry) {
        self.entries.insert(id, entry);
    }

    /// Removes a single entry.
    pub fn delete(&mut self, id: &str) -> Option<CacheEntry> {
        self.entries.remove(id)
    }

    /// Empties the whole cache.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Deletes the entry for `module_id` and, transitively, every entry
    /// that required it.
    ///
    /// The module's own entry goes first: with a cyclic requires graph
    /// (A requires B requires A) the dependent scan below would
    /// otherwise revisit the same pair forever.
    pub fn invalidate(&mut self, module_id: &str) {
        self.entries.remove(module_id);
        let dependents: Vec<ModuleId> = self
            .entries
            .values()
            .filter(|entry| entry.requires.iter().any(|id| id == module_id))
            .map(|entry| entry.module.id.clone())
            .collect();
        for id in dependents {
            tracing::debug!(module = %id, invalidated_by = %module_id, "invalidating dependent");
            self.invalidate(&id);
        }
    }

    /// All cached module ids.
    pub fn keys(&self) -> Vec<ModuleId> {
        self.entries.keys().cloned().collect()
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since construction.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
        }
    }
}
