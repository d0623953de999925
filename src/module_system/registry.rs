// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Registry of compiled module records.
//!
//! Written unconditionally before every evaluation attempt, independent
//! of the outcome, so a failure can always be attributed to the module
//! it came from. Records are only ever overwritten, never deleted by the
//! success/failure path.

use crate::graph::{Module, ModuleId};
use std::collections::HashMap;

/// Source map produced by a later pipeline stage; opaque here.
pub type SourceMap = serde_json::Value;

/// Most recent compiled form of a module.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    /// Module identity
    pub id: ModuleId,
    /// Resolved virtual path at compile time
    pub path: String,
    /// Output of the external compiler
    pub compiled_code: String,
    /// The module record the code was compiled from
    pub module: Module,
    /// Attached source map, if a later stage provided one
    pub source_map: Option<SourceMap>,
}

/// Process-wide map from module id to its compiled record.
#[derive(Debug, Default)]
pub struct CompiledRegistry {
    records: HashMap<ModuleId, CompiledModule>,
}

impl CompiledRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the record for a module. A fresh compile drops any source
    /// map attached to the previous one.
    pub fn record(&mut self, id: ModuleId, module: Module, path: String, compiled_code: String) {
        self.records.insert(
            id.clone(),
            CompiledModule {
                id,
                path,
                compiled_code,
                module,
                source_map: None,
            },
        );
    }

    /// Merges a source map into an existing record. No-op when the
    /// module was never recorded.
    pub fn attach_source_map(&mut self, id: &str, source_map: SourceMap) {
        if let Some(record) = self.records.get_mut(id) {
            record.source_map = Some(source_map);
        }
    }

    /// Record for a module id.
    pub fn get(&self, id: &str) -> Option<&CompiledModule> {
        self.records.get(id)
    }

    /// Linear lookup by resolved virtual path. Raised errors usually
    /// carry a path, not a module identity.
    pub fn find_by_path(&self, path: &str) -> Option<&CompiledModule> {
        self.records.values().find(|record| record.path == path)
    }

    /// Drops all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
