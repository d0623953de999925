// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Evaluation orchestrator.
//!
//! Drives resolution, cache lookup, compilation, execution and
//! cache-store for one module, and recursively for its dependencies via
//! the injected `require` hook. Owns the cyclic-dependency and
//! self-import policy and the error attribution path.

use crate::compile::{Compile, CompileContext};
use crate::dependencies::ResolveDependency;
use crate::error::{EvalError, SandboxError, TransformedError};
use crate::eval::{Evaluate, Scope};
use crate::graph::{Directory, Externals, Module, ModuleId};
use crate::module_system::{
    self, CacheEntry, CacheStats, CompiledModule, CompiledRegistry, ModuleCache, SourceMap,
};
use crate::transform::{Classify, ErrorContext};
use crate::value::Value;
use parking_lot::RwLock;
use std::sync::Arc;

/// A failure on its way up the call stack, before classification.
struct RaisedError {
    error: SandboxError,
    module_id: Option<ModuleId>,
    path: Option<String>,
}

/// One sandboxed module runtime.
///
/// Owns the module cache and the compiled-record registry; multiple
/// independent sandboxes run without cross-contamination. The project
/// graph itself is supplied per call and only read.
pub struct Sandbox {
    cache: ModuleCache,
    compiled: CompiledRegistry,
    compiler: Arc<dyn Compile>,
    evaluator: Arc<dyn Evaluate>,
    dependencies: Arc<dyn ResolveDependency>,
    classifier: Arc<dyn Classify>,
    global: Arc<RwLock<Value>>,
}

impl Sandbox {
    /// Creates a sandbox around the four external collaborators.
    pub fn new(
        compiler: Arc<dyn Compile>,
        evaluator: Arc<dyn Evaluate>,
        dependencies: Arc<dyn ResolveDependency>,
        classifier: Arc<dyn Classify>,
    ) -> Self {
        Self {
            cache: ModuleCache::new(),
            compiled: CompiledRegistry::new(),
            compiler,
            evaluator,
            dependencies,
            classifier,
            global: Arc::new(RwLock::new(Value::object())),
        }
    }

    /// Evaluates an entry module from a clean call stack.
    pub fn evaluate(
        &mut self,
        entry: &Module,
        modules: &[Module],
        directories: &[Directory],
        externals: &Externals,
    ) -> Result<Value, TransformedError> {
        self.evaluate_module(entry, modules, directories, externals, 0, &[])
    }

    /// Evaluates one module at the given require depth.
    ///
    /// `parents` is the chain of module ids currently mid-evaluation on
    /// this call stack; a `require` resolving into that chain is served a
    /// placeholder instead of recursing (see [`Self::evaluate`] for the
    /// top-level entry point).
    pub fn evaluate_module(
        &mut self,
        entry: &Module,
        modules: &[Module],
        directories: &[Directory],
        externals: &Externals,
        depth: usize,
        parents: &[ModuleId],
    ) -> Result<Value, TransformedError> {
        let mut requires: Vec<ModuleId> = Vec::new();
        match self.evaluate_inner(entry, modules, directories, externals, depth, parents, &mut requires)
        {
            Ok(exports) => {
                // A fresh evaluation always replaces whatever was cached.
                self.cache.set(
                    entry.id.clone(),
                    CacheEntry {
                        exports: exports.clone(),
                        requires,
                        module: entry.clone(),
                    },
                );
                Ok(exports)
            }
            Err(raised) => Err(self.handle_failure(raised, entry, modules, &requires)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_inner(
        &mut self,
        entry: &Module,
        modules: &[Module],
        directories: &[Directory],
        externals: &Externals,
        depth: usize,
        parents: &[ModuleId],
        requires: &mut Vec<ModuleId>,
    ) -> Result<Value, RaisedError> {
        let path = module_system::module_path(modules, directories, &entry.id)
            .unwrap_or_else(|| entry.title.clone());
        tracing::debug!(module = %entry.title, %path, depth, "evaluating module");

        let context = CompileContext {
            module: entry,
            modules,
            directories,
            externals,
            depth,
        };
        let compiled_code = match self.compiler.compile(&entry.code, &context) {
            Ok(code) => format!("{code}\n//# sourceURL={path}"),
            Err(failure) => {
                return Err(RaisedError {
                    error: SandboxError::Compile {
                        message: rewrite_compile_message(&failure.message, &entry.title),
                    },
                    module_id: failure.module_id,
                    path: None,
                });
            }
        };

        // Recorded before execution so a failure raised while running
        // can still be mapped back to this module by path.
        self.compiled
            .record(entry.id.clone(), entry.clone(), path.clone(), compiled_code.clone());

        let mut scope = Scope::new(Arc::clone(&self.global));
        let evaluator = Arc::clone(&self.evaluator);
        let result = {
            let mut require = |specifier: &str| {
                self.require(specifier, entry, modules, directories, externals, depth, parents, requires)
            };
            evaluator.evaluate(&compiled_code, &path, &mut scope, &mut require)
        };

        match result {
            Ok(()) => Ok(scope.into_exports()),
            Err(EvalError::Script { message, file_name }) => Err(RaisedError {
                path: file_name.clone(),
                error: SandboxError::Eval { message, file_name },
                module_id: None,
            }),
            Err(EvalError::Require(nested)) => Err(RaisedError {
                path: nested.path,
                module_id: nested.module_id,
                error: nested.error,
            }),
        }
    }

    /// The `require` hook, closed over one invocation's state.
    #[allow(clippy::too_many_arguments)]
    fn require(
        &mut self,
        specifier: &str,
        entry: &Module,
        modules: &[Module],
        directories: &[Directory],
        externals: &Externals,
        depth: usize,
        parents: &[ModuleId],
        requires: &mut Vec<ModuleId>,
    ) -> Result<Value, TransformedError> {
        if is_external_specifier(specifier) {
            tracing::trace!(specifier, "dispatching external dependency");
            return self
                .dependencies
                .resolve(specifier, externals)
                .map_err(TransformedError::bare);
        }

        let resolved = module_system::resolve(
            specifier,
            modules,
            directories,
            entry.directory_shortid.as_deref(),
        )
        .map_err(TransformedError::bare)?;

        if resolved.id == entry.id {
            return Err(TransformedError::bare(SandboxError::SelfImport {
                title: entry.title.clone(),
            }));
        }

        // The accumulator records the dependency edge itself, cache hit
        // or not.
        requires.push(resolved.id.clone());

        if let Some(cached) = self.cache.get(&resolved.id) {
            tracing::trace!(module = %resolved.title, "require served from cache");
            return Ok(cached.exports.clone());
        }

        // An ancestor still mid-evaluation: the importer sees whatever
        // the in-progress module has exported so far, approximated as
        // "nothing yet".
        if parents.iter().any(|id| id == &resolved.id) {
            tracing::debug!(module = %resolved.title, "cyclic require, returning placeholder");
            return Ok(Value::object());
        }

        let mut next_parents = Vec::with_capacity(parents.len() + 1);
        next_parents.extend_from_slice(parents);
        next_parents.push(entry.id.clone());
        self.evaluate_module(resolved, modules, directories, externals, depth + 1, &next_parents)
    }

    /// Failure path: drop the entry's cache, attribute, classify,
    /// invalidate the attributed module when it is not the entry.
    fn handle_failure(
        &mut self,
        raised: RaisedError,
        entry: &Module,
        modules: &[Module],
        requires: &[ModuleId],
    ) -> TransformedError {
        // Never leave a successful-looking entry behind a failure.
        self.cache.delete(&entry.id);

        let RaisedError {
            error,
            module_id,
            path,
        } = raised;

        let owner_id = path
            .as_deref()
            .and_then(|p| self.compiled.find_by_path(p))
            .map(|record| record.id.clone())
            .or(module_id)
            .unwrap_or_else(|| entry.id.clone());
        let owner = modules
            .iter()
            .find(|m| m.id == owner_id)
            .or(Some(entry));

        let classifier = Arc::clone(&self.classifier);
        let transformed = classifier.classify(ErrorContext {
            error: &error,
            owner,
            modules,
            cache: &self.cache,
            requires,
        });

        if let Some(id) = &transformed.module_id {
            if id != &entry.id {
                // Dependents may have captured now-invalid state.
                tracing::debug!(module = %id, "invalidating attributed module");
                self.cache.invalidate(id);
            }
        }

        transformed
    }

    /// Drops all cache entries. Called by the project store on full
    /// reload; compiled records persist until overwritten.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Transitively invalidates a module whose source changed, and every
    /// cached module that required it.
    pub fn delete_cache(&mut self, module: &Module) {
        self.cache.invalidate(&module.id);
    }

    /// Diagnostics lookup of a compiled record by its virtual path.
    pub fn get_compiled_module_by_path(&self, path: &str) -> Option<&CompiledModule> {
        self.compiled.find_by_path(path)
    }

    /// Attaches a source map produced by a later pipeline stage. No-op
    /// when the module was never compiled.
    pub fn set_source_map(&mut self, id: &str, source_map: SourceMap) {
        self.compiled.attach_source_map(id, source_map);
    }

    /// Read access to the module cache.
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Cache hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The shared host-global reference injected into every scope.
    pub fn global(&self) -> Arc<RwLock<Value>> {
        Arc::clone(&self.global)
    }
}

/// External specifiers start with a word character or `@`; everything
/// else is resolved against the project tree.
fn is_external_specifier(specifier: &str) -> bool {
    specifier
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
}

/// First line only, with the generic placeholder swapped for the real
/// module title.
fn rewrite_compile_message(message: &str, title: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or_default()
        .replacen("unknown", title, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_specifier_shapes() {
        assert!(is_external_specifier("react"));
        assert!(is_external_specifier("@babel/core"));
        assert!(is_external_specifier("lodash/get"));
        assert!(is_external_specifier("_private"));
        assert!(!is_external_specifier("./App"));
        assert!(!is_external_specifier("../util"));
        assert!(!is_external_specifier("/absolute"));
        assert!(!is_external_specifier(""));
    }

    #[test]
    fn test_rewrite_compile_message_keeps_first_line() {
        let rewritten = rewrite_compile_message("unknown: Unexpected token (2:4)\n  1 | x", "App");
        assert_eq!(rewritten, "App: Unexpected token (2:4)");
    }

    #[test]
    fn test_rewrite_compile_message_replaces_first_occurrence_only() {
        let rewritten = rewrite_compile_message("unknown failed in unknown", "App");
        assert_eq!(rewritten, "App failed in unknown");
    }
}
