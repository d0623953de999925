// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Evaluator boundary and the injected scope.
//!
//! Executing compiled code is an external capability. The runtime builds
//! a fresh [`Scope`] per evaluation, hands it to the evaluator together
//! with a `require` hook, and afterwards picks the export value off the
//! scope.

use crate::error::{EvalError, TransformedError};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// The `module` binding injected into an evaluation.
#[derive(Debug, Clone)]
pub struct ModuleBinding {
    /// `module.exports`
    pub exports: Value,
}

/// Scope injected into one evaluation of one module.
pub struct Scope {
    /// Fresh `module` binding
    pub module: ModuleBinding,
    /// Fresh top-level `exports` binding
    pub exports: Value,
    /// Shared host-global reference
    pub global: Arc<RwLock<Value>>,
    /// Fixed process environment stub
    pub env: HashMap<String, String>,
}

impl Scope {
    /// Builds a fresh scope around the shared host global.
    pub fn new(global: Arc<RwLock<Value>>) -> Self {
        let mut env = HashMap::new();
        env.insert("NODE_ENV".to_string(), "development".to_string());
        Self {
            module: ModuleBinding {
                exports: Value::object(),
            },
            exports: Value::object(),
            global,
            env,
        }
    }

    /// Selects the module's export value.
    ///
    /// A populated `exports` binding wins over `module.exports`: transpiled
    /// ESM output assigns named/default bindings onto `exports`, CommonJS
    /// output assigns `module.exports`. Ambiguous for modules that
    /// legitimately populate both; the CommonJS value is dropped then.
    pub fn into_exports(self) -> Value {
        if self.exports.has_own_properties() {
            self.exports
        } else {
            self.module.exports
        }
    }
}

/// The `require` hook handed to the evaluator.
pub type RequireFn<'a> = dyn FnMut(&str) -> Result<Value, TransformedError> + 'a;

/// External evaluator: runs compiled code against an injected scope.
///
/// Implementations mutate `scope` as the code executes and surface
/// script crashes as [`EvalError::Script`]. Failures returned by the
/// `require` hook must propagate as [`EvalError::Require`] (the `From`
/// impl makes `?` do this).
pub trait Evaluate: Send + Sync {
    /// Executes `compiled_code`, which was resolved to `path`.
    fn evaluate(
        &self,
        compiled_code: &str,
        path: &str,
        scope: &mut Scope,
        require: &mut RequireFn<'_>,
    ) -> Result<(), EvalError>;
}
