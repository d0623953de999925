// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! External dependency boundary.
//!
//! Bare and scoped specifiers (`react`, `@babel/core`) never touch the
//! virtual tree or the module cache; they are dispatched here against the
//! externally supplied mapping.

use crate::error::{Result, SandboxError};
use crate::graph::Externals;
use crate::value::Value;

/// Resolves external (non-project) specifiers.
pub trait ResolveDependency: Send + Sync {
    /// Resolves `specifier` against the externals mapping to an exports
    /// value.
    fn resolve(&self, specifier: &str, externals: &Externals) -> Result<Value>;
}

/// Dependency resolver backed purely by the externals mapping.
///
/// Mapped specifiers resolve to a string marker carrying the external
/// module id; the host swaps markers for real bindings. Unmapped
/// specifiers fail.
#[derive(Debug, Default)]
pub struct MappedDependencies;

impl ResolveDependency for MappedDependencies {
    fn resolve(&self, specifier: &str, externals: &Externals) -> Result<Value> {
        match externals.get(specifier) {
            Some(id) => Ok(Value::String(format!("__external__:{id}"))),
            None => Err(SandboxError::Dependency {
                specifier: specifier.to_string(),
            }),
        }
    }
}
