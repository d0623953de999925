// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error classification boundary.
//!
//! Turning a raw failure plus evaluation context into a user-facing
//! diagnostic is external. The runtime determines the owning module,
//! packages the context, and propagates whatever the classifier returns.

use crate::error::{SandboxError, TransformedError};
use crate::graph::{Module, ModuleId};
use crate::module_system::ModuleCache;

/// Everything the classifier gets to look at.
pub struct ErrorContext<'a> {
    /// The raw failure
    pub error: &'a SandboxError,
    /// Module the failure was attributed to, when one could be determined
    pub owner: Option<&'a Module>,
    /// All modules in the project
    pub modules: &'a [Module],
    /// Snapshot of the module cache at failure time
    pub cache: &'a ModuleCache,
    /// Dependency edges observed before the failure, in require order
    pub requires: &'a [ModuleId],
}

/// External error classifier.
pub trait Classify: Send + Sync {
    /// Produces the presentation-ready error that propagates to the
    /// caller. The returned module attribution decides further cache
    /// invalidation.
    fn classify(&self, ctx: ErrorContext<'_>) -> TransformedError;
}

/// Minimal classifier: packages the raw error with its owner, no
/// rewriting. Used by the CLI and the test suites.
#[derive(Debug, Default)]
pub struct BasicClassifier;

impl Classify for BasicClassifier {
    fn classify(&self, ctx: ErrorContext<'_>) -> TransformedError {
        let path = match ctx.error {
            SandboxError::Eval { file_name, .. } => file_name.clone(),
            _ => None,
        };
        TransformedError {
            error: ctx.error.clone(),
            module_id: ctx.owner.map(|m| m.id.clone()),
            title: ctx.owner.map(|m| m.title.clone()),
            path,
        }
    }
}
