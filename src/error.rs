// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module runtime

use crate::graph::ModuleId;
use thiserror::Error;

/// Result type for resolution and dependency operations
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Errors raised while resolving, compiling or executing a module
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SandboxError {
    /// A `require`d path resolves to nothing in the virtual tree
    #[error("Cannot find module in path: {path}")]
    ModuleNotFound {
        /// The requested path, as passed to `require`
        path: String,
    },

    /// A module requires a path that resolves back to itself
    #[error("{title} is importing itself")]
    SelfImport {
        /// Title of the offending module
        title: String,
    },

    /// The external compiler rejected the module source
    #[error("{message}")]
    Compile {
        /// First line of the compiler message, with the generic
        /// module-name placeholder replaced by the real title
        message: String,
    },

    /// Compiled code crashed while running
    #[error("{message}")]
    Eval {
        /// Message of the raised error
        message: String,
        /// Virtual path of the file the error surfaced in, when known
        file_name: Option<String>,
    },

    /// An external specifier is missing from the externals mapping
    #[error("Could not find dependency: {specifier}")]
    Dependency {
        /// The bare or scoped package specifier
        specifier: String,
    },
}

/// Failure reported by the external compiler.
///
/// The message may contain the literal `unknown` placeholder where the
/// module name belongs; the orchestrator substitutes the real title
/// before propagating.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CompileError {
    /// Raw compiler message, possibly multi-line
    pub message: String,
    /// Module the compiler attributed the failure to, if it knows
    pub module_id: Option<ModuleId>,
}

impl CompileError {
    /// Compiler failure with a bare message and no module attribution.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            module_id: None,
        }
    }
}

/// Failure crossing the evaluator boundary.
///
/// Distinguishes "the running code crashed" from "a nested require
/// failed"; the latter carries the already-attributed error unchanged
/// so attribution survives the recursion.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The compiled code itself raised
    #[error("{message}")]
    Script {
        /// Message of the raised error
        message: String,
        /// Virtual path of the file the error was raised in, when the
        /// evaluator can tell
        file_name: Option<String>,
    },

    /// A nested `require` call failed
    #[error(transparent)]
    Require(#[from] TransformedError),
}

/// Presentation-ready error produced by the [`Classify`] collaborator.
///
/// This, not the raw [`SandboxError`], is what propagates out of
/// [`Sandbox::evaluate_module`]. The optional module attribution decides
/// further cache invalidation.
///
/// [`Classify`]: crate::transform::Classify
/// [`Sandbox::evaluate_module`]: crate::sandbox::Sandbox::evaluate_module
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{error}")]
pub struct TransformedError {
    /// The underlying failure
    pub error: SandboxError,
    /// Module the failure is attributed to
    pub module_id: Option<ModuleId>,
    /// Title of the attributed module
    pub title: Option<String>,
    /// Virtual path of the attributed module
    pub path: Option<String>,
}

impl TransformedError {
    /// Wraps a raw error with no attribution yet. Used for failures
    /// raised inside the require hook before any module owns them.
    pub fn bare(error: SandboxError) -> Self {
        Self {
            error,
            module_id: None,
            title: None,
            path: None,
        }
    }
}
