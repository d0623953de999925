// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Compiler boundary.
//!
//! Turning module source into executable code is an external capability;
//! the runtime only hands the source and a per-module context across this
//! seam and stores whatever comes back.

use crate::error::CompileError;
use crate::graph::{Directory, Externals, Module};

/// Everything a compiler may derive its configuration from.
///
/// The runtime treats the derivation as opaque; it passes the whole
/// evaluation snapshot and the current require depth.
pub struct CompileContext<'a> {
    /// The module being compiled
    pub module: &'a Module,
    /// All modules in the project
    pub modules: &'a [Module],
    /// All directories in the project
    pub directories: &'a [Directory],
    /// External dependency mapping
    pub externals: &'a Externals,
    /// How many requires deep the evaluation currently is
    pub depth: usize,
}

/// External compiler: source text in, executable text out.
pub trait Compile: Send + Sync {
    /// Compiles `code` under a configuration derived from `ctx`.
    fn compile(&self, code: &str, ctx: &CompileContext<'_>) -> Result<String, CompileError>;
}

/// Compiler that passes source through untouched.
///
/// Useful when module code is already executable, and as the test
/// compiler.
#[derive(Debug, Default)]
pub struct PassthroughCompiler;

impl Compile for PassthroughCompiler {
    fn compile(&self, code: &str, _ctx: &CompileContext<'_>) -> Result<String, CompileError> {
        Ok(code.to_string())
    }
}
