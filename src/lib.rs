// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # modbox
//!
//! A CommonJS-style module runtime over an in-memory project graph.
//!
//! Modules and directories form a virtual file tree — flat collections
//! linked by stable ids, no real filesystem. Given an entry module, the
//! runtime resolves every `require`d path against that tree, compiles
//! module source on demand, executes it in an injected scope, memoizes
//! the result, and recovers correctly when requires turn cyclic or
//! self-referential.
//!
//! Compilation, execution, external-package resolution and error
//! presentation are capabilities, not primitives: the [`Compile`],
//! [`Evaluate`], [`ResolveDependency`] and [`Classify`] traits are the
//! seams where a real transpiler, script engine, package store and
//! diagnostic layer plug in.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modbox::{BasicClassifier, MappedDependencies, PassthroughCompiler, Sandbox};
//! use std::sync::Arc;
//!
//! let mut sandbox = Sandbox::new(
//!     Arc::new(PassthroughCompiler),
//!     Arc::new(my_engine),
//!     Arc::new(MappedDependencies),
//!     Arc::new(BasicClassifier),
//! );
//! let exports = sandbox.evaluate(&entry, &modules, &directories, &externals)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compile;
pub mod dependencies;
pub mod error;
pub mod eval;
pub mod graph;
pub mod module_system;
pub mod sandbox;
pub mod transform;
pub mod value;

// Re-exports
pub use compile::{Compile, CompileContext, PassthroughCompiler};
pub use dependencies::{MappedDependencies, ResolveDependency};
pub use error::{CompileError, EvalError, Result, SandboxError, TransformedError};
pub use eval::{Evaluate, ModuleBinding, RequireFn, Scope};
pub use graph::{Directory, Externals, Module, ModuleId};
pub use module_system::{
    module_path, resolve, CacheEntry, CacheStats, CompiledModule, CompiledRegistry, ModuleCache,
    SourceMap,
};
pub use sandbox::Sandbox;
pub use transform::{BasicClassifier, Classify, ErrorContext};
pub use value::Value;

/// Version of the modbox runtime
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
