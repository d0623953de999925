// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Virtual module system.
//!
//! Resolution, memoization and compiled-record bookkeeping over the
//! in-memory project graph:
//!
//! - path resolution with file/directory/index tie-break rules
//! - a reentrant module cache with cycle-safe invalidation
//! - a registry of compiled forms kept purely for error attribution

mod cache;
mod registry;
mod resolver;

pub use cache::{CacheEntry, CacheStats, ModuleCache};
pub use registry::{CompiledModule, CompiledRegistry, SourceMap};
pub use resolver::{module_path, resolve};
