// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The in-memory project graph.
//!
//! Modules and directories are flat collections owned by the surrounding
//! project store; the runtime only reads them. Parent/child relationships
//! are resolved by `shortid` lookup, never by embedded structure, so the
//! graph carries no ownership cycles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable module identity used as the cache and registry key.
pub type ModuleId = String;

/// Mapping from external dependency path to its external module id.
pub type Externals = HashMap<String, String>;

/// A source file in the virtual tree.
///
/// `title` is the display name without extension; `directory_shortid`
/// references the owning [`Directory`], `None` meaning the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Unique, stable identity
    pub id: ModuleId,
    /// File name, no extension
    pub title: String,
    /// Source text
    #[serde(default)]
    pub code: String,
    /// Owning directory's `shortid`, `None` for the project root
    #[serde(default)]
    pub directory_shortid: Option<String>,
}

/// A folder in the virtual tree.
///
/// Forms a tree via `directory_shortid` back-references; no directory may
/// be its own ancestor. The runtime assumes acyclicity, it does not
/// validate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    /// Unique identity
    pub id: String,
    /// Stable identity used for parent references
    pub shortid: String,
    /// Folder name
    pub title: String,
    /// Parent directory's `shortid`, `None` for the project root
    #[serde(default)]
    pub directory_shortid: Option<String>,
}
