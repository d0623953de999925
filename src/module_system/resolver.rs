// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution against the virtual tree.
//!
//! Pure functions over a graph snapshot: same inputs, same module or the
//! same failure, no I/O, no mutation.

use crate::error::{Result, SandboxError};
use crate::graph::{Directory, Module};

/// Resolves a relative `path` against the module/directory graph.
///
/// `from_directory_shortid` anchors the search (`None` means the project
/// root). Leading `.` segments are no-ops and `..` moves to the parent
/// directory; the root's parent is the root itself, so walking past the
/// top never fails. The final segment prefers an exact module title over
/// a same-named directory, and a directory resolves to the `index`
/// module directly inside it. An empty final segment (trailing `/`, bare
/// `.` or `..`) targets the current directory's `index`.
pub fn resolve<'a>(
    path: &str,
    modules: &'a [Module],
    directories: &'a [Directory],
    from_directory_shortid: Option<&'a str>,
) -> Result<&'a Module> {
    let not_found = || SandboxError::ModuleNotFound {
        path: path.to_string(),
    };

    let mut context = normalize(from_directory_shortid);
    let segments: Vec<&str> = path.split('/').collect();
    let Some((last, leading)) = segments.split_last() else {
        return Err(not_found());
    };

    for segment in leading {
        match *segment {
            "" | "." => {}
            ".." => context = parent_of(context, directories),
            name => {
                let child = child_directory(name, context, directories).ok_or_else(not_found)?;
                tracing::trace!(directory = name, shortid = %child.shortid, "descending");
                context = Some(&child.shortid);
            }
        }
    }

    match *last {
        "" | "." => index_of(context, modules).ok_or_else(not_found),
        ".." => index_of(parent_of(context, directories), modules).ok_or_else(not_found),
        name => {
            // Files take precedence over same-named directories.
            if let Some(module) = module_in(name, context, modules) {
                return Ok(module);
            }
            match child_directory(name, context, directories) {
                Some(dir) => index_of(Some(&dir.shortid), modules).ok_or_else(not_found),
                None => Err(not_found()),
            }
        }
    }
}

/// Builds the virtual path of a module by walking its parent directories.
///
/// `/`-joined titles, no leading slash. `None` if the id is unknown;
/// a dangling parent reference truncates the walk instead of failing.
pub fn module_path(modules: &[Module], directories: &[Directory], id: &str) -> Option<String> {
    let module = modules.iter().find(|m| m.id == id)?;
    let mut segments = vec![module.title.as_str()];
    let mut parent = normalize(module.directory_shortid.as_deref());
    while let Some(shortid) = parent {
        match directories.iter().find(|d| d.shortid == shortid) {
            Some(dir) => {
                segments.push(dir.title.as_str());
                parent = normalize(dir.directory_shortid.as_deref());
            }
            None => break,
        }
    }
    segments.reverse();
    Some(segments.join("/"))
}

/// Project stores encode the root both as a missing parent and as an
/// empty string.
fn normalize(shortid: Option<&str>) -> Option<&str> {
    shortid.filter(|s| !s.is_empty())
}

fn parent_of<'a>(context: Option<&str>, directories: &'a [Directory]) -> Option<&'a str> {
    let shortid = context?;
    directories
        .iter()
        .find(|d| d.shortid == shortid)
        .and_then(|d| normalize(d.directory_shortid.as_deref()))
}

fn child_directory<'a>(
    title: &str,
    context: Option<&str>,
    directories: &'a [Directory],
) -> Option<&'a Directory> {
    directories
        .iter()
        .find(|d| d.title == title && normalize(d.directory_shortid.as_deref()) == context)
}

fn module_in<'a>(title: &str, context: Option<&str>, modules: &'a [Module]) -> Option<&'a Module> {
    modules
        .iter()
        .find(|m| m.title == title && normalize(m.directory_shortid.as_deref()) == context)
}

fn index_of<'a>(context: Option<&str>, modules: &'a [Module]) -> Option<&'a Module> {
    module_in("index", context, modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, title: &str, directory_shortid: Option<&str>) -> Module {
        Module {
            id: id.to_string(),
            title: title.to_string(),
            code: String::new(),
            directory_shortid: directory_shortid.map(String::from),
        }
    }

    fn directory(shortid: &str, title: &str, directory_shortid: Option<&str>) -> Directory {
        Directory {
            id: format!("id-{shortid}"),
            shortid: shortid.to_string(),
            title: title.to_string(),
            directory_shortid: directory_shortid.map(String::from),
        }
    }

    #[test]
    fn test_resolves_root_path() {
        let modules = [module("123123", "Test", None)];
        let resolved = resolve("./Test", &modules, &[], None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_resolves_index_files() {
        let modules = [module("123123", "index", None)];
        let resolved = resolve("./", &modules, &[], None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_resolves_path_one_directory_deep() {
        let directories = [directory("123123123", "Directory", None)];
        let modules = [module("123123", "Test", Some("123123123"))];
        let resolved = resolve("./Directory/Test", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_resolves_index_one_directory_deep() {
        let directories = [directory("123123123", "Directory", None)];
        let modules = [module("123123", "index", Some("123123123"))];
        let resolved = resolve("./Directory/", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_resolves_path_two_directories_deep() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [module("123123", "Test", Some("1312423432"))];
        let resolved = resolve("./Directory/Directory2/Test", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_resolves_explicit_index_two_directories_deep() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [module("123123", "index", Some("1312423432"))];
        let resolved =
            resolve("./Directory/Directory2/index", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_finds_sibling_directory_index_relative_from_directory() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [module("123123", "index", Some("1312423432"))];
        let resolved = resolve("./Directory2", &modules, &directories, Some("123123123")).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_finds_current_index() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [module("123123", "index", Some("1312423432"))];
        let resolved = resolve("./", &modules, &directories, Some("1312423432")).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_finds_a_parent() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [
            module("12666", "Test", None),
            module("123123", "index", Some("1312423432")),
        ];
        let resolved = resolve("../Test", &modules, &directories, Some("123123123")).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_finds_a_parent_of_a_parent() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Directory2", Some("123123123")),
        ];
        let modules = [
            module("12666", "Test", None),
            module("123123", "index", Some("1312423432")),
        ];
        let resolved = resolve("../../Test", &modules, &directories, Some("1312423432")).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_parent_of_root_is_root() {
        let modules = [module("12666", "Test", None)];
        let resolved = resolve("../../../Test", &modules, &[], None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_does_not_find_itself_if_nothing_is_found() {
        let directories = [directory("123123123", "Test", None)];
        let modules = [
            module("12666", "index", Some("123123123")),
            module("123123", "index", None),
        ];
        let err = resolve("./Tes", &modules, &directories, None).unwrap_err();
        assert_eq!(
            err,
            SandboxError::ModuleNotFound {
                path: "./Tes".to_string()
            }
        );
    }

    #[test]
    fn test_missing_intermediate_directory_fails() {
        let modules = [module("123123", "Test", None)];
        assert!(resolve("./Nope/Test", &modules, &[], None).is_err());
    }

    #[test]
    fn test_directory_without_index_fails() {
        let directories = [directory("123123123", "Directory", None)];
        let modules = [module("123123", "Test", Some("123123123"))];
        assert!(resolve("./Directory", &modules, &directories, None).is_err());
    }

    #[test]
    fn test_prefers_files_over_folders() {
        let directories = [
            directory("123123123", "Directory", None),
            directory("1312423432", "Test", Some("123123123")),
        ];
        let modules = [
            module("12666", "Test", None),
            module("123123", "index", Some("123123123")),
        ];
        let resolved = resolve("./Test", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_prefers_sibling_file_over_directory_index() {
        // A directory `Test` with an index next to a module `Test`:
        // the module wins.
        let directories = [directory("909090", "Test", None)];
        let modules = [
            module("1", "index", Some("909090")),
            module("2", "Test", None),
        ];
        let resolved = resolve("./Test", &modules, &directories, None).unwrap();
        assert_eq!(resolved, &modules[1]);
    }

    #[test]
    fn test_prefers_files_over_generic_index() {
        let modules = [module("123123", "index", None), module("12666", "Test", None)];
        let resolved = resolve("./Test", &modules, &[], None).unwrap();
        assert_eq!(resolved, &modules[1]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let directories = [directory("123123123", "Directory", None)];
        let modules = [
            module("12666", "Test", None),
            module("123123", "index", Some("123123123")),
        ];
        let first = resolve("./Test", &modules, &directories, None).unwrap();
        for _ in 0..3 {
            assert_eq!(resolve("./Test", &modules, &directories, None).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_string_parent_means_root() {
        let modules = [Module {
            id: "123123".to_string(),
            title: "Test".to_string(),
            code: String::new(),
            directory_shortid: Some(String::new()),
        }];
        let resolved = resolve("./Test", &modules, &[], None).unwrap();
        assert_eq!(resolved, &modules[0]);
    }

    #[test]
    fn test_module_path_at_root() {
        let modules = [module("1", "index", None)];
        assert_eq!(module_path(&modules, &[], "1").as_deref(), Some("index"));
    }

    #[test]
    fn test_module_path_nested() {
        let directories = [
            directory("a", "src", None),
            directory("b", "components", Some("a")),
        ];
        let modules = [module("1", "Button", Some("b"))];
        assert_eq!(
            module_path(&modules, &directories, "1").as_deref(),
            Some("src/components/Button")
        );
    }

    #[test]
    fn test_module_path_unknown_id() {
        assert_eq!(module_path(&[], &[], "nope"), None);
    }
}
