//! Alias redirections and hierarchical path joining
//!
//! When an object is renamed with `Alias`, its old path is registered here.
//! Every child path computed afterwards is looked up once and replaced by the
//! corrected path if a redirection exists. Paths computed before the rename
//! are not revisited.

use std::collections::HashMap;

/// Separator used in dump hierarchy paths
pub const PATH_SEPARATOR: char = '\\';

/// Join a parent path and a child name
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return parent.to_string();
    }

    let mut joined = String::with_capacity(parent.len() + name.len() + 1);
    joined.push_str(parent);
    if !parent.ends_with(PATH_SEPARATOR) {
        joined.push(PATH_SEPARATOR);
    }
    joined.push_str(name);
    joined
}

/// Everything before the last separator; empty when there is none
pub fn parent_path(path: &str) -> &str {
    path.rfind(PATH_SEPARATOR)
        .map(|index| &path[..index])
        .unwrap_or("")
}

/// Old path to corrected path, scoped to one parse pass
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    redirects: HashMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, old_path: String, new_path: String) {
        self.redirects.insert(old_path, new_path);
    }

    /// The redirected path, or the input when none is registered
    pub fn resolve(&self, path: String) -> String {
        match self.redirects.get(&path) {
            Some(redirect) => redirect.clone(),
            None => path,
        }
    }

    /// Join `parent` and `name`, then apply any redirection
    pub fn child_path(&self, parent: &str, name: &str) -> String {
        self.resolve(join_path(parent, name))
    }

    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }
}
