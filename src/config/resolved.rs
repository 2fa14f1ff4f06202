//! Resolved resource model: config validated and flattened for runtime use.

use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
pub struct ResolvedResource {
    pub name: String,
    /// Document name under the storage root (e.g. "packages.json").
    pub file_name: String,
    /// First character of the name; generated ids look like `p_1a2b3c4d`.
    pub id_prefix: char,
    /// Field names to strip from all API responses (sensitive data).
    pub sensitive_fields: HashSet<String>,
    pub password_field: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResourceModel {
    pub resources: Vec<ResolvedResource>,
    pub resource_by_path: HashMap<String, ResolvedResource>,
}

impl ResourceModel {
    pub fn resource_by_path(&self, path: &str) -> Option<&ResolvedResource> {
        self.resource_by_path.get(path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }
}
