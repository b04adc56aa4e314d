//! Scoped label grouping and selection.
//!
//! Labels named `scope::value` are mutually exclusive within their scope. A
//! scope that only has one label behaves like a plain label.

use serde::Serialize;

use crate::types::profile::Label;

/// Labels of one scope, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedGroup {
    pub scope: String,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelGroups {
    pub global: Vec<Label>,
    pub scoped: Vec<ScopedGroup>,
}

/// Returns the scope part of a scoped label name, or `None` for plain labels.
pub fn scope_of(name: &str) -> Option<&str> {
    name.split_once("::").map(|(scope, _)| scope)
}

/// Splits labels into plain labels and scope groups.
///
/// Single-member scopes are appended to `global` after the plain labels.
pub fn group_by_scope(labels: &[Label]) -> LabelGroups {
    let mut global = Vec::new();
    let mut groups: Vec<ScopedGroup> = Vec::new();

    for label in labels {
        match scope_of(&label.name) {
            None => global.push(label.clone()),
            Some(scope) => match groups.iter_mut().find(|g| g.scope == scope) {
                Some(group) => group.labels.push(label.clone()),
                None => groups.push(ScopedGroup {
                    scope: scope.to_string(),
                    labels: vec![label.clone()],
                }),
            },
        }
    }

    let mut scoped = Vec::new();
    for mut group in groups {
        if group.labels.len() == 1 {
            global.append(&mut group.labels);
        } else {
            scoped.push(group);
        }
    }

    LabelGroups { global, scoped }
}

/// The labels that will be attached to an issue.
///
/// Every plain label is always selected; each scope contributes at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelection {
    global: Vec<String>,
    scoped: Vec<(String, String)>,
}

impl LabelSelection {
    /// Selects all plain labels and the first label of every scope.
    pub fn new(groups: &LabelGroups) -> Self {
        Self {
            global: groups.global.iter().map(|l| l.name.clone()).collect(),
            scoped: groups
                .scoped
                .iter()
                .filter_map(|g| g.labels.first().map(|l| (g.scope.clone(), l.name.clone())))
                .collect(),
        }
    }

    /// Replaces the choice for `scope`; `None` clears it.
    pub fn select_scoped(&mut self, scope: &str, label: Option<&str>) {
        self.scoped.retain(|(s, _)| s != scope);
        if let Some(name) = label {
            self.scoped.push((scope.to_string(), name.to_string()));
        }
    }

    /// Plain labels first, then scoped choices in selection order.
    pub fn selected_names(&self) -> Vec<String> {
        self.global
            .iter()
            .cloned()
            .chain(self.scoped.iter().map(|(_, name)| name.clone()))
            .collect()
    }
}
