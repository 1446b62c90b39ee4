//! Category subtree resolution.
//!
//! Note listing can be scoped to "this folder and everything under it". The
//! tree is implicit in the `parent_id` column, so the resolver builds a
//! parent-to-children adjacency map from the full rowset in one scan and
//! expands from the root with an explicit worklist.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::Category;

/// Ids of `root` and every category transitively reachable from it through
/// `parent_id` links. The visited set doubles as a cycle guard: a malformed
/// parent chain terminates instead of looping.
///
/// `root` is always a member, even when it does not appear in `categories`.
pub fn resolve_subtree(categories: &[Category], root: Uuid) -> HashSet<Uuid> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent_id {
            children.entry(parent).or_default().push(category.id);
        }
    }

    let mut members = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !members.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().copied());
        }
    }
    members
}
