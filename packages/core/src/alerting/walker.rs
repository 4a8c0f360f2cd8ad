//! Routing tree traversal.
//!
//! Both walks use an explicit work-list instead of recursion, so a deeply
//! nested tree costs heap, not stack.

use super::types::Route;

/// Deepest routing tree accepted by the validator. The root alone has
/// depth 1.
///
/// Each level costs serde_json two nesting levels (the route object and its
/// `routes` array) out of its limit of 128, so this stays low enough that a
/// decoded tree reaches the depth check instead of failing to parse.
pub const MAX_ROUTE_DEPTH: usize = 60;

/// Every receiver name referenced by `route` and its descendants, root
/// first, then each child subtree left to right. Names are not
/// de-duplicated; routes without a receiver contribute nothing.
pub fn all_receivers(route: &Route) -> Vec<&str> {
    let mut names = Vec::new();
    let mut pending = vec![route];

    while let Some(node) = pending.pop() {
        if let Some(name) = node.receiver.as_deref() {
            names.push(name);
        }
        // Reversed so the leftmost child is popped next.
        pending.extend(node.routes.iter().rev());
    }

    names
}

/// Number of levels in the tree rooted at `route`.
pub fn depth(route: &Route) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(route, 1)];

    while let Some((node, level)) = pending.pop() {
        deepest = deepest.max(level);
        pending.extend(node.routes.iter().map(|child| (child, level + 1)));
    }

    deepest
}
