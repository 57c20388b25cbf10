//! Selection closure: a node set expanded by ancestors and/or descendants.

use rustc_hash::FxHashSet;

use crate::scene::NodeHandle;
use crate::scene::scene::Scene;

/// Expands a selection before it is handed to the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosureCollector {
    pub include_ancestors: bool,
    pub include_descendants: bool,
}

impl ClosureCollector {
    #[must_use]
    pub fn new(include_ancestors: bool, include_descendants: bool) -> Self {
        Self {
            include_ancestors,
            include_descendants,
        }
    }

    /// Returns `roots` (deduplicated, input order) followed by every node
    /// discovered while expanding, in discovery order.
    ///
    /// Nodes appended during the walk are themselves expanded, so ancestor
    /// expansion reaches the top of the hierarchy one parent at a time and
    /// the result is a fixed point: expanding it again yields the same set.
    /// Opted-out nodes are never added by expansion. Descendants below an
    /// opted-out node are still added; ancestor expansion stops at an
    /// opted-out parent.
    #[must_use]
    pub fn expand(&self, scene: &Scene, roots: &[NodeHandle]) -> Vec<NodeHandle> {
        let mut list: Vec<NodeHandle> = Vec::with_capacity(roots.len());
        let mut seen: FxHashSet<NodeHandle> = FxHashSet::default();

        for &root in roots {
            if !scene.nodes.contains_key(root) {
                log::warn!("expand: stale node handle {root:?}");
                continue;
            }
            if seen.insert(root) {
                list.push(root);
            }
        }

        // The bound is re-read every iteration: entries appended below must
        // be visited too.
        let mut i = 0;
        while i < list.len() {
            let current = list[i];
            i += 1;

            if self.include_descendants {
                for descendant in self.serializable_descendants(scene, current) {
                    if seen.insert(descendant) {
                        list.push(descendant);
                    }
                }
            }

            if self.include_ancestors
                && let Some(parent) = scene.get_node(current).and_then(|n| n.parent())
                && let Some(parent_node) = scene.get_node(parent)
                && !parent_node.do_not_serialize
                && seen.insert(parent)
            {
                list.push(parent);
            }
        }

        log::debug!(
            "Selection closure: {} root(s) expanded to {} node(s)",
            roots.len(),
            list.len()
        );
        list
    }

    // Pre-order. Each node is filtered on its own flag, so an opted-out
    // parent does not hide its children.
    fn serializable_descendants(&self, scene: &Scene, handle: NodeHandle) -> Vec<NodeHandle> {
        scene
            .descendants(handle)
            .into_iter()
            .filter(|&h| scene.get_node(h).is_some_and(|n| !n.do_not_serialize))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(scene: &mut Scene) -> (NodeHandle, NodeHandle, NodeHandle) {
        let grandparent = scene.add_transform_node("gp");
        let parent = scene.add_transform_node_to_parent("p", grandparent);
        let child = scene.add_transform_node_to_parent("c", parent);
        (grandparent, parent, child)
    }

    #[test]
    fn ancestors_reach_the_top() {
        let mut scene = Scene::new();
        let (gp, p, c) = chain(&mut scene);
        let out = ClosureCollector::new(true, false).expand(&scene, &[c]);
        assert_eq!(out, vec![c, p, gp]);
    }

    #[test]
    fn duplicate_roots_are_collapsed() {
        let mut scene = Scene::new();
        let (gp, p, _) = chain(&mut scene);
        let out = ClosureCollector::new(false, false).expand(&scene, &[p, gp, p]);
        assert_eq!(out, vec![p, gp]);
    }

    #[test]
    fn opted_out_parent_skips_only_itself() {
        let mut scene = Scene::new();
        let (gp, p, c) = chain(&mut scene);
        scene.get_node_mut(p).unwrap().do_not_serialize = true;
        let out = ClosureCollector::new(false, true).expand(&scene, &[gp]);
        assert_eq!(out, vec![gp, c]);
    }

    #[test]
    fn ancestors_stop_at_opted_out_parent() {
        let mut scene = Scene::new();
        let (_, p, c) = chain(&mut scene);
        scene.get_node_mut(p).unwrap().do_not_serialize = true;
        let out = ClosureCollector::new(true, false).expand(&scene, &[c]);
        assert_eq!(out, vec![c]);
    }

    #[test]
    fn dangling_child_handle_is_ignored() {
        let mut scene = Scene::new();
        let (gp, p, c) = chain(&mut scene);
        scene.nodes.remove(c);
        let out = ClosureCollector::new(false, true).expand(&scene, &[gp]);
        assert_eq!(out, vec![gp, p]);
    }
}
