use bevy_ecs::prelude::*;
use glam::Vec3;
use strike_math::Aabb;
use tracing::trace;

/// Generational handle to a node in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index inside the graph. Only unique together with the generation.
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Explicit hit-region tag carried by a node (e.g. a dedicated head hitbox).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitRegion {
    Head,
    Body,
    Limb,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Offset from the parent (or world origin for roots).
    position: Vec3,
    /// Half-extents of the hit-test box centered on the node, if any.
    bounds: Option<Vec3>,
    hit_region: Option<HitRegion>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of scene nodes linked by parent/child edges.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Creates a node under `parent` (or as a root) at the given local offset.
    ///
    /// A stale or unknown parent handle spawns the node as a root.
    pub fn spawn(&mut self, parent: Option<NodeId>, position: Vec3) -> NodeId {
        let parent = parent.filter(|p| self.contains(*p));
        let node = Node {
            parent,
            children: Vec::new(),
            position,
            bounds: None,
            hit_region: None,
        };

        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        };

        if let Some(p) = parent
            && let Some(parent_node) = self.node_mut(p)
        {
            parent_node.children.push(id);
        }
        self.live += 1;
        trace!(?id, ?parent, "spawned scene node");
        id
    }

    /// Removes `id` and its whole subtree. Returns the number of nodes removed.
    pub fn despawn(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        if let Some(p) = self.parent(id)
            && let Some(parent_node) = self.node_mut(p)
        {
            parent_node.children.retain(|c| *c != id);
        }

        let mut doomed = self.descendants(id);
        doomed.push(id);
        for n in &doomed {
            let slot = &mut self.slots[n.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.index);
        }
        self.live -= doomed.len();
        trace!(?id, removed = doomed.len(), "despawned scene subtree");
        doomed.len()
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All nodes below `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.parent(id),
        }
    }

    /// Local offset of the node relative to its parent.
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.node(id).map(|n| n.position)
    }

    /// Sets the local offset. Returns false for a stale handle.
    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.position = position;
                true
            }
            None => false,
        }
    }

    /// World-space position: the node's offset plus every ancestor's offset.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let local = self.position(id)?;
        Some(
            self.ancestors(id)
                .filter_map(|a| self.position(a))
                .fold(local, |acc, p| acc + p),
        )
    }

    /// Gives the node a hit-test box of the given half-extents around its
    /// world position.
    pub fn set_bounds(&mut self, id: NodeId, half_extents: Vec3) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.bounds = Some(half_extents.abs());
                true
            }
            None => false,
        }
    }

    /// World-space hit-test box of the node, if it has bounds.
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let half = self.node(id)?.bounds?;
        let center = self.world_position(id)?;
        Some(Aabb::from_center_half_extents(center, half))
    }

    pub fn set_hit_region(&mut self, id: NodeId, region: HitRegion) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.hit_region = Some(region);
                true
            }
            None => false,
        }
    }

    pub fn hit_region(&self, id: NodeId) -> Option<HitRegion> {
        self.node(id).and_then(|n| n.hit_region)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}

/// Iterator over a node's parent chain. See [`SceneGraph::ancestors`].
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// scene_root -> body -> (head, arm)
    fn rig(graph: &mut SceneGraph) -> (NodeId, NodeId, NodeId, NodeId) {
        let scene_root = graph.spawn(None, Vec3::ZERO);
        let body = graph.spawn(Some(scene_root), Vec3::new(5.0, 0.0, 0.0));
        let head = graph.spawn(Some(body), Vec3::new(0.0, 1.6, 0.0));
        let arm = graph.spawn(Some(body), Vec3::new(0.4, 1.2, 0.0));
        (scene_root, body, head, arm)
    }

    #[test]
    fn test_spawn_links_parent_and_children() {
        let mut graph = SceneGraph::new();
        let (scene_root, body, head, arm) = rig(&mut graph);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.parent(body), Some(scene_root));
        assert_eq!(graph.children(body), &[head, arm]);
        assert_eq!(graph.parent(scene_root), None);
    }

    #[test]
    fn test_descendants_exclude_self_and_ancestors() {
        let mut graph = SceneGraph::new();
        let (scene_root, body, head, arm) = rig(&mut graph);
        let desc = graph.descendants(body);
        assert_eq!(desc, vec![head, arm]);
        assert!(!desc.contains(&scene_root));
        assert!(!desc.contains(&body));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut graph = SceneGraph::new();
        let (scene_root, body, head, _) = rig(&mut graph);
        let chain: Vec<_> = graph.ancestors(head).collect();
        assert_eq!(chain, vec![body, scene_root]);
        assert_eq!(graph.ancestors(scene_root).count(), 0);
    }

    #[test]
    fn test_world_position_accumulates_offsets() {
        let mut graph = SceneGraph::new();
        let (_, _, head, _) = rig(&mut graph);
        assert_eq!(graph.world_position(head), Some(Vec3::new(5.0, 1.6, 0.0)));
    }

    #[test]
    fn test_despawn_removes_subtree_and_invalidates_handles() {
        let mut graph = SceneGraph::new();
        let (scene_root, body, head, arm) = rig(&mut graph);
        assert_eq!(graph.despawn(body), 3);
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(body));
        assert!(!graph.contains(head));
        assert!(!graph.contains(arm));
        assert!(graph.children(scene_root).is_empty());
        assert_eq!(graph.despawn(body), 0);
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn(None, Vec3::ZERO);
        graph.despawn(a);
        let b = graph.spawn(None, Vec3::ONE);
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(!graph.contains(a));
        assert_eq!(graph.position(a), None);
        assert_eq!(graph.position(b), Some(Vec3::ONE));
        assert!(!graph.set_position(a, Vec3::ZERO));
    }

    #[test]
    fn test_spawn_with_stale_parent_becomes_root() {
        let mut graph = SceneGraph::new();
        let gone = graph.spawn(None, Vec3::ZERO);
        graph.despawn(gone);
        let orphan = graph.spawn(Some(gone), Vec3::ZERO);
        assert_eq!(graph.parent(orphan), None);
    }

    #[test]
    fn test_hit_region_and_bounds() {
        let mut graph = SceneGraph::new();
        let (_, body, head, _) = rig(&mut graph);
        assert_eq!(graph.hit_region(head), None);
        graph.set_hit_region(head, HitRegion::Head);
        assert_eq!(graph.hit_region(head), Some(HitRegion::Head));

        assert!(graph.world_bounds(body).is_none());
        graph.set_bounds(body, Vec3::new(0.3, 0.9, 0.3));
        let b = graph.world_bounds(body).unwrap();
        assert_eq!(b.center(), Vec3::new(5.0, 0.0, 0.0));
    }
}
