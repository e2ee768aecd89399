//! Arena-backed transform hierarchy.
//!
//! Nodes live in slots addressed by generational [`TransformId`]s. Parent and
//! child links are ids into the same arena, so the tree owns every node and
//! no link can outlive its target unnoticed.
//!
//! World matrices are cached per node behind a dirty flag. Both live in
//! [`Cell`]s so queries only need `&self`. A node that is dirty always has
//! dirty descendants, which lets [`TransformTree::mark_dirty`] stop early.

use std::cell::Cell;
use std::fmt;

use glam::{Mat4, Quat, Vec3};

use super::{look_rotation, Transform, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};

/// Handle to a node in a [`TransformTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId {
    index: u32,
    generation: u32,
}

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Errors produced by [`TransformTree`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    /// The id does not name a live node (never inserted, or removed).
    StaleHandle(TransformId),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle(id) => {
                write!(f, "transform {id} is not in the tree")
            }
        }
    }
}

impl std::error::Error for TransformError {}

struct Node {
    local: Transform,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
    world: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Node {
    fn new(local: Transform) -> Self {
        Self {
            local,
            parent: None,
            children: Vec::new(),
            world: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owner of a forest of transforms.
#[derive(Default)]
pub struct TransformTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl TransformTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` names a live node.
    #[must_use]
    pub fn contains(&self, id: TransformId) -> bool {
        self.node(id).is_ok()
    }

    /// Add a root node with the given local transform.
    pub fn insert(&mut self, local: Transform) -> TransformId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(local));
            return TransformId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(local)),
        });
        TransformId {
            index,
            generation: 0,
        }
    }

    /// Remove a node and return its local transform.
    ///
    /// The node is detached from its parent. Its children become roots and
    /// keep their world position and rotation.
    pub fn remove(
        &mut self,
        id: TransformId,
    ) -> Result<Transform, TransformError> {
        self.set_parent(id, None)?;
        let children = self.node(id)?.children.clone();
        for child in children {
            self.set_parent(child, None)?;
        }

        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take().ok_or(TransformError::StaleHandle(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        log::debug!("removed transform {id}");
        Ok(node.local)
    }

    /// Local transform of a node.
    pub fn get(&self, id: TransformId) -> Result<&Transform, TransformError> {
        Ok(&self.node(id)?.local)
    }

    // ── Local space ──

    /// Overwrite the local position and invalidate the subtree.
    pub fn set_local_position(
        &mut self,
        id: TransformId,
        position: Vec3,
    ) -> Result<(), TransformError> {
        self.node_mut(id)?.local.position = position;
        self.mark_dirty(id)
    }

    /// Overwrite the local rotation and invalidate the subtree.
    pub fn set_local_rotation(
        &mut self,
        id: TransformId,
        rotation: Quat,
    ) -> Result<(), TransformError> {
        self.node_mut(id)?.local.rotation = rotation;
        self.mark_dirty(id)
    }

    /// Overwrite the local scale and invalidate the subtree.
    pub fn set_local_scale(
        &mut self,
        id: TransformId,
        scale: Vec3,
    ) -> Result<(), TransformError> {
        self.node_mut(id)?.local.scale = scale;
        self.mark_dirty(id)
    }

    /// Local position.
    pub fn local_position(
        &self,
        id: TransformId,
    ) -> Result<Vec3, TransformError> {
        Ok(self.node(id)?.local.position)
    }

    /// Local rotation.
    pub fn local_rotation(
        &self,
        id: TransformId,
    ) -> Result<Quat, TransformError> {
        Ok(self.node(id)?.local.rotation)
    }

    /// Local scale.
    pub fn local_scale(&self, id: TransformId) -> Result<Vec3, TransformError> {
        Ok(self.node(id)?.local.scale)
    }

    /// Local `T * R * S` matrix.
    pub fn local_matrix(
        &self,
        id: TransformId,
    ) -> Result<Mat4, TransformError> {
        Ok(self.node(id)?.local.matrix())
    }

    // ── World space ──

    /// World matrix, recomputed from the parent chain only when dirty.
    pub fn world_matrix(
        &self,
        id: TransformId,
    ) -> Result<Mat4, TransformError> {
        let node = self.node(id)?;
        if node.dirty.get() {
            let local = node.local.matrix();
            let world = match node.parent {
                Some(parent) => self.world_matrix(parent)? * local,
                None => local,
            };
            node.world.set(world);
            node.dirty.set(false);
        }
        Ok(node.world.get())
    }

    /// World-space position.
    pub fn world_position(
        &self,
        id: TransformId,
    ) -> Result<Vec3, TransformError> {
        let node = self.node(id)?;
        if node.parent.is_none() {
            return Ok(node.local.position);
        }
        Ok(self.world_matrix(id)?.w_axis.truncate())
    }

    /// World-space rotation.
    pub fn world_rotation(
        &self,
        id: TransformId,
    ) -> Result<Quat, TransformError> {
        let node = self.node(id)?;
        if node.parent.is_none() {
            return Ok(node.local.rotation);
        }
        let (_, rotation, _) =
            self.world_matrix(id)?.to_scale_rotation_translation();
        Ok(rotation)
    }

    /// World-space scale, read off the world matrix basis lengths.
    ///
    /// Approximate when a parent combines rotation with non-uniform scale.
    pub fn world_scale(&self, id: TransformId) -> Result<Vec3, TransformError> {
        let node = self.node(id)?;
        if node.parent.is_none() {
            return Ok(node.local.scale);
        }
        let world = self.world_matrix(id)?;
        Ok(Vec3::new(
            world.x_axis.truncate().length(),
            world.y_axis.truncate().length(),
            world.z_axis.truncate().length(),
        ))
    }

    /// Place a node at a world-space position.
    pub fn set_world_position(
        &mut self,
        id: TransformId,
        position: Vec3,
    ) -> Result<(), TransformError> {
        let local = match self.node(id)?.parent {
            Some(parent) => self
                .world_matrix(parent)?
                .inverse()
                .transform_point3(position),
            None => position,
        };
        self.set_local_position(id, local)
    }

    /// Orient a node with a world-space rotation.
    pub fn set_world_rotation(
        &mut self,
        id: TransformId,
        rotation: Quat,
    ) -> Result<(), TransformError> {
        let local = match self.node(id)?.parent {
            Some(parent) => self.world_rotation(parent)?.inverse() * rotation,
            None => rotation,
        };
        self.set_local_rotation(id, local)
    }

    /// World forward direction (`-Z` rotated).
    pub fn forward(&self, id: TransformId) -> Result<Vec3, TransformError> {
        Ok(self.world_rotation(id)? * WORLD_FORWARD)
    }

    /// World up direction (`+Y` rotated).
    pub fn up(&self, id: TransformId) -> Result<Vec3, TransformError> {
        Ok(self.world_rotation(id)? * WORLD_UP)
    }

    /// World right direction (`+X` rotated).
    pub fn right(&self, id: TransformId) -> Result<Vec3, TransformError> {
        Ok(self.world_rotation(id)? * WORLD_RIGHT)
    }

    /// Rotate a node so its world forward points at `target`.
    ///
    /// Degenerate directions leave the rotation unchanged.
    pub fn look_at(
        &mut self,
        id: TransformId,
        target: Vec3,
        up: Vec3,
    ) -> Result<(), TransformError> {
        let eye = self.world_position(id)?;
        match look_rotation(target - eye, up) {
            Some(rotation) => self.set_world_rotation(id, rotation),
            None => {
                log::debug!("look_at on {id}: degenerate direction, ignored");
                Ok(())
            }
        }
    }

    // ── Hierarchy ──

    /// Parent of a node, if any.
    pub fn parent(
        &self,
        id: TransformId,
    ) -> Result<Option<TransformId>, TransformError> {
        Ok(self.node(id)?.parent)
    }

    /// Direct children of a node, in attachment order.
    pub fn children(
        &self,
        id: TransformId,
    ) -> Result<&[TransformId], TransformError> {
        Ok(&self.node(id)?.children)
    }

    /// Reattach a node under `parent` (or make it a root with `None`).
    ///
    /// The node keeps its world position and rotation; its local values are
    /// rewritten relative to the new parent. Parenting a node to itself or to
    /// one of its descendants is ignored.
    pub fn set_parent(
        &mut self,
        id: TransformId,
        parent: Option<TransformId>,
    ) -> Result<(), TransformError> {
        let old_parent = self.node(id)?.parent;
        if old_parent == parent {
            return Ok(());
        }
        if let Some(new_parent) = parent {
            let _ = self.node(new_parent)?;
            if new_parent == id || self.is_ancestor(id, new_parent)? {
                log::warn!(
                    "set_parent: {new_parent} is {id} or its descendant, \
                     ignored"
                );
                return Ok(());
            }
        }

        let world_position = self.world_position(id)?;
        let world_rotation = self.world_rotation(id)?;

        if let Some(old) = old_parent {
            self.node_mut(old)?.children.retain(|&child| child != id);
        }
        self.node_mut(id)?.parent = parent;
        if let Some(new_parent) = parent {
            let siblings = &mut self.node_mut(new_parent)?.children;
            if !siblings.contains(&id) {
                siblings.push(id);
            }
        }

        self.mark_dirty(id)?;
        self.set_world_position(id, world_position)?;
        self.set_world_rotation(id, world_rotation)
    }

    /// Attach `child` under `parent`. Already-attached children are left as
    /// they are.
    pub fn add_child(
        &mut self,
        parent: TransformId,
        child: TransformId,
    ) -> Result<(), TransformError> {
        self.set_parent(child, Some(parent))
    }

    /// Detach `child` from `parent`, making it a root. Does nothing if
    /// `child` is not a child of `parent`.
    pub fn remove_child(
        &mut self,
        parent: TransformId,
        child: TransformId,
    ) -> Result<(), TransformError> {
        let _ = self.node(parent)?;
        if self.node(child)?.parent == Some(parent) {
            self.set_parent(child, None)?;
        }
        Ok(())
    }

    /// Whether `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(
        &self,
        ancestor: TransformId,
        id: TransformId,
    ) -> Result<bool, TransformError> {
        let mut current = self.node(id)?.parent;
        while let Some(node) = current {
            if node == ancestor {
                return Ok(true);
            }
            current = self.node(node)?.parent;
        }
        Ok(false)
    }

    /// Invalidate the cached world matrix of a node and its descendants.
    pub fn mark_dirty(&self, id: TransformId) -> Result<(), TransformError> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            // Dirty nodes already have dirty descendants, except the root of
            // this call whose local state just changed.
            if node.dirty.replace(true) && current != id {
                continue;
            }
            stack.extend_from_slice(&node.children);
        }
        Ok(())
    }

    fn node(&self, id: TransformId) -> Result<&Node, TransformError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(TransformError::StaleHandle(id))
    }

    fn node_mut(
        &mut self,
        id: TransformId,
    ) -> Result<&mut Node, TransformError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TransformError::StaleHandle(id))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_pose_eq(a: (Vec3, Quat), b: (Vec3, Quat)) {
        assert!(a.0.abs_diff_eq(b.0, 1e-4), "{:?} != {:?}", a.0, b.0);
        // q and -q are the same rotation
        assert!(a.1.dot(b.1).abs() > 1.0 - 1e-4, "{:?} != {:?}", a.1, b.1);
    }

    fn pose(
        tree: &TransformTree,
        id: TransformId,
    ) -> Result<(Vec3, Quat), TransformError> {
        Ok((tree.world_position(id)?, tree.world_rotation(id)?))
    }

    #[test]
    fn root_world_matrix_is_local_matrix() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let local = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_x(0.3),
            Vec3::splat(2.0),
        );
        let id = tree.insert(local);
        assert_eq!(tree.world_matrix(id)?, local.matrix());
        assert_eq!(tree.world_position(id)?, local.position);
        Ok(())
    }

    #[test]
    fn child_world_is_parent_world_times_local() -> Result<(), TransformError>
    {
        let mut tree = TransformTree::new();
        let parent = tree.insert(Transform::new(
            Vec3::new(5.0, 0.0, 0.0),
            Quat::from_rotation_y(FRAC_PI_2),
            Vec3::ONE,
        ));
        let child = tree.insert(Transform::default());
        tree.add_child(parent, child)?;
        tree.set_local_position(child, Vec3::new(0.0, 0.0, -1.0))?;

        let expected = tree.world_matrix(parent)? * tree.local_matrix(child)?;
        assert!(tree.world_matrix(child)?.abs_diff_eq(expected, 1e-5));
        // -Z rotated a quarter turn about Y is -X
        assert!(tree
            .world_position(child)?
            .abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
        Ok(())
    }

    #[test]
    fn ancestor_mutation_invalidates_descendants() -> Result<(), TransformError>
    {
        let mut tree = TransformTree::new();
        let a = tree.insert(Transform::default());
        let b = tree.insert(Transform::from_position(Vec3::X));
        let c = tree.insert(Transform::from_position(Vec3::X));
        tree.set_parent(b, Some(a))?;
        tree.set_parent(c, Some(b))?;
        tree.set_local_position(b, Vec3::X)?;
        tree.set_local_position(c, Vec3::X)?;

        // Prime every cache, then move the root twice
        let _ = tree.world_matrix(c)?;
        tree.set_local_position(a, Vec3::new(0.0, 10.0, 0.0))?;
        let _ = tree.world_matrix(b)?;
        tree.set_local_position(a, Vec3::new(0.0, 20.0, 0.0))?;

        assert!(tree
            .world_position(c)?
            .abs_diff_eq(Vec3::new(2.0, 20.0, 0.0), 1e-5));
        Ok(())
    }

    #[test]
    fn reparenting_preserves_world_pose() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let a = tree.insert(Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
            Vec3::splat(2.0),
        ));
        let b = tree.insert(Transform::new(
            Vec3::new(-4.0, 0.5, 1.0),
            Quat::from_rotation_z(-1.1) * Quat::from_rotation_x(0.4),
            Vec3::ONE,
        ));
        let node = tree.insert(Transform::new(
            Vec3::new(0.3, -2.0, 7.0),
            Quat::from_rotation_x(0.25),
            Vec3::ONE,
        ));

        for parent in [Some(a), Some(b), None, Some(a), Some(b), None] {
            let before = pose(&tree, node)?;
            tree.set_parent(node, parent)?;
            assert_eq!(tree.parent(node)?, parent);
            assert_pose_eq(before, pose(&tree, node)?);
        }

        // Nested: move `b` under an unscaled rotated root while `node` hangs
        // off `b`. Only position and rotation survive reparenting, so the new
        // parent must not scale.
        let c = tree.insert(Transform::new(
            Vec3::new(2.0, -1.0, 0.0),
            Quat::from_rotation_y(-0.9),
            Vec3::ONE,
        ));
        tree.set_parent(node, Some(b))?;
        let before = pose(&tree, node)?;
        tree.set_parent(b, Some(c))?;
        assert_pose_eq(before, pose(&tree, node)?);
        Ok(())
    }

    #[test]
    fn children_behave_like_a_set() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let parent = tree.insert(Transform::default());
        let child = tree.insert(Transform::default());

        tree.add_child(parent, child)?;
        tree.add_child(parent, child)?;
        assert_eq!(tree.children(parent)?, &[child]);

        let other = tree.insert(Transform::default());
        tree.remove_child(other, child)?;
        assert_eq!(tree.parent(child)?, Some(parent));

        tree.remove_child(parent, child)?;
        assert!(tree.children(parent)?.is_empty());
        assert_eq!(tree.parent(child)?, None);
        Ok(())
    }

    #[test]
    fn self_and_cyclic_parenting_are_ignored() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let a = tree.insert(Transform::default());
        let b = tree.insert(Transform::default());
        tree.set_parent(b, Some(a))?;

        tree.set_parent(a, Some(a))?;
        assert_eq!(tree.parent(a)?, None);

        tree.set_parent(a, Some(b))?;
        assert_eq!(tree.parent(a)?, None);
        assert!(tree.children(b)?.is_empty());
        Ok(())
    }

    #[test]
    fn stale_handles_are_reported() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let parent = tree.insert(Transform::from_position(Vec3::Y));
        let child = tree.insert(Transform::from_position(Vec3::X));
        tree.set_parent(child, Some(parent))?;

        let removed = tree.remove(parent)?;
        assert_eq!(removed.position, Vec3::Y);
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.world_position(parent),
            Err(TransformError::StaleHandle(parent))
        );

        // The orphan became a root at its old world position
        assert_eq!(tree.parent(child)?, None);
        assert!(tree.world_position(child)?.abs_diff_eq(Vec3::X, 1e-5));

        // A reused slot does not resurrect the old id
        let fresh = tree.insert(Transform::default());
        assert!(tree.contains(fresh));
        assert!(!tree.contains(parent));
        Ok(())
    }

    #[test]
    fn world_setters_convert_into_parent_space() -> Result<(), TransformError>
    {
        let mut tree = TransformTree::new();
        let parent = tree.insert(Transform::new(
            Vec3::new(0.0, 3.0, 0.0),
            Quat::from_rotation_y(FRAC_PI_2),
            Vec3::splat(0.5),
        ));
        let child = tree.insert(Transform::default());
        tree.set_parent(child, Some(parent))?;

        let target = Vec3::new(1.0, 1.0, 1.0);
        let rotation = Quat::from_rotation_x(0.6);
        tree.set_world_position(child, target)?;
        tree.set_world_rotation(child, rotation)?;
        assert_pose_eq(pose(&tree, child)?, (target, rotation));
        Ok(())
    }

    #[test]
    fn look_at_orients_world_forward() -> Result<(), TransformError> {
        let mut tree = TransformTree::new();
        let parent = tree.insert(Transform::new(
            Vec3::ZERO,
            Quat::from_rotation_y(1.0),
            Vec3::ONE,
        ));
        let eye =
            tree.insert(Transform::from_position(Vec3::new(0.0, 1.0, 5.0)));
        tree.set_parent(eye, Some(parent))?;

        let target = Vec3::new(2.0, 1.0, -3.0);
        tree.look_at(eye, target, WORLD_UP)?;
        let expected = (target - tree.world_position(eye)?).normalize();
        assert!(tree.forward(eye)?.abs_diff_eq(expected, 1e-4));
        Ok(())
    }
}
