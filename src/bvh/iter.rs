use crate::aabb::{Bounded, IntersectsAabb};
use crate::bounding_hierarchy::BHValue;
use crate::bvh::{Bvh, BvhNode};

/// Iterator to traverse a [`Bvh`] with an explicit stack instead of recursion.
/// Yields the same shapes in the same order as [`Bvh::traverse`].
pub struct BvhTraverseIterator<'bvh, 'shape, T: BHValue, Query: IntersectsAabb<T>, Shape: Bounded<T>>
{
    /// Reference to the input query
    query: &'bvh Query,
    /// Reference to the input shapes array
    shapes: &'shape [Shape],
    /// Nodes still to be visited, the next one on top.
    stack: Vec<&'bvh BvhNode<T>>,
    /// Shape indices of the current leaf which have not been yielded yet.
    pending: std::slice::Iter<'bvh, usize>,
}

impl<'bvh, 'shape, T: BHValue, Query: IntersectsAabb<T>, Shape: Bounded<T>>
    BvhTraverseIterator<'bvh, 'shape, T, Query, Shape>
{
    /// Creates a new [`BvhTraverseIterator`]
    pub fn new(bvh: &'bvh Bvh<T>, query: &'bvh Query, shapes: &'shape [Shape]) -> Self {
        let mut stack = Vec::with_capacity(bvh.depth() as usize + 1);
        if query.intersects_aabb(bvh.root.bounds()) {
            stack.push(&bvh.root);
        }
        BvhTraverseIterator {
            query,
            shapes,
            stack,
            pending: (&[] as &[usize]).iter(),
        }
    }
}

impl<'bvh, 'shape, T: BHValue, Query: IntersectsAabb<T>, Shape: Bounded<T>> Iterator
    for BvhTraverseIterator<'bvh, 'shape, T, Query, Shape>
{
    type Item = &'shape Shape;

    fn next(&mut self) -> Option<&'shape Shape> {
        loop {
            if let Some(&index) = self.pending.next() {
                return Some(&self.shapes[index]);
            }

            match self.stack.pop()? {
                BvhNode::Leaf { shape_indices, .. } => {
                    self.pending = shape_indices.iter();
                }
                BvhNode::Node {
                    child_l, child_r, ..
                } => {
                    // Right goes first so that the left subtree is visited first.
                    if self.query.intersects_aabb(child_r.bounds()) {
                        self.stack.push(child_r);
                    }
                    if self.query.intersects_aabb(child_l.bounds()) {
                        self.stack.push(child_l);
                    }
                }
            }
        }
    }
}

/// Iterator over the leaves of a [`Bvh`], depth-first and left to right.
pub struct LeafIterator<'bvh, T: BHValue> {
    stack: Vec<&'bvh BvhNode<T>>,
}

impl<'bvh, T: BHValue> LeafIterator<'bvh, T> {
    pub(crate) fn new(root: &'bvh BvhNode<T>) -> Self {
        LeafIterator { stack: vec![root] }
    }
}

impl<'bvh, T: BHValue> Iterator for LeafIterator<'bvh, T> {
    type Item = &'bvh BvhNode<T>;

    fn next(&mut self) -> Option<&'bvh BvhNode<T>> {
        loop {
            let node = self.stack.pop()?;
            match node {
                BvhNode::Leaf { .. } => return Some(node),
                BvhNode::Node {
                    child_l, child_r, ..
                } => {
                    self.stack.push(child_r);
                    self.stack.push(child_l);
                }
            }
        }
    }
}
