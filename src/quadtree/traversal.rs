//! Utilities to traverse and query the QuadTree structure.

use std::fmt;

use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::extent::Extent;
use crate::quadtree::node::{Bucket, NodeId, PointRecord, Quadrant, Slot};
use crate::quadtree::QuadTree;
use crate::r#type::Coordinate;

/// Pending slots of a depth first walk.
type SlotStack = TinyVec<[(NodeId, Quadrant); 32]>;

/// Queue the four slots of `node` so that they pop in the order of [`Quadrant::ALL`].
#[inline]
fn push_slots(stack: &mut SlotStack, node: NodeId) {
    for quadrant in Quadrant::ALL.into_iter().rev() {
        stack.push((node, quadrant));
    }
}

impl<N: Coordinate, T> QuadTree<N, T> {
    /// Call `visitor` on every record within distance `r` of `(x, y)`.
    ///
    /// Slots are pruned by comparing their extent against the bounding box of the circle (edges
    /// touching count as overlapping), then each record of a surviving bucket is tested by
    /// Euclidean distance. Points at exactly distance `r` are included. Nodes are visited depth
    /// first, quadrants in the order of [`Quadrant::ALL`].
    ///
    /// A negative or NaN radius visits nothing. A destroyed tree visits nothing.
    pub fn query_radius<'a, F>(&'a self, x: N, y: N, r: N, mut visitor: F)
    where
        F: FnMut(&'a PointRecord<N, T>),
    {
        if r.is_nan() || r < N::zero() {
            return;
        }
        let Some(root) = self.root else {
            return;
        };

        let query = Extent::around(x, y, r);

        // Use TinyVec to avoid heap allocations
        let mut stack = SlotStack::new();
        push_slots(&mut stack, root);

        while let Some((id, quadrant)) = stack.pop() {
            let slot = self.nodes[id.get()].slot(quadrant);
            if !slot.extent().overlaps(&query) {
                continue;
            }
            match slot {
                Slot::Branch { child, .. } => push_slots(&mut stack, *child),
                Slot::Bucket(bucket) => {
                    for record in bucket.records.iter() {
                        if record.distance_to(x, y) <= r {
                            visitor(record);
                        }
                    }
                }
            }
        }
    }

    /// Search the tree for records within a given radius.
    ///
    /// - x: x value of query point
    /// - y: y value of query point
    /// - r: radius
    ///
    /// Returns the found records
    pub fn within(&self, x: N, y: N, r: N) -> Vec<&PointRecord<N, T>> {
        let mut result = vec![];
        self.query_radius(x, y, r, |record| result.push(record));
        result
    }

    /// Search the tree for records within a given radius.
    ///
    /// - coord: coordinate of query point
    /// - r: radius
    pub fn within_coord(&self, coord: &impl CoordTrait<T = N>, r: N) -> Vec<&PointRecord<N, T>> {
        self.within(coord.x(), coord.y(), r)
    }

    /// Access the root node of the tree for manual traversal.
    ///
    /// Returns `None` once the tree has been destroyed.
    pub fn root(&self) -> Option<NodeRef<'_, N, T>> {
        self.root.map(|id| NodeRef { tree: self, id })
    }

    /// A printable description of every slot in the tree.
    pub fn dump(&self) -> Dump<'_, N, T> {
        Dump { tree: self }
    }
}

/// An iterator over every record of a [`QuadTree`].
///
/// Created by [`QuadTree::iter`].
pub struct Records<'a, N: Coordinate, T> {
    tree: &'a QuadTree<N, T>,
    stack: SlotStack,
    current: std::slice::Iter<'a, PointRecord<N, T>>,
}

impl<'a, N: Coordinate, T> Records<'a, N, T> {
    pub(crate) fn new(tree: &'a QuadTree<N, T>) -> Self {
        let mut stack = SlotStack::new();
        if let Some(root) = tree.root {
            push_slots(&mut stack, root);
        }
        Self {
            tree,
            stack,
            current: Default::default(),
        }
    }
}

impl<'a, N: Coordinate, T> Iterator for Records<'a, N, T> {
    type Item = &'a PointRecord<N, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.next() {
                return Some(record);
            }
            let (id, quadrant) = self.stack.pop()?;
            match self.tree.nodes[id.get()].slot(quadrant) {
                Slot::Bucket(bucket) => self.current = bucket.records.iter(),
                Slot::Branch { child, .. } => push_slots(&mut self.stack, *child),
            }
        }
    }
}

/// A branch node in the QuadTree.
pub struct NodeRef<'a, N: Coordinate, T> {
    /// The tree that this node is a reference onto
    tree: &'a QuadTree<N, T>,
    id: NodeId,
}

// Derives would require `T: Copy`.
impl<N: Coordinate, T> Clone for NodeRef<'_, N, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Coordinate, T> Copy for NodeRef<'_, N, T> {}

impl<N: Coordinate, T> fmt::Debug for NodeRef<'_, N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.get())
            .field("depth", &self.depth())
            .finish()
    }
}

impl<'a, N: Coordinate, T> NodeRef<'a, N, T> {
    /// The depth of this node. The root has depth 1.
    pub fn depth(&self) -> u32 {
        self.tree.nodes[self.id.get()].depth
    }

    /// The region covered by this node's four slots.
    pub fn extent(&self) -> Extent<N> {
        self.tree.nodes[self.id.get()].extent()
    }

    /// The point where this node's quadrants meet.
    pub fn midpoint(&self) -> (N, N) {
        self.tree.nodes[self.id.get()].midpoint()
    }

    /// The content of one quadrant.
    pub fn slot(&self, quadrant: Quadrant) -> SlotRef<'a, N, T> {
        match self.tree.nodes[self.id.get()].slot(quadrant) {
            Slot::Bucket(bucket) => SlotRef::Bucket(bucket),
            Slot::Branch { child, .. } => SlotRef::Branch(NodeRef {
                tree: self.tree,
                id: *child,
            }),
        }
    }

    /// All four quadrants, in the order of [`Quadrant::ALL`].
    pub fn slots(&self) -> impl Iterator<Item = (Quadrant, SlotRef<'a, N, T>)> + '_ {
        Quadrant::ALL.into_iter().map(|q| (q, self.slot(q)))
    }
}

/// The content of one quadrant of a node: a bucket of records or a nested node.
pub enum SlotRef<'a, N: Coordinate, T> {
    Bucket(&'a Bucket<N, T>),
    Branch(NodeRef<'a, N, T>),
}

impl<N: Coordinate, T> Clone for SlotRef<'_, N, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Coordinate, T> Copy for SlotRef<'_, N, T> {}

impl<N: Coordinate, T> fmt::Debug for SlotRef<'_, N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Bucket(bucket) => f
                .debug_struct("Bucket")
                .field("extent", bucket.extent())
                .field("len", &bucket.len())
                .finish(),
            SlotRef::Branch(node) => f.debug_tuple("Branch").field(node).finish(),
        }
    }
}

impl<'a, N: Coordinate, T> SlotRef<'a, N, T> {
    pub fn extent(&self) -> Extent<N> {
        match self {
            SlotRef::Bucket(bucket) => bucket.extent,
            SlotRef::Branch(node) => node.extent(),
        }
    }

    /// Returns `true` if this slot holds records directly.
    pub fn is_bucket(&self) -> bool {
        matches!(self, SlotRef::Bucket(_))
    }

    /// Returns `true` if this slot has been split into a child node.
    pub fn is_branch(&self) -> bool {
        matches!(self, SlotRef::Branch(_))
    }

    pub fn as_bucket(&self) -> Option<&'a Bucket<N, T>> {
        match *self {
            SlotRef::Bucket(bucket) => Some(bucket),
            SlotRef::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<NodeRef<'a, N, T>> {
        match self {
            SlotRef::Bucket(_) => None,
            SlotRef::Branch(node) => Some(*node),
        }
    }
}

/// Textual description of a tree's structure, created by [`QuadTree::dump`].
///
/// Each slot prints its extent followed by `descending` and its child node, its records, or
/// `empty`.
pub struct Dump<'a, N: Coordinate, T> {
    tree: &'a QuadTree<N, T>,
}

impl<N: Coordinate, T: fmt::Debug> fmt::Display for Dump<'_, N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root() {
            Some(root) => write_node(f, root),
            None => writeln!(f, "destroyed"),
        }
    }
}

fn write_node<N: Coordinate, T: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    node: NodeRef<'_, N, T>,
) -> fmt::Result {
    for (_, slot) in node.slots() {
        let e = slot.extent();
        writeln!(f, "leaf ({},{}) ({},{})", e.xmin, e.ymin, e.xmax, e.ymax)?;
        match slot {
            SlotRef::Branch(child) => {
                writeln!(f, "descending")?;
                write_node(f, child)?;
            }
            SlotRef::Bucket(bucket) if !bucket.is_empty() => {
                writeln!(f, "contents:")?;
                for record in bucket.iter() {
                    writeln!(f, "({:4.2},{:4.2}) - {:?}", record.x, record.y, record.payload)?;
                }
            }
            SlotRef::Bucket(_) => writeln!(f, "empty")?,
        }
    }
    Ok(())
}
