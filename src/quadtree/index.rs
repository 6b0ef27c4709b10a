use geo_traits::CoordTrait;
use tracing::{debug, trace, warn};

use crate::error::{QuadTreeError, Result};
use crate::extent::Extent;
use crate::quadtree::builder::QuadTreeBuilder;
use crate::quadtree::node::{Bucket, Node, NodeId, PointRecord, Quadrant, Slot};
use crate::quadtree::traversal::Records;
use crate::r#type::Coordinate;

/// A mutable point quadtree mapping `(x, y)` coordinates to payloads of type `T`.
///
/// Buckets that reach `max_bucket_size` records split one level at a time until `max_depth` is
/// reached; below that depth buckets grow without bound. Nodes are never merged back together.
///
/// ```
/// use quadtree_index::{Extent, QuadTree};
///
/// let mut tree = QuadTree::new(Extent::new(0., 0., 100., 100.), 2, 4).unwrap();
/// tree.insert(10., 10., "A").unwrap();
/// tree.insert(20., 20., "B").unwrap();
///
/// let mut found = tree.within(15., 15., 10.).into_iter().map(|r| *r.payload()).collect::<Vec<_>>();
/// found.sort();
/// assert_eq!(found, vec!["A", "B"]);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree<N: Coordinate, T> {
    pub(crate) nodes: Vec<Node<N, T>>,
    pub(crate) root: Option<NodeId>,
    extent: Extent<N>,
    max_bucket_size: usize,
    max_depth: u32,
    len: usize,
}

impl<N: Coordinate, T> QuadTree<N, T> {
    /// Create an empty tree covering `extent`.
    ///
    /// See [`QuadTreeBuilder`] for default limits.
    pub fn new(extent: Extent<N>, max_bucket_size: usize, max_depth: u32) -> Result<Self> {
        QuadTreeBuilder::new_with_limits(extent, max_bucket_size, max_depth).finish()
    }

    pub(crate) fn from_parts(extent: Extent<N>, max_bucket_size: usize, max_depth: u32) -> Self {
        Self {
            nodes: vec![Node::new(1, extent)],
            root: Some(NodeId::new(0)),
            extent,
            max_bucket_size,
            max_depth,
            len: 0,
        }
    }

    /// The universe covered by this tree.
    pub fn extent(&self) -> &Extent<N> {
        &self.extent
    }

    pub fn max_bucket_size(&self) -> usize {
        self.max_bucket_size
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// The number of records stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of branch nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` once [`destroy`][Self::destroy] has released the tree's storage.
    pub fn is_destroyed(&self) -> bool {
        self.root.is_none()
    }

    /// Walk from `from` down to the bucket that `(x, y)` falls into.
    pub(crate) fn descend_from(&self, from: NodeId, x: N, y: N) -> (NodeId, Quadrant) {
        let mut id = from;
        loop {
            let node = &self.nodes[id.get()];
            let (xmid, ymid) = node.midpoint();
            let quadrant = Quadrant::select(x, y, xmid, ymid);
            match node.slot(quadrant) {
                Slot::Branch { child, .. } => id = *child,
                Slot::Bucket(_) => return (id, quadrant),
            }
        }
    }

    fn descend(&self, x: N, y: N) -> Result<(NodeId, Quadrant)> {
        let root = self.root.ok_or(QuadTreeError::EmptyTree)?;
        Ok(self.descend_from(root, x, y))
    }

    fn bucket(&self, id: NodeId, quadrant: Quadrant) -> Result<&Bucket<N, T>> {
        self.nodes[id.get()]
            .slot(quadrant)
            .as_bucket()
            .ok_or(QuadTreeError::NotFound)
    }

    fn bucket_mut(&mut self, id: NodeId, quadrant: Quadrant) -> Result<&mut Bucket<N, T>> {
        self.nodes[id.get()]
            .slot_mut(quadrant)
            .as_bucket_mut()
            .ok_or(QuadTreeError::NotFound)
    }

    /// Find the bucket that `(x, y)` falls into.
    ///
    /// This never allocates. The bucket may be empty, and it is not guaranteed to hold a record at
    /// exactly `(x, y)`.
    pub fn locate(&self, x: N, y: N) -> Result<&Bucket<N, T>> {
        let (id, quadrant) = self.descend(x, y)?;
        trace!("located ({}, {}) in node {} {:?}", x, y, id.get(), quadrant);
        self.bucket(id, quadrant)
    }

    /// Find the bucket that the given coordinate falls into.
    pub fn locate_coord(&self, coord: &impl CoordTrait<T = N>) -> Result<&Bucket<N, T>> {
        self.locate(coord.x(), coord.y())
    }

    /// The depth of the node owning the bucket that `(x, y)` falls into.
    pub fn depth_at(&self, x: N, y: N) -> Result<u32> {
        let (id, _) = self.descend(x, y)?;
        Ok(self.nodes[id.get()].depth)
    }

    /// Insert a point with its payload.
    ///
    /// If the receiving bucket reaches the bucket size and its node is shallower than the depth
    /// limit, the bucket is split one level and its records redistributed.
    ///
    /// Returns [`QuadTreeError::AllocationFailed`] when storage cannot be reserved. If the record
    /// itself could not be stored the tree is unchanged; if only the split failed, the record is
    /// kept in the un-split bucket.
    pub fn insert(&mut self, x: N, y: N, payload: T) -> Result<()> {
        let (id, quadrant) = self.descend(x, y)?;
        trace!("inserting ({}, {}) into node {} {:?}", x, y, id.get(), quadrant);
        self.reserve_record(id, quadrant)?;
        self.push_record(id, quadrant, PointRecord::new(x, y, payload));
        self.len += 1;
        self.split_if_full(id, quadrant)
    }

    /// Insert a payload at the given coordinate.
    pub fn insert_coord(&mut self, coord: &impl CoordTrait<T = N>, payload: T) -> Result<()> {
        self.insert(coord.x(), coord.y(), payload)
    }

    fn reserve_record(&mut self, id: NodeId, quadrant: Quadrant) -> Result<()> {
        self.bucket_mut(id, quadrant)?
            .records
            .try_reserve(1)
            .map_err(|_| {
                warn!("could not reserve space for a record");
                QuadTreeError::AllocationFailed
            })
    }

    /// Must be preceded by a successful `reserve_record` on the same bucket.
    fn push_record(&mut self, id: NodeId, quadrant: Quadrant, record: PointRecord<N, T>) {
        if let Some(bucket) = self.nodes[id.get()].slot_mut(quadrant).as_bucket_mut() {
            bucket.records.push(record);
        }
    }

    fn split_if_full(&mut self, id: NodeId, quadrant: Quadrant) -> Result<()> {
        let depth = self.nodes[id.get()].depth;
        let count = self.bucket(id, quadrant)?.len();
        if count >= self.max_bucket_size && depth < self.max_depth {
            self.split(id, quadrant)?;
        }
        Ok(())
    }

    /// Push the bucket at `quadrant` of node `id` down into a fresh child node.
    ///
    /// All storage is reserved before anything moves, so a failure leaves the bucket as it was.
    fn split(&mut self, id: NodeId, quadrant: Quadrant) -> Result<()> {
        let child_id = NodeId::new(self.nodes.len());
        let depth = self.nodes[id.get()].depth + 1;

        self.nodes.try_reserve(1).map_err(|_| {
            warn!("could not reserve a node to split a bucket at depth {}", depth - 1);
            QuadTreeError::AllocationFailed
        })?;

        let bucket = self.bucket(id, quadrant)?;
        let extent = bucket.extent;
        let (xmid, ymid) = extent.midpoint();

        let mut counts = [0usize; 4];
        for record in bucket.records.iter() {
            counts[Quadrant::select(record.x, record.y, xmid, ymid).index()] += 1;
        }

        let mut child = Node::new(depth, extent);
        for (slot, count) in child.slots.iter_mut().zip(counts) {
            if let Some(bucket) = slot.as_bucket_mut() {
                bucket.records.try_reserve_exact(count).map_err(|_| {
                    warn!("could not reserve {} records while splitting", count);
                    QuadTreeError::AllocationFailed
                })?;
            }
        }

        let old = std::mem::replace(
            self.nodes[id.get()].slot_mut(quadrant),
            Slot::Branch {
                extent,
                child: child_id,
            },
        );
        if let Slot::Bucket(bucket) = old {
            for record in bucket.records {
                let target = Quadrant::select(record.x, record.y, xmid, ymid);
                if let Some(bucket) = child.slot_mut(target).as_bucket_mut() {
                    bucket.records.push(record);
                }
            }
        }

        debug!(
            "split {:?} of node {} into node {} at depth {}, counts {:?}",
            quadrant,
            id.get(),
            child_id.get(),
            depth,
            counts
        );
        self.nodes.push(child);
        Ok(())
    }

    /// Iterate over every record in the tree.
    ///
    /// Nodes are visited depth first, quadrants in the order of [`Quadrant::ALL`].
    pub fn iter(&self) -> Records<'_, N, T> {
        Records::new(self)
    }

    /// Release all storage, consuming every record without a visitor.
    ///
    /// Afterwards every operation fails with [`QuadTreeError::EmptyTree`].
    pub fn destroy(&mut self) {
        self.destroy_with(|_| {});
    }

    /// Release all storage, handing each record to `visitor` before it is discarded.
    ///
    /// Records are visited depth first, quadrants in the order of [`Quadrant::ALL`].
    pub fn destroy_with<F>(&mut self, mut visitor: F)
    where
        F: FnMut(PointRecord<N, T>),
    {
        let mut nodes = std::mem::take(&mut self.nodes);
        if let Some(root) = self.root.take() {
            drain_node(&mut nodes, root, &mut visitor);
        }
        debug!("destroyed quadtree with {} records", self.len);
        self.len = 0;
    }
}

impl<N: Coordinate, T: PartialEq> QuadTree<N, T> {
    /// Move the record with `payload` from `(old_x, old_y)` to `(new_x, new_y)`.
    ///
    /// The record must be stored at exactly the old coordinates. If the new coordinates stay
    /// strictly inside its bucket, the record keeps its place; otherwise it is re-inserted from
    /// the root, which may split the receiving bucket.
    pub fn move_point(&mut self, old_x: N, old_y: N, new_x: N, new_y: N, payload: &T) -> Result<()> {
        let (old_id, old_quadrant) = self.descend(old_x, old_y)?;
        let bucket = self.bucket_mut(old_id, old_quadrant)?;
        let pos = bucket
            .records
            .iter()
            .position(|r| r.payload == *payload && r.x == old_x && r.y == old_y)
            .ok_or(QuadTreeError::NotFound)?;

        if bucket.extent.contains_strict(new_x, new_y) {
            let record = &mut bucket.records[pos];
            record.x = new_x;
            record.y = new_y;
            trace!(
                "moved ({}, {}) to ({}, {}) within its bucket",
                old_x,
                old_y,
                new_x,
                new_y
            );
            return Ok(());
        }

        let (new_id, new_quadrant) = self.descend(new_x, new_y)?;
        self.reserve_record(new_id, new_quadrant)?;

        let mut record = self.bucket_mut(old_id, old_quadrant)?.records.remove(pos);
        record.x = new_x;
        record.y = new_y;
        self.push_record(new_id, new_quadrant, record);
        debug!(
            "relocated ({}, {}) to ({}, {}) in node {} {:?}",
            old_x,
            old_y,
            new_x,
            new_y,
            new_id.get(),
            new_quadrant
        );
        self.split_if_full(new_id, new_quadrant)
    }

    /// Move the record with `payload` between two coordinates.
    pub fn move_coord(
        &mut self,
        old: &impl CoordTrait<T = N>,
        new: &impl CoordTrait<T = N>,
        payload: &T,
    ) -> Result<()> {
        self.move_point(old.x(), old.y(), new.x(), new.y(), payload)
    }

    /// Remove the first record with `payload` from the bucket that `(x, y)` falls into, returning
    /// its payload.
    ///
    /// Only the payload is compared; the coordinates just select the bucket. Emptied buckets and
    /// nodes are kept.
    pub fn delete(&mut self, x: N, y: N, payload: &T) -> Result<T> {
        let (id, quadrant) = self.descend(x, y)?;
        let bucket = self.bucket_mut(id, quadrant)?;
        let pos = bucket
            .records
            .iter()
            .position(|r| r.payload == *payload)
            .ok_or(QuadTreeError::NotFound)?;
        let record = bucket.records.remove(pos);
        self.len -= 1;
        trace!("deleted ({}, {}) from node {} {:?}", x, y, id.get(), quadrant);
        Ok(record.into_payload())
    }

    /// Remove the record with `payload` at the given coordinate.
    pub fn delete_coord(&mut self, coord: &impl CoordTrait<T = N>, payload: &T) -> Result<T> {
        self.delete(coord.x(), coord.y(), payload)
    }
}

fn drain_node<N, T, F>(nodes: &mut [Node<N, T>], id: NodeId, visitor: &mut F)
where
    N: Coordinate,
    F: FnMut(PointRecord<N, T>),
{
    for quadrant in Quadrant::ALL {
        let child = match nodes[id.get()].slot_mut(quadrant) {
            Slot::Bucket(bucket) => {
                for record in std::mem::take(&mut bucket.records) {
                    visitor(record);
                }
                None
            }
            Slot::Branch { child, .. } => Some(*child),
        };
        if let Some(child) = child {
            drain_node(nodes, child, visitor);
        }
    }
}
