//! Storage for the quadtree: quadrants, buckets of point records, and branch nodes.

use crate::extent::Extent;
use crate::r#type::Coordinate;

/// One of the four corners of a node.
///
/// "Upper" is the half with the smaller `y` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quadrant {
    #[default]
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl Quadrant {
    /// All quadrants, in traversal order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Choose the quadrant of `(x, y)` relative to the midpoint `(xmid, ymid)`.
    ///
    /// A point on a dividing line belongs to the right and/or lower side.
    #[inline]
    pub fn select<N: Coordinate>(x: N, y: N, xmid: N, ymid: N) -> Self {
        if x < xmid {
            if y < ymid {
                Quadrant::UpperLeft
            } else {
                Quadrant::LowerLeft
            }
        } else if y < ymid {
            Quadrant::UpperRight
        } else {
            Quadrant::LowerRight
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Position of a node in the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// A stored point and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord<N: Coordinate, T> {
    pub(crate) x: N,
    pub(crate) y: N,
    pub(crate) payload: T,
}

impl<N: Coordinate, T> PointRecord<N, T> {
    pub(crate) fn new(x: N, y: N, payload: T) -> Self {
        Self { x, y, payload }
    }

    pub fn x(&self) -> N {
        self.x
    }

    pub fn y(&self) -> N {
        self.y
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume the record, handing the payload back to the caller.
    pub fn into_payload(self) -> T {
        self.payload
    }

    #[inline]
    pub(crate) fn distance_to(&self, x: N, y: N) -> N {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A terminal quadrant holding point records directly.
///
/// Records are unordered; no particular order is guaranteed after insertion, deletion, or a split.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<N: Coordinate, T> {
    pub(crate) extent: Extent<N>,
    pub(crate) records: Vec<PointRecord<N, T>>,
}

impl<N: Coordinate, T> Bucket<N, T> {
    pub(crate) fn new(extent: Extent<N>) -> Self {
        Self {
            extent,
            records: Vec::new(),
        }
    }

    /// The region this bucket covers.
    pub fn extent(&self) -> &Extent<N> {
        &self.extent
    }

    /// The number of records held by this bucket.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PointRecord<N, T>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointRecord<N, T>> {
        self.records.iter()
    }
}

/// The content of one corner of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot<N: Coordinate, T> {
    Bucket(Bucket<N, T>),
    Branch { extent: Extent<N>, child: NodeId },
}

impl<N: Coordinate, T> Slot<N, T> {
    pub(crate) fn extent(&self) -> &Extent<N> {
        match self {
            Slot::Bucket(bucket) => &bucket.extent,
            Slot::Branch { extent, .. } => extent,
        }
    }

    pub(crate) fn as_bucket(&self) -> Option<&Bucket<N, T>> {
        match self {
            Slot::Bucket(bucket) => Some(bucket),
            Slot::Branch { .. } => None,
        }
    }

    pub(crate) fn as_bucket_mut(&mut self) -> Option<&mut Bucket<N, T>> {
        match self {
            Slot::Bucket(bucket) => Some(bucket),
            Slot::Branch { .. } => None,
        }
    }
}

/// A branch point: four slots quartering the node's extent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<N: Coordinate, T> {
    pub(crate) depth: u32,
    pub(crate) slots: [Slot<N, T>; 4],
}

impl<N: Coordinate, T> Node<N, T> {
    /// A node with four empty buckets covering `extent`.
    pub(crate) fn new(depth: u32, extent: Extent<N>) -> Self {
        Self {
            depth,
            slots: extent.quarter().map(|e| Slot::Bucket(Bucket::new(e))),
        }
    }

    /// The point where the four slots meet.
    #[inline]
    pub(crate) fn midpoint(&self) -> (N, N) {
        let ul = self.slots[Quadrant::UpperLeft.index()].extent();
        (ul.xmax, ul.ymax)
    }

    pub(crate) fn extent(&self) -> Extent<N> {
        let ul = self.slots[Quadrant::UpperLeft.index()].extent();
        let lr = self.slots[Quadrant::LowerRight.index()].extent();
        Extent::new(ul.xmin, ul.ymin, lr.xmax, lr.ymax)
    }

    #[inline]
    pub(crate) fn slot(&self, quadrant: Quadrant) -> &Slot<N, T> {
        &self.slots[quadrant.index()]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, quadrant: Quadrant) -> &mut Slot<N, T> {
        &mut self.slots[quadrant.index()]
    }
}
