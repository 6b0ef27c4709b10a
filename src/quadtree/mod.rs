//! An implementation of a mutable, adaptively subdivided point quadtree.

mod builder;
mod index;
mod node;
mod traversal;

pub use builder::{QuadTreeBuilder, DEFAULT_MAX_BUCKET_SIZE, DEFAULT_MAX_DEPTH};
pub use index::QuadTree;
pub use node::{Bucket, PointRecord, Quadrant};
pub use traversal::{Dump, NodeRef, Records, SlotRef};
