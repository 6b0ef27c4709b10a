#![doc = include_str!("../README.md")]

mod error;
pub mod extent;
pub mod quadtree;
mod r#type;

pub use error::QuadTreeError;
pub use extent::Extent;
pub use quadtree::{QuadTree, QuadTreeBuilder};
pub use r#type::{Coord, Coordinate};
