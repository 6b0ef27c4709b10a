use crate::error::{QuadTreeError, Result};
use crate::extent::Extent;
use crate::quadtree::QuadTree;
use crate::r#type::Coordinate;

/// The default bucket size used by [`QuadTreeBuilder::new`]
pub const DEFAULT_MAX_BUCKET_SIZE: usize = 8;

/// The default maximum depth used by [`QuadTreeBuilder::new`]
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// A builder to create a [`QuadTree`].
///
/// ```
/// use quadtree_index::{Extent, QuadTreeBuilder};
///
/// let mut tree = QuadTreeBuilder::new(Extent::new(0., 0., 100., 100.))
///     .max_bucket_size(4)
///     .max_depth(6)
///     .finish::<&str>()
///     .unwrap();
/// tree.insert(10., 10., "a").unwrap();
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeBuilder<N: Coordinate> {
    extent: Extent<N>,
    max_bucket_size: usize,
    max_depth: u32,
}

impl<N: Coordinate> QuadTreeBuilder<N> {
    /// Create a new builder over the given universe with the default limits.
    pub fn new(extent: Extent<N>) -> Self {
        Self::new_with_limits(extent, DEFAULT_MAX_BUCKET_SIZE, DEFAULT_MAX_DEPTH)
    }

    /// Create a new builder with the provided universe, bucket size, and depth limit.
    ///
    /// - max_bucket_size: number of records in a bucket that triggers a split
    /// - max_depth: depth at which buckets stop splitting. The root node has depth 1.
    pub fn new_with_limits(extent: Extent<N>, max_bucket_size: usize, max_depth: u32) -> Self {
        Self {
            extent,
            max_bucket_size,
            max_depth,
        }
    }

    pub fn max_bucket_size(mut self, max_bucket_size: usize) -> Self {
        self.max_bucket_size = max_bucket_size;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate the configuration and create an empty tree with its root node.
    pub fn finish<T>(self) -> Result<QuadTree<N, T>> {
        self.extent.validate()?;
        if self.max_bucket_size == 0 {
            return Err(QuadTreeError::InvalidLimits(
                "max_bucket_size must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(QuadTreeError::InvalidLimits(
                "max_depth must be at least 1".to_string(),
            ));
        }

        Ok(QuadTree::from_parts(
            self.extent,
            self.max_bucket_size,
            self.max_depth,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let tree = QuadTreeBuilder::new(Extent::new(0., 0., 10., 10.))
            .finish::<u32>()
            .unwrap();
        assert_eq!(tree.max_bucket_size(), DEFAULT_MAX_BUCKET_SIZE);
        assert_eq!(tree.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(tree.num_nodes(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn rejects_bad_limits() {
        let extent = Extent::new(0.0f32, 0., 10., 10.);
        let err = QuadTreeBuilder::new(extent)
            .max_bucket_size(0)
            .finish::<u32>()
            .unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidLimits(_)));

        let err = QuadTreeBuilder::new(extent)
            .max_depth(0)
            .finish::<u32>()
            .unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidLimits(_)));
    }

    #[test]
    fn rejects_bad_extent() {
        let err = QuadTreeBuilder::new(Extent::new(10., 0., 0., 10.))
            .finish::<u32>()
            .unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidExtent(_)));
    }
}
