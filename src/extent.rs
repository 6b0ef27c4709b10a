//! Axis-aligned rectangles bounding the tree and its quadrants.

use geo_traits::{CoordTrait, RectTrait};

use crate::error::{QuadTreeError, Result};
use crate::r#type::{halfway, Coord, Coordinate};

/// An axis-aligned rectangle.
///
/// A valid extent has `xmin < xmax` and `ymin < ymax`. Extents handed out by the tree are always
/// valid; use [`Extent::try_new`] to check caller input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent<N: Coordinate> {
    pub xmin: N,
    pub ymin: N,
    pub xmax: N,
    pub ymax: N,
}

impl<N: Coordinate> Extent<N> {
    /// Create a new extent without validating it.
    pub fn new(xmin: N, ymin: N, xmax: N, ymax: N) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Create a new extent, failing unless `xmin < xmax` and `ymin < ymax`.
    pub fn try_new(xmin: N, ymin: N, xmax: N, ymax: N) -> Result<Self> {
        let extent = Self::new(xmin, ymin, xmax, ymax);
        extent.validate()?;
        Ok(extent)
    }

    /// Create an extent from any [`RectTrait`] implementation.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Result<Self> {
        Self::try_new(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// The bounding box of a circle of radius `r` around `(x, y)`.
    #[inline]
    pub fn around(x: N, y: N, r: N) -> Self {
        Self::new(x - r, y - r, x + r, y + r)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        // Written this way so NaN bounds are rejected too.
        if self.xmin < self.xmax && self.ymin < self.ymax {
            Ok(())
        } else {
            Err(QuadTreeError::InvalidExtent(format!(
                "({}, {}) - ({}, {})",
                self.xmin, self.ymin, self.xmax, self.ymax
            )))
        }
    }

    /// The center of this extent, where its quadrants meet.
    #[inline]
    pub fn midpoint(&self) -> (N, N) {
        (
            halfway(self.xmin, self.xmax),
            halfway(self.ymin, self.ymax),
        )
    }

    /// Returns `true` if `(x, y)` lies strictly inside this extent.
    ///
    /// Points on the boundary are **not** contained.
    #[inline]
    pub fn contains_strict(&self, x: N, y: N) -> bool {
        x > self.xmin && x < self.xmax && y > self.ymin && y < self.ymax
    }

    /// Returns `true` if this extent overlaps another. Touching edges count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Extent<N>) -> bool {
        !(self.xmin > other.xmax
            || other.xmin > self.xmax
            || self.ymin > other.ymax
            || other.ymin > self.ymax)
    }

    /// Split this extent at its midpoint.
    ///
    /// The quarters are returned in the order upper left, upper right, lower left, lower right,
    /// matching [`Quadrant::ALL`][crate::quadtree::Quadrant::ALL].
    pub(crate) fn quarter(&self) -> [Extent<N>; 4] {
        let (xmid, ymid) = self.midpoint();
        [
            Self::new(self.xmin, self.ymin, xmid, ymid),
            Self::new(xmid, self.ymin, self.xmax, ymid),
            Self::new(self.xmin, ymid, xmid, self.ymax),
            Self::new(xmid, ymid, self.xmax, self.ymax),
        ]
    }
}

impl<N: Coordinate> RectTrait for Extent<N> {
    type T = N;
    type CoordType<'a>
        = Coord<N>
    where
        Self: 'a;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn min(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.xmin,
            y: self.ymin,
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.xmax,
            y: self.ymax,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ext(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Extent<f64> {
        Extent::new(xmin, ymin, xmax, ymax)
    }

    #[test]
    fn overlap() {
        assert!(!ext(10., 10., 20., 20.).overlaps(&ext(30., 30., 40., 40.)));
        assert!(!ext(30., 30., 40., 40.).overlaps(&ext(10., 10., 20., 20.)));
        assert!(ext(10., 10., 20., 20.).overlaps(&ext(0., 0., 40., 40.)));
        assert!(ext(0., 0., 40., 40.).overlaps(&ext(10., 10., 20., 20.)));
    }

    #[test]
    fn overlap_is_reflexive_and_counts_touching_edges() {
        let a = ext(0., 0., 10., 10.);
        assert!(a.overlaps(&a));

        // shared edge
        let b = ext(10., 0., 20., 10.);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // shared corner only
        let c = ext(10., 10., 20., 20.);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));

        // overlapping on x but separated on y
        let d = ext(5., 11., 15., 20.);
        assert!(!a.overlaps(&d));
        assert!(!d.overlaps(&a));
    }

    #[test]
    fn strict_containment_excludes_boundary() {
        let a = ext(0., 0., 50., 50.);
        assert!(a.contains_strict(25., 25.));
        assert!(!a.contains_strict(0., 25.));
        assert!(!a.contains_strict(50., 25.));
        assert!(!a.contains_strict(25., 50.));
        assert!(!a.contains_strict(60., 60.));
    }

    #[test]
    fn quarters_tile_the_extent() {
        let [ul, ur, ll, lr] = ext(0., 0., 100., 100.).quarter();
        assert_eq!(ul, ext(0., 0., 50., 50.));
        assert_eq!(ur, ext(50., 0., 100., 50.));
        assert_eq!(ll, ext(0., 50., 50., 100.));
        assert_eq!(lr, ext(50., 50., 100., 100.));
        assert_eq!(ul.xmax, ur.xmin);
        assert_eq!(ll.xmax, lr.xmin);
        assert_eq!(ul.ymax, ll.ymin);
        assert_eq!(ur.ymax, lr.ymin);
    }

    #[test]
    fn validation() {
        assert!(Extent::try_new(0., 0., 1., 1.).is_ok());
        assert!(matches!(
            Extent::try_new(1., 0., 1., 1.),
            Err(QuadTreeError::InvalidExtent(_))
        ));
        assert!(Extent::try_new(0., 2., 1., 1.).is_err());
        assert!(Extent::try_new(f64::NAN, 0., 1., 1.).is_err());
    }

    #[test]
    fn rect_trait_round_trip() {
        let a = ext(1., 2., 3., 4.);
        assert_eq!(a.min().x(), 1.);
        assert_eq!(a.max().y(), 4.);
        assert_eq!(Extent::from_rect(&a).unwrap(), a);
    }

    #[test]
    fn around_point() {
        assert_eq!(Extent::around(15., 15., 10.), ext(5., 5., 25., 25.));
    }
}
