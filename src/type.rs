use std::fmt::{Debug, Display};

use geo_traits::CoordTrait;
use num_traits::Float;

/// A trait for types that can be used as coordinates in the quadtree.
///
/// This trait is sealed and cannot be implemented for external types. Splitting a region needs a
/// true midpoint and radius queries need a square root, so only the floating point primitives
/// qualify.
pub trait Coordinate: private::Sealed + Float + Debug + Display + Send + Sync {}

impl Coordinate for f32 {}

impl Coordinate for f64 {}

/// The midpoint between two values.
#[inline]
pub(crate) fn halfway<N: Coordinate>(min: N, max: N) -> N {
    min + (max - min) / (N::one() + N::one())
}

/// A single coordinate.
///
/// Used in the implementation of `RectTrait` for [`Extent`][crate::Extent].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N: Coordinate> {
    pub(crate) x: N,
    pub(crate) y: N,
}

impl<N: Coordinate> Coord<N> {
    pub fn new(x: N, y: N) -> Self {
        Self { x, y }
    }
}

impl<N: Coordinate> CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

#[cfg(test)]
mod test {
    use super::halfway;

    #[test]
    fn halfway_between_bounds() {
        assert_eq!(halfway(0.0f64, 100.0), 50.0);
        assert_eq!(halfway(-10.0f32, 30.0), 10.0);
        assert_eq!(halfway(25.0f64, 50.0), 37.5);
    }
}
