use std::fmt::Debug;

use geo_traits::CoordTrait;
use num_traits::{Bounded, Num, NumCast, ToPrimitive};

use crate::error::{GeoKdError, Result};
use crate::kdtree::constants::KDBUSH_MAGIC;

/// A scalar type that can be used to store the longitude/latitude pairs of a
/// [`KDTree`][crate::kdtree::KDTree].
///
/// This trait is sealed: the set of implementors is fixed so that buffers stay byte-compatible
/// with [kdbush](https://github.com/mourner/kdbush), where each scalar type has a fixed type
/// index written into the header.
///
/// All geographic computations run in `f64`; stored coordinates are widened on read through
/// [`IndexableNum::as_f64`].
pub trait IndexableNum:
    private::Sealed
    + Num
    + NumCast
    + ToPrimitive
    + PartialOrd
    + Debug
    + Send
    + Sync
    + bytemuck::Pod
    + Bounded
{
    /// The type index to match the array order of `ARRAY_TYPES` in kdbush JS
    const TYPE_INDEX: u8;
    /// The number of bytes per element
    const BYTES_PER_ELEMENT: usize;

    /// Widen this value to `f64` for distance computations.
    #[inline]
    fn as_f64(self) -> f64 {
        // Every sealed implementor fits in an f64
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl IndexableNum for i8 {
    const TYPE_INDEX: u8 = 0;
    const BYTES_PER_ELEMENT: usize = 1;
}

impl IndexableNum for u8 {
    const TYPE_INDEX: u8 = 1;
    const BYTES_PER_ELEMENT: usize = 1;
}

impl IndexableNum for i16 {
    const TYPE_INDEX: u8 = 3;
    const BYTES_PER_ELEMENT: usize = 2;
}

impl IndexableNum for u16 {
    const TYPE_INDEX: u8 = 4;
    const BYTES_PER_ELEMENT: usize = 2;
}

impl IndexableNum for i32 {
    const TYPE_INDEX: u8 = 5;
    const BYTES_PER_ELEMENT: usize = 4;
}

impl IndexableNum for u32 {
    const TYPE_INDEX: u8 = 6;
    const BYTES_PER_ELEMENT: usize = 4;
}

impl IndexableNum for f32 {
    const TYPE_INDEX: u8 = 7;
    const BYTES_PER_ELEMENT: usize = 4;
}

impl IndexableNum for f64 {
    const TYPE_INDEX: u8 = 8;
    const BYTES_PER_ELEMENT: usize = 8;
}

/// An enum over the allowed coordinate types of a serialized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl CoordType {
    /// Infer the CoordType from an existing kdbush buffer.
    ///
    /// This can be used to pick the generic type to use with
    /// [`KDTreeRef::try_new`][crate::kdtree::KDTreeRef::try_new].
    pub fn from_buffer<T: AsRef<[u8]>>(data: &T) -> Result<Self> {
        let data = data.as_ref();
        if data.len() < 2 {
            return Err(GeoKdError::InvalidBuffer(
                "Buffer too short to hold a header.".to_string(),
            ));
        }
        if data[0] != KDBUSH_MAGIC {
            return Err(GeoKdError::InvalidBuffer(
                "Data not in Kdbush format.".to_string(),
            ));
        }

        let type_ = data[1] & 0x0f;
        let result = match type_ {
            i8::TYPE_INDEX => CoordType::Int8,
            u8::TYPE_INDEX => CoordType::UInt8,
            i16::TYPE_INDEX => CoordType::Int16,
            u16::TYPE_INDEX => CoordType::UInt16,
            i32::TYPE_INDEX => CoordType::Int32,
            u32::TYPE_INDEX => CoordType::UInt32,
            f32::TYPE_INDEX => CoordType::Float32,
            f64::TYPE_INDEX => CoordType::Float64,
            t => return Err(GeoKdError::General(format!("Unexpected type {}.", t))),
        };
        Ok(result)
    }
}

/// A single coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N> {
    pub(crate) x: N,
    pub(crate) y: N,
}

impl<N: Copy> CoordTrait for Coord<N> {
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

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kdtree::KDTreeBuilder;

    #[test]
    fn infers_coord_type_from_buffer() {
        let mut builder = KDTreeBuilder::<f32>::new(1);
        builder.add(10., 20.);
        let tree = builder.finish().unwrap();
        assert_eq!(CoordType::from_buffer(&tree).unwrap(), CoordType::Float32);
    }

    #[test]
    fn rejects_foreign_buffer() {
        let buf = vec![0xfbu8, 0x38, 0, 0];
        assert!(matches!(
            CoordType::from_buffer(&buf),
            Err(GeoKdError::InvalidBuffer(_))
        ));
    }
}
