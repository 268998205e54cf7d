//! Permutation arrays that may be either `u16` or `u32` to save space.
//!
//! A tree holding fewer than 65536 points stores its permutation as `u16`, matching kdbush.

use bytemuck::{cast_slice, cast_slice_mut};

/// Trees with fewer items than this store their ids as `u16`.
pub(crate) const U16_IDS_LIMIT: usize = 65536;

/// The number of bytes used to store one id for a tree of `num_items` points.
#[inline]
pub(crate) fn bytes_per_id(num_items: usize) -> usize {
    if num_items < U16_IDS_LIMIT {
        2
    } else {
        4
    }
}

/// A mutable slice of indices that may be either `u16` or `u32`.
#[derive(Debug)]
pub(crate) enum MutableIndices<'a> {
    U16(&'a mut [u16]),
    U32(&'a mut [u32]),
}

impl<'a> MutableIndices<'a> {
    pub(crate) fn new(slice: &'a mut [u8], num_items: usize) -> Self {
        if num_items < U16_IDS_LIMIT {
            Self::U16(cast_slice_mut(slice))
        } else {
            Self::U32(cast_slice_mut(slice))
        }
    }
}

impl MutableIndices<'_> {
    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        match self {
            Self::U16(arr) => arr.swap(a, b),
            Self::U32(arr) => arr.swap(a, b),
        }
    }

    /// Callers guarantee `value` fits the id width chosen for this tree.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: u32) {
        match self {
            Self::U16(arr) => arr[index] = value as u16,
            Self::U32(arr) => arr[index] = value,
        }
    }
}

/// A slice of indices that may be either `u16` or `u32`.
///
/// Position `i` holds the insertion index of the point whose coordinates are stored at
/// `coords[2 * i..2 * i + 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indices<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl<'a> Indices<'a> {
    pub(crate) fn new(slice: &'a [u8], num_items: usize) -> Self {
        if num_items < U16_IDS_LIMIT {
            Self::U16(cast_slice(slice))
        } else {
            Self::U32(cast_slice(slice))
        }
    }
}

impl Indices<'_> {
    /// The number of ids.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(arr) => arr.len(),
            Self::U32(arr) => arr.len(),
        }
    }

    /// Whether this slice holds no ids.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The insertion index stored at sorted position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        match self {
            Self::U16(arr) => arr[index] as u32,
            Self::U32(arr) => arr[index],
        }
    }
}
