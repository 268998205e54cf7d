use std::cmp;

use bytemuck::cast_slice_mut;
use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::error::{GeoKdError, Result};
use crate::indices::MutableIndices;
use crate::kdtree::constants::{KDBUSH_HEADER_SIZE, KDBUSH_MAGIC, KDBUSH_VERSION};
use crate::kdtree::index::{KDTree, KDTreeMetadata};
use crate::r#type::IndexableNum;

/// The default node size used by [`KDTreeBuilder::new`]
pub const DEFAULT_KDTREE_NODE_SIZE: u16 = 64;

/// A builder to create a [`KDTree`].
///
/// Points are added as longitude/latitude pairs in degrees. The insertion order defines the
/// indices returned by every search.
///
/// ```
/// use geo_kdtree::kdtree::{KDTreeBuilder, KDTreeIndex};
///
/// let mut builder = KDTreeBuilder::<f64>::new(3);
/// builder.add(-119.70, 34.42);
/// builder.add(-118.24, 34.05);
/// builder.add(-122.42, 37.77);
/// let tree = builder.finish().unwrap();
///
/// assert_eq!(tree.around(-119.0, 34.3, Some(2), None), vec![0, 1]);
/// ```
pub struct KDTreeBuilder<N: IndexableNum> {
    /// data buffer
    data: Vec<u8>,
    metadata: KDTreeMetadata<N>,
    pos: usize,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: u32) -> Self {
        Self::new_with_node_size(num_items, DEFAULT_KDTREE_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// # Panics
    ///
    /// If `node_size` is 0.
    pub fn new_with_node_size(num_items: u32, node_size: u16) -> Self {
        assert!(node_size >= 1, "Node size must be at least 1.");
        Self::from_metadata(KDTreeMetadata::new(num_items, node_size))
    }

    /// Create a new builder with the provided metadata
    pub fn from_metadata(metadata: KDTreeMetadata<N>) -> Self {
        let mut data = vec![0; metadata.data_buffer_length()];

        // Set data header
        data[0] = KDBUSH_MAGIC;
        data[1] = (KDBUSH_VERSION << 4) + N::TYPE_INDEX;
        data[2..4].copy_from_slice(&metadata.node_size().to_le_bytes());
        data[4..8].copy_from_slice(&metadata.num_items().to_le_bytes());

        Self {
            data,
            metadata,
            pos: 0,
        }
    }

    /// Access the underlying [KDTreeMetadata] of this instance.
    pub fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }

    /// Add a point to the index.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    ///
    /// # Panics
    ///
    /// If more points are added than the builder was created for.
    #[inline]
    pub fn add(&mut self, lng: N, lat: N) -> u32 {
        let index = self.pos >> 1;
        assert!(
            index < self.metadata.num_items() as usize,
            "Cannot add more than {} items.",
            self.metadata.num_items()
        );

        let (coords, mut ids) = split_data_borrow(&mut self.data, &self.metadata);

        // index fits in u32 because num_items does
        ids.set(index, index as u32);
        coords[self.pos] = lng;
        self.pos += 1;
        coords[self.pos] = lat;
        self.pos += 1;

        index as u32
    }

    /// Add a coordinate to the index, reading `x` as longitude and `y` as latitude.
    #[inline]
    pub fn add_coord(&mut self, coord: &impl CoordTrait<T = N>) -> u32 {
        self.add(coord.x(), coord.y())
    }

    /// Consume this builder, performing the k-d sort and generating a KDTree ready for queries.
    ///
    /// Fails if the number of added points differs from the number the builder was created for.
    pub fn finish(mut self) -> Result<KDTree<N>> {
        let added = self.pos >> 1;
        let num_items = self.metadata.num_items() as usize;
        if added != num_items {
            return Err(GeoKdError::ItemCountMismatch {
                expected: num_items,
                added,
            });
        }

        if num_items > 0 {
            let (coords, mut ids) = split_data_borrow::<N>(&mut self.data, &self.metadata);
            sort(
                &mut ids,
                coords,
                self.metadata.node_size() as usize,
                num_items - 1,
            );
        }

        log::debug!(
            "built kdtree with {} items and node size {}",
            num_items,
            self.metadata.node_size()
        );

        Ok(KDTree {
            buffer: self.data,
            metadata: self.metadata,
        })
    }
}

/// Mutable borrow of coords and ids
fn split_data_borrow<'a, N: IndexableNum>(
    data: &'a mut [u8],
    metadata: &KDTreeMetadata<N>,
) -> (&'a mut [N], MutableIndices<'a>) {
    let (ids_buf, padded_coords_buf) =
        data[KDBUSH_HEADER_SIZE..].split_at_mut(metadata.indices_byte_length());
    let coords_buf = &mut padded_coords_buf[metadata.pad_coords_byte_length()..];
    debug_assert_eq!(coords_buf.len(), metadata.coords_byte_length());

    let ids = MutableIndices::new(ids_buf, metadata.num_items() as usize);
    let coords = cast_slice_mut(coords_buf);

    (coords, ids)
}

/// kd-sort ids and coords so that every range wider than `node_size` is partitioned around its
/// median on alternating axes, longitude first.
fn sort<N: IndexableNum>(ids: &mut MutableIndices, coords: &mut [N], node_size: usize, last: usize) {
    // (left, right, axis) triples, inline until more than 11 ranges are pending
    let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
    stack.push(0);
    stack.push(last);
    stack.push(0);

    while let (Some(axis), Some(right), Some(left)) = (stack.pop(), stack.pop(), stack.pop()) {
        if right - left <= node_size {
            continue;
        }

        let m = (left + right) >> 1;

        // sort ids and coords around the middle index so that the halves lie either left/right or
        // below/above correspondingly (taking turns)
        select(ids, coords, m, left, right, axis);

        stack.push(left);
        stack.push(m - 1);
        stack.push(1 - axis);

        stack.push(m + 1);
        stack.push(right);
        stack.push(1 - axis);
    }
}

/// Custom Floyd-Rivest selection algorithm: sort ids and coords so that [left..k-1] items are
/// smaller than k-th item (on either longitude or latitude axis)
#[inline]
fn select<N: IndexableNum>(
    ids: &mut MutableIndices,
    coords: &mut [N],
    k: usize,
    mut left: usize,
    mut right: usize,
    axis: usize,
) {
    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp((2.0 * z) / 3.0);
            let sd = 0.5
                * f64::sqrt((z * s * (n - s)) / n)
                * (if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, f64::floor(k as f64 - (m * s) / n + sd) as usize);
            let new_right = cmp::min(
                right,
                f64::floor(k as f64 + ((n - m) * s) / n + sd) as usize,
            );
            select(ids, coords, k, new_left, new_right, axis);
        }

        let t = coords[2 * k + axis];
        let mut i = left;
        let mut j = right;

        swap_item(ids, coords, left, k);
        if coords[2 * right + axis] > t {
            swap_item(ids, coords, left, right);
        }

        while i < j {
            swap_item(ids, coords, i, j);
            i += 1;
            j -= 1;
            while coords[2 * i + axis] < t {
                i += 1;
            }
            while coords[2 * j + axis] > t {
                j -= 1;
            }
        }

        if coords[2 * left + axis] == t {
            swap_item(ids, coords, left, j);
        } else {
            j += 1;
            swap_item(ids, coords, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

#[inline]
fn swap_item<N: IndexableNum>(ids: &mut MutableIndices, coords: &mut [N], i: usize, j: usize) {
    ids.swap(i, j);
    coords.swap(2 * i, 2 * j);
    coords.swap(2 * i + 1, 2 * j + 1);
}
