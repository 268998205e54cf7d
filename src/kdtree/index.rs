use std::marker::PhantomData;

use bytemuck::cast_slice;

use crate::error::{GeoKdError, Result};
use crate::indices::{bytes_per_id, Indices};
use crate::kdtree::constants::{KDBUSH_HEADER_SIZE, KDBUSH_MAGIC, KDBUSH_VERSION};
use crate::r#type::IndexableNum;

/// Common metadata describing a KDTree buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDTreeMetadata<N: IndexableNum> {
    node_size: u16,
    num_items: u32,
    phantom: PhantomData<N>,
}

impl<N: IndexableNum> KDTreeMetadata<N> {
    /// Construct metadata for a tree of `num_items` points with leaves of at most `node_size`
    /// spans.
    pub fn new(num_items: u32, node_size: u16) -> Self {
        Self {
            node_size,
            num_items,
            phantom: PhantomData,
        }
    }

    /// Parse and validate an existing kdbush buffer.
    ///
    /// Besides the header this checks the total length, the alignment, and that every stored
    /// id is below the number of items.
    pub fn try_new(data: &[u8]) -> Result<Self> {
        if data.len() < KDBUSH_HEADER_SIZE {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Expected at least {} header bytes, got {}.",
                KDBUSH_HEADER_SIZE,
                data.len()
            )));
        }

        if data[0] != KDBUSH_MAGIC {
            return Err(GeoKdError::InvalidBuffer(
                "Data not in Kdbush format.".to_string(),
            ));
        }

        let version_and_type = data[1];
        let version = version_and_type >> 4;
        if version != KDBUSH_VERSION {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Got v{} data when expected v{}.",
                version, KDBUSH_VERSION
            )));
        }

        let type_ = version_and_type & 0x0f;
        if type_ != N::TYPE_INDEX {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Got type {} data when expected type {}.",
                type_,
                N::TYPE_INDEX
            )));
        }

        let node_size = u16::from_le_bytes([data[2], data[3]]);
        let num_items = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if node_size == 0 {
            return Err(GeoKdError::InvalidBuffer(
                "Node size must be at least 1.".to_string(),
            ));
        }

        let metadata = Self::new(num_items, node_size);
        let expected = metadata.data_buffer_length();
        if data.len() != expected {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Incorrect buffer length. Expected {} got {}.",
                expected,
                data.len()
            )));
        }

        // ids and coords are cast in place
        let align = std::mem::align_of::<N>().max(bytes_per_id(num_items as usize));
        if data.as_ptr() as usize % align != 0 {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Buffer must be aligned to {} bytes.",
                align
            )));
        }

        // searches index payloads by these ids
        let indices = metadata.indices_slice(data);
        if let Some(id) = (0..indices.len())
            .map(|i| indices.get(i))
            .find(|&id| id >= num_items)
        {
            return Err(GeoKdError::InvalidBuffer(format!(
                "Item id {} out of range for {} items.",
                id, num_items
            )));
        }

        Ok(metadata)
    }

    /// The maximum span of a leaf range.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// The number of points in the tree.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    pub(crate) fn indices_byte_length(&self) -> usize {
        self.num_items as usize * bytes_per_id(self.num_items as usize)
    }

    pub(crate) fn pad_coords_byte_length(&self) -> usize {
        (8 - (self.indices_byte_length() % 8)) % 8
    }

    pub(crate) fn coords_byte_length(&self) -> usize {
        self.num_items as usize * 2 * N::BYTES_PER_ELEMENT
    }

    /// The total byte length of a buffer holding this tree.
    pub fn data_buffer_length(&self) -> usize {
        KDBUSH_HEADER_SIZE
            + self.indices_byte_length()
            + self.pad_coords_byte_length()
            + self.coords_byte_length()
    }

    /// The interleaved `(lng, lat)` coordinates inside `data`.
    pub fn coords_slice<'a>(&self, data: &'a [u8]) -> &'a [N] {
        let start =
            KDBUSH_HEADER_SIZE + self.indices_byte_length() + self.pad_coords_byte_length();
        cast_slice(&data[start..start + self.coords_byte_length()])
    }

    /// The sorted-position to insertion-index permutation inside `data`.
    pub fn indices_slice<'a>(&self, data: &'a [u8]) -> Indices<'a> {
        let end = KDBUSH_HEADER_SIZE + self.indices_byte_length();
        Indices::new(&data[KDBUSH_HEADER_SIZE..end], self.num_items as usize)
    }
}

/// An owned KDTree buffer.
///
/// Usually this will be created from scratch via [`KDTreeBuilder`][crate::kdtree::KDTreeBuilder].
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: IndexableNum> {
    pub(crate) buffer: Vec<u8>,
    pub(crate) metadata: KDTreeMetadata<N>,
}

impl<N: IndexableNum> KDTree<N> {
    /// Consume the tree, returning its kdbush-compatible buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// A borrowed view onto this tree.
    pub fn as_ref(&self) -> KDTreeRef<'_, N> {
        KDTreeRef {
            coords: self.metadata.coords_slice(&self.buffer),
            indices: self.metadata.indices_slice(&self.buffer),
            metadata: self.metadata,
        }
    }
}

impl<N: IndexableNum> AsRef<[u8]> for KDTree<N> {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

/// A reference on an external KDTree buffer.
///
/// Usually this will be created from a [`KDTree`] via its [`as_ref`][KDTree::as_ref] method,
/// but it can also be created from any existing kdbush buffer, without copying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDTreeRef<'a, N: IndexableNum> {
    pub(crate) coords: &'a [N],
    pub(crate) indices: Indices<'a>,
    pub(crate) metadata: KDTreeMetadata<N>,
}

impl<'a, N: IndexableNum> KDTreeRef<'a, N> {
    /// Construct a new KDTreeRef from an external byte slice.
    ///
    /// The buffer is validated by [`KDTreeMetadata::try_new`].
    pub fn try_new<T: AsRef<[u8]>>(data: &'a T) -> Result<Self> {
        let data = data.as_ref();
        let metadata = KDTreeMetadata::try_new(data)?;
        Ok(Self {
            coords: metadata.coords_slice(data),
            indices: metadata.indices_slice(data),
            metadata,
        })
    }
}
