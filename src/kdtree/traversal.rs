//! Utilities to traverse the KDTree structure.

use std::marker::PhantomData;
use std::ops::RangeInclusive;

use crate::geo::GeoBox;
use crate::kdtree::KDTreeIndex;
use crate::r#type::IndexableNum;

/// A node in the KDTree: a contiguous range of sorted positions together with a box that
/// contains every point of that range.
///
/// The root spans the whole index and the whole sphere. Children split the range around its
/// median and clip the box on this node's axis at the median coordinate.
#[derive(Debug, Clone)]
pub struct Node<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    /// The axis that the children of this node are split over.
    /// 0 for longitude, 1 for latitude
    axis: usize,

    left: usize,
    right: usize,

    bbox: GeoBox,

    phantom: PhantomData<N>,
}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Node<'a, N, T> {
    /// The root node, or `None` if the tree holds no points.
    pub(crate) fn from_root(tree: &'a T) -> Option<Self> {
        let last = tree.indices().len().checked_sub(1)?;
        Some(Self {
            tree,
            axis: 0,
            left: 0,
            right: last,
            bbox: GeoBox::WORLD,
            phantom: PhantomData,
        })
    }

    /// The sorted positions covered by this node, both ends included.
    #[inline]
    pub fn range(&self) -> RangeInclusive<usize> {
        self.left..=self.right
    }

    /// The axis this node's children are split on: 0 for longitude, 1 for latitude.
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// A box containing every point of this node.
    #[inline]
    pub fn bbox(&self) -> &GeoBox {
        &self.bbox
    }

    /// Note: this is the index into the coords array, not the insertion index.
    #[inline]
    pub fn middle_index(&self) -> usize {
        (self.left + self.right) >> 1
    }

    /// The coordinate of the middle point on this node's axis.
    #[inline]
    fn middle_coord(&self) -> f64 {
        self.tree.coords()[2 * self.middle_index() + self.axis].as_f64()
    }

    /// The child node representing the "left" half.
    ///
    /// Note that this **does not include** the middle index of the current node. Must only be
    /// called when [`Self::is_parent`] is `true`.
    pub fn left_child(&self) -> Node<'a, N, T> {
        debug_assert!(self.is_parent());
        let (bbox, _) = self.bbox.split(self.axis, self.middle_coord());
        let m = self.middle_index();

        Self {
            tree: self.tree,
            axis: 1 - self.axis,
            left: self.left,
            right: m - 1,
            bbox,
            phantom: PhantomData,
        }
    }

    /// The child node representing the "right" half.
    ///
    /// Note that this **does not include** the middle index of the current node. Must only be
    /// called when [`Self::is_parent`] is `true`.
    pub fn right_child(&self) -> Node<'a, N, T> {
        debug_assert!(self.is_parent());
        let (_, bbox) = self.bbox.split(self.axis, self.middle_coord());
        let m = self.middle_index();

        Self {
            tree: self.tree,
            axis: 1 - self.axis,
            left: m + 1,
            right: self.right,
            bbox,
            phantom: PhantomData,
        }
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.right - self.left <= self.tree.node_size() as usize
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}
