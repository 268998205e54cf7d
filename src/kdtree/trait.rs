use std::convert::Infallible;

use geo_traits::CoordTrait;

use crate::geo::around::{search, Neighbor};
use crate::indices::Indices;
use crate::kdtree::traversal::Node;
use crate::kdtree::{KDTree, KDTreeMetadata, KDTreeRef};
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a KDTree.
///
/// Implementors are immutable once built, so any number of searches may run concurrently
/// against the same tree.
pub trait KDTreeIndex<N: IndexableNum>: Sized {
    /// The underlying raw coordinate buffer of this tree, interleaved as `(lng, lat)`
    fn coords(&self) -> &[N];

    /// The underlying raw indices buffer of this tree
    fn indices(&self) -> Indices<'_>;

    /// Access the metadata describing this KDTree
    fn metadata(&self) -> &KDTreeMetadata<N>;

    /// The number of items in this KDTree
    fn num_items(&self) -> u32 {
        self.metadata().num_items()
    }

    /// The node size of this KDTree
    fn node_size(&self) -> u16 {
        self.metadata().node_size()
    }

    /// Search items in order of great-circle distance from the given point.
    ///
    /// - lng: longitude of the query point in degrees
    /// - lat: latitude of the query point in degrees
    /// - max_results: stop after this many items (`None` for no limit)
    /// - max_distance: only return items within this many kilometers (`None` for no limit)
    ///
    /// Returns insertion indices of found items, closest first.
    fn around(
        &self,
        lng: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Vec<u32> {
        self.around_filter(lng, lat, max_results, max_distance, |_| true)
    }

    /// Search items in order of great-circle distance from the given coordinate.
    fn around_coord(
        &self,
        coord: &impl CoordTrait<T = f64>,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Vec<u32> {
        self.around(coord.x(), coord.y(), max_results, max_distance)
    }

    /// Search items in order of great-circle distance, skipping items for which `predicate`
    /// returns `false`.
    ///
    /// The predicate receives the insertion index of each candidate. Rejected items do not
    /// count towards `max_results`.
    fn around_filter<F>(
        &self,
        lng: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
        mut predicate: F,
    ) -> Vec<u32>
    where
        F: FnMut(u32) -> bool,
    {
        match self.try_around_filter(lng, lat, max_results, max_distance, |index| {
            Ok::<_, Infallible>(predicate(index))
        }) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Like [`around_filter`][Self::around_filter] with a fallible predicate.
    ///
    /// The first error returned by `predicate` aborts the search and is returned unchanged.
    fn try_around_filter<E, F>(
        &self,
        lng: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
        predicate: F,
    ) -> Result<Vec<u32>, E>
    where
        F: FnMut(u32) -> Result<bool, E>,
    {
        let neighbors = search(self, lng, lat, max_results, max_distance, predicate)?;
        Ok(neighbors.into_iter().map(|n| n.index).collect())
    }

    /// Search items in order of great-circle distance, returning each item's distance in
    /// kilometers alongside its insertion index.
    fn around_with_distance(
        &self,
        lng: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor> {
        match search(self, lng, lat, max_results, max_distance, |_| {
            Ok::<_, Infallible>(true)
        }) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Access the root node of the KDTree for manual traversal.
    ///
    /// Returns `None` for an empty tree.
    fn root(&self) -> Option<Node<'_, N, Self>> {
        Node::from_root(self)
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTree<N> {
    fn coords(&self) -> &[N] {
        self.metadata.coords_slice(&self.buffer)
    }

    fn indices(&self) -> Indices<'_> {
        self.metadata.indices_slice(&self.buffer)
    }

    fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTreeRef<'_, N> {
    fn coords(&self) -> &[N] {
        self.coords
    }

    fn indices(&self) -> Indices<'_> {
        self.indices
    }

    fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }
}
