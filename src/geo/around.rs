//! Best-first nearest-neighbor search by great-circle distance.
//!
//! A single min-priority queue holds both points with an exact distance and unexpanded kd-tree
//! nodes keyed by a lower bound on the distance to anything they contain. Whenever the closest
//! queue entry is a point it is closer than everything still unexplored, so it can be emitted
//! immediately. The descent is an explicit loop over the queue, so stack use does not depend on
//! the depth of the tree.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::convert::Infallible;

use crate::geo::distance::QueryPoint;
use crate::kdtree::traversal::Node;
use crate::kdtree::KDTreeIndex;
use crate::r#type::IndexableNum;

/// An item returned by a search together with its distance from the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion index of the item
    pub index: u32,
    /// Great-circle distance from the query point in kilometers
    pub distance: f64,
}

/// An entry of the search queue.
enum Candidate<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    /// A point whose exact distance is known.
    Point(Neighbor),
    /// A node still to be expanded, keyed by a lower bound of its distance.
    Pending { node: Node<'a, N, T>, dist: f64 },
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Candidate<'_, N, T> {
    #[inline]
    fn dist(&self) -> f64 {
        match self {
            Self::Point(neighbor) => neighbor.distance,
            Self::Pending { dist, .. } => *dist,
        }
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> PartialEq for Candidate<'_, N, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Eq for Candidate<'_, N, T> {}

impl<N: IndexableNum, T: KDTreeIndex<N>> Ord for Candidate<'_, N, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp keeps the heap consistent even for NaN distances from garbage coordinates
        self.dist().total_cmp(&other.dist())
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> PartialOrd for Candidate<'_, N, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Why a search stopped, for logging.
#[derive(Debug, Clone, Copy)]
enum StopReason {
    MaxResults,
    MaxDistance,
    Exhausted,
}

/// The search engine behind [`KDTreeIndex::around`] and friends.
///
/// `predicate` is called with the insertion index of each point before its distance is
/// computed. Its first error aborts the search.
pub(crate) fn search<'a, N, T, E, F>(
    tree: &'a T,
    lng: f64,
    lat: f64,
    max_results: Option<usize>,
    max_distance: Option<f64>,
    mut predicate: F,
) -> Result<Vec<Neighbor>, E>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    F: FnMut(u32) -> Result<bool, E>,
{
    let max_results = max_results.unwrap_or(usize::MAX);
    let max_distance = max_distance.unwrap_or(f64::INFINITY);

    let mut results: Vec<Neighbor> = vec![];
    if max_results == 0 {
        return Ok(results);
    }

    let Some(root) = tree.root() else {
        return Ok(results);
    };

    let query = QueryPoint::new(lng, lat);
    let coords = tree.coords();
    let indices = tree.indices();

    // a distance-sorted queue that will contain both points and kd-tree nodes
    let mut queue: BinaryHeap<Reverse<Candidate<'a, N, T>>> = BinaryHeap::new();

    let mut enqueue_point =
        |queue: &mut BinaryHeap<Reverse<Candidate<'a, N, T>>>, i: usize| -> Result<(), E> {
            let index = indices.get(i);
            if predicate(index)? {
                let distance = query.distance_to(coords[2 * i].as_f64(), coords[2 * i + 1].as_f64());
                queue.push(Reverse(Candidate::Point(Neighbor { index, distance })));
            }
            Ok(())
        };

    let mut nodes_expanded = 0usize;
    let mut stop = StopReason::Exhausted;
    let mut next = Some(root);

    'outer: while let Some(node) = next {
        nodes_expanded += 1;

        if node.is_leaf() {
            // add all points of the leaf node to the queue
            for i in node.range() {
                enqueue_point(&mut queue, i)?;
            }
        } else {
            // the middle point is not part of either child
            enqueue_point(&mut queue, node.middle_index())?;

            for child in [node.left_child(), node.right_child()] {
                let dist = query.box_dist(child.bbox());
                queue.push(Reverse(Candidate::Pending { node: child, dist }));
            }
        }

        // fetch closest points from the queue; they're guaranteed to be closer than all remaining
        // points, since each node's distance is a lower bound of distances to its points
        while let Some(Reverse(Candidate::Point(neighbor))) = queue.peek() {
            let neighbor = *neighbor;
            if neighbor.distance > max_distance {
                stop = StopReason::MaxDistance;
                break 'outer;
            }
            queue.pop();
            results.push(neighbor);
            if results.len() >= max_results {
                stop = StopReason::MaxResults;
                break 'outer;
            }
        }

        // the next closest kd-tree node
        next = match queue.pop() {
            Some(Reverse(Candidate::Pending { node, .. })) => Some(node),
            _ => None,
        };
    }

    log::trace!(
        "around ({}, {}): expanded {} nodes, returned {} items, left {} queued, stopped on {:?}",
        lng,
        lat,
        nodes_expanded,
        results.len(),
        queue.len(),
        stop
    );

    Ok(results)
}

/// Search `items` in order of great-circle distance from `(lng, lat)`.
///
/// `items` maps insertion index to payload: `items[i]` is the value whose coordinates were the
/// `i`-th point added to `tree`. Only items for which `predicate` returns `true` are returned.
///
/// ```
/// use geo_kdtree::around_items;
/// use geo_kdtree::kdtree::KDTreeBuilder;
///
/// let cities = [("Kiev", 30.52, 50.45), ("Lviv", 24.02, 49.84), ("Odessa", 30.73, 46.48)];
/// let mut builder = KDTreeBuilder::<f64>::new(cities.len() as u32);
/// for (_, lng, lat) in cities.iter() {
///     builder.add(*lng, *lat);
/// }
/// let tree = builder.finish().unwrap();
///
/// let found = around_items(&tree, &cities, 30.5, 50.5, None, None, |c| c.0 != "Kiev");
/// let names: Vec<_> = found.iter().map(|c| c.0).collect();
/// assert_eq!(names, ["Odessa", "Lviv"]);
/// ```
///
/// # Panics
///
/// If `items` is shorter than the number of points in `tree`.
pub fn around_items<'p, N, T, P, F>(
    tree: &T,
    items: &'p [P],
    lng: f64,
    lat: f64,
    max_results: Option<usize>,
    max_distance: Option<f64>,
    mut predicate: F,
) -> Vec<&'p P>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    F: FnMut(&P) -> bool,
{
    match try_around_items(tree, items, lng, lat, max_results, max_distance, |item| {
        Ok::<_, Infallible>(predicate(item))
    }) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Like [`around_items`] with a fallible predicate.
///
/// The first error returned by `predicate` aborts the search and is returned unchanged.
///
/// # Panics
///
/// If `items` is shorter than the number of points in `tree`.
pub fn try_around_items<'p, N, T, P, E, F>(
    tree: &T,
    items: &'p [P],
    lng: f64,
    lat: f64,
    max_results: Option<usize>,
    max_distance: Option<f64>,
    mut predicate: F,
) -> Result<Vec<&'p P>, E>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    F: FnMut(&P) -> Result<bool, E>,
{
    assert!(
        items.len() >= tree.num_items() as usize,
        "Got {} items for a tree of {} points.",
        items.len(),
        tree.num_items()
    );

    let neighbors = search(tree, lng, lat, max_results, max_distance, |index| {
        predicate(&items[index as usize])
    })?;
    Ok(neighbors
        .into_iter()
        .map(|n| &items[n.index as usize])
        .collect())
}

/// Run one [`KDTreeIndex::around`] search per `(lng, lat)` query in parallel.
///
/// The tree is shared read-only between all searches.
#[cfg(feature = "rayon")]
pub fn par_around<N, T>(
    tree: &T,
    queries: &[(f64, f64)],
    max_results: Option<usize>,
    max_distance: Option<f64>,
) -> Vec<Vec<u32>>
where
    N: IndexableNum,
    T: KDTreeIndex<N> + Sync,
{
    use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    queries
        .par_iter()
        .map(|&(lng, lat)| tree.around(lng, lat, max_results, max_distance))
        .collect()
}
