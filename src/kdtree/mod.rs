//! An implementation of an immutable, ABI-stable K-D Tree over longitude/latitude points.
//!
//! The buffer layout is compatible with [kdbush](https://github.com/mourner/kdbush).

#![warn(missing_docs)]

mod builder;
pub(crate) mod constants;
mod index;
mod r#trait;
pub mod traversal;

pub use builder::{KDTreeBuilder, DEFAULT_KDTREE_NODE_SIZE};
pub use index::{KDTree, KDTreeMetadata, KDTreeRef};
pub use r#trait::KDTreeIndex;
