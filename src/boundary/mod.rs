//! Boundary harmonization between census years.
//!
//! Builds crosswalks by overlaying two years' municipal boundaries, using an
//! R-tree to find candidate pairs.

mod crosswalk;
mod index;

pub use crosswalk::{overlay, CrosswalkPiece};
pub use index::{BoundaryIndex, IndexedBoundary};
