//! Bounding-box index over a boundary layer.

use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::models::BoundaryRecord;

/// Envelope of one district, pointing back into the layer slice
#[derive(Debug, Clone)]
pub struct IndexedBoundary {
    pub position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBoundary {
    pub fn new(position: usize, boundary: &BoundaryRecord) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = boundary.bbox()?;
        Some(Self {
            position,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// R-tree over the districts of one layer
pub struct BoundaryIndex {
    tree: RTree<IndexedBoundary>,
}

impl BoundaryIndex {
    /// Districts with empty geometry are left out.
    pub fn build(boundaries: &[BoundaryRecord]) -> Self {
        let indexed: Vec<IndexedBoundary> = boundaries
            .iter()
            .enumerate()
            .filter_map(|(position, b)| IndexedBoundary::new(position, b))
            .collect();

        let tree = RTree::bulk_load(indexed);
        debug!("Boundary index built with {} entries", tree.size());
        Self { tree }
    }

    /// Layer positions whose envelope intersects `boundary`'s, in ascending order
    pub fn candidates(&self, boundary: &BoundaryRecord) -> Vec<usize> {
        let Some((min_x, min_y, max_x, max_y)) = boundary.bbox() else {
            return Vec::new();
        };
        let query = AABB::from_corners([min_x, min_y], [max_x, max_y]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|ib| ib.position)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
