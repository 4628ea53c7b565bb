use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

/// A point in an R-tree, associated with a layer record by index.
#[derive(Debug, Clone)]
pub(crate) struct IndexedPoint {
    idx: usize, // Index of corresponding record in its layer
    point: Point<f64>,
}

impl IndexedPoint {
    pub(crate) fn new(idx: usize, point: Point<f64>) -> Self {
        Self { idx, point }
    }

    /// Get the index of the corresponding record.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }

    /// Get a reference to the point.
    #[inline] pub(crate) fn point(&self) -> &Point<f64> { &self.point }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x(), self.point.y()])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x() - point[0];
        let dy = self.point.y() - point[1];
        dx * dx + dy * dy
    }
}
