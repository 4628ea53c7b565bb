use geo::{BoundingRect, Intersects, MultiPolygon, Point, Rect};
use rstar::{RTree, AABB};

use crate::geom::IndexedPoint;

/// PointIndex is a static R-tree over a layer of points, addressed by layer index.
#[derive(Debug, Clone)]
pub(crate) struct PointIndex {
    rtree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Construct a PointIndex from points, indexed by their position in the iterator.
    pub(crate) fn new(points: impl IntoIterator<Item = Point<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                points.into_iter().enumerate()
                    .filter(|(_, point)| point.x().is_finite() && point.y().is_finite())
                    .map(|(i, point)| IndexedPoint::new(i, point))
                    .collect()
            ),
        }
    }

    /// Get the number of indexed points.
    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }

    /// Check if there are no indexed points.
    #[inline] pub(crate) fn is_empty(&self) -> bool { self.rtree.size() == 0 }

    /// Points inside `rect` grown by `margin` on every side.
    pub(crate) fn within_rect(&self, rect: &Rect<f64>, margin: f64) -> impl Iterator<Item = &IndexedPoint> {
        let envelope = AABB::from_corners(
            [rect.min().x - margin, rect.min().y - margin],
            [rect.max().x + margin, rect.max().y + margin],
        );
        self.rtree.locate_in_envelope(&envelope)
    }

    /// Indices of all points intersecting a polygon (boundary included), ascending.
    pub(crate) fn intersecting(&self, polygon: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = polygon.bounding_rect() else { return Vec::new() };
        let mut indices = self.within_rect(&rect, 0.0)
            .filter(|entry| polygon.intersects(entry.point()))
            .map(|entry| entry.idx())
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    /// Index of the point nearest to `point`.
    #[inline]
    pub(crate) fn nearest(&self, point: &Point<f64>) -> Option<usize> {
        self.rtree.nearest_neighbor(&[point.x(), point.y()]).map(|entry| entry.idx())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, point};

    fn grid() -> PointIndex {
        PointIndex::new((0..5).flat_map(|x| (0..5).map(move |y| Point::new(x as f64, y as f64))))
    }

    #[test]
    fn nearest_returns_layer_index() {
        let index = grid();
        assert_eq!(index.len(), 25);
        assert_eq!(index.nearest(&point!(x: 0.1, y: 0.2)), Some(0));
        assert_eq!(index.nearest(&point!(x: 3.9, y: 4.2)), Some(4 * 5 + 4));
    }

    #[test]
    fn intersecting_includes_boundary_points() {
        let index = grid();
        let square = MultiPolygon::new(vec![polygon![
            (x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0),
        ]]);

        // (1,1), (1,2), (2,1), (2,2) all lie on the boundary.
        assert_eq!(index.intersecting(&square), vec![6, 7, 11, 12]);
    }

    #[test]
    fn within_rect_grows_envelope_by_margin() {
        let index = grid();
        let rect = Rect::new((2.0, 2.0), (2.0, 2.0));
        assert_eq!(index.within_rect(&rect, 0.0).count(), 1);
        assert_eq!(index.within_rect(&rect, 1.0).count(), 9);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let index = PointIndex::new(vec![Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest(&point!(x: 0.0, y: 0.0)), Some(1));
        assert!(!index.is_empty());
    }
}
