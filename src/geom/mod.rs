mod index;
mod point;

pub(crate) use index::PointIndex;
use point::IndexedPoint;
