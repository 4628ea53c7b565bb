use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Map, Value};
use shapefile::{dbase::FieldValue, PolygonRing, Reader, Shape};

use crate::io::Feature;

/// Reads all shapes + attribute records from a given `.shp` file path.
pub fn read_shapefile(path: &Path) -> Result<Vec<Feature>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shapefile] Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("[io::shapefile] Error reading shape+record")?;
        let properties = record.into_iter()
            .map(|(field, value)| (field, field_to_json(value)))
            .collect::<Map<_, _>>();
        features.push(Feature::new(shape_to_geometry(shape), properties));
    }
    Ok(features)
}

/// Convert a dBase attribute to JSON; unsupported field kinds become null.
fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(s)) => json!(s.trim()),
        FieldValue::Numeric(Some(n)) => json!(n),
        FieldValue::Float(Some(n)) => json!(n as f64),
        FieldValue::Integer(n) => json!(n),
        FieldValue::Double(n) => json!(n),
        FieldValue::Logical(Some(b)) => json!(b),
        _ => Value::Null,
    }
}

/// Convert point and polygon shapes; other shape kinds carry no geometry.
fn shape_to_geometry(shape: Shape) -> Option<Geometry<f64>> {
    match shape {
        Shape::Point(p) => Some(Geometry::Point(Point::new(p.x, p.y))),
        Shape::Polygon(polygon) => {
            let mut polygons: Vec<Polygon<f64>> = Vec::new();
            for ring in polygon.rings() {
                let line = LineString(ring.points().iter().map(|p| Coord { x: p.x, y: p.y }).collect());
                match ring {
                    PolygonRing::Outer(_) => polygons.push(Polygon::new(line, vec![])),
                    PolygonRing::Inner(_) => match polygons.last_mut() {
                        Some(last) => last.interiors_push(line),
                        None => polygons.push(Polygon::new(line, vec![])),
                    },
                }
            }
            Some(Geometry::MultiPolygon(MultiPolygon(polygons)))
        }
        _ => None,
    }
}
