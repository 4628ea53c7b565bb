use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{json, Value};

use crate::io::Feature;

/// Read all features of a GeoJSON FeatureCollection file.
pub fn read_geojson(path: &Path) -> Result<Vec<Feature>> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read {}", path.display()))?;
    read_geojson_bytes(&bytes)
        .with_context(|| format!("[io::geojson] Failed to parse {}", path.display()))
}

/// Read all features of a GeoJSON FeatureCollection from bytes.
pub fn read_geojson_bytes(bytes: &[u8]) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Invalid JSON")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] Expected a FeatureCollection with a \"features\" array"))?;

    features.iter().enumerate()
        .map(|(i, feature)| {
            let geometry = match feature.get("geometry") {
                None | Some(Value::Null) => None,
                Some(geometry) => Some(parse_geometry(geometry)
                    .with_context(|| format!("[io::geojson] Invalid geometry in feature {i}"))?),
            };
            let properties = feature["properties"].as_object().cloned().unwrap_or_default();
            Ok(Feature::new(geometry, properties))
        })
        .collect()
}

/// Write features as a GeoJSON FeatureCollection file.
pub fn write_geojson(path: &Path, features: &[Feature]) -> Result<()> {
    let collection = features_to_geojson(features)?;
    let bytes = serde_json::to_vec(&collection).context("[io::geojson] Failed to serialize GeoJSON")?;
    fs::write(path, bytes)
        .with_context(|| format!("[io::geojson] Failed to write {}", path.display()))
}

/// Convert features to a GeoJSON FeatureCollection value.
fn features_to_geojson(features: &[Feature]) -> Result<Value> {
    let features = features.iter()
        .map(|feature| Ok(json!({
            "type": "Feature",
            "geometry": match &feature.geometry {
                Some(geometry) => geometry_to_geojson(geometry)?,
                None => Value::Null,
            },
            "properties": feature.properties,
        })))
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// Convert a geometry to a GeoJSON geometry object.
fn geometry_to_geojson(geometry: &Geometry<f64>) -> Result<Value> {
    Ok(match geometry {
        Geometry::Point(point) => json!({
            "type": "Point",
            "coordinates": [point.x(), point.y()],
        }),
        Geometry::MultiPoint(points) => json!({
            "type": "MultiPoint",
            "coordinates": points.iter().map(|p| vec![p.x(), p.y()]).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(polygon) => json!({
            "type": "Polygon",
            "coordinates": polygon_coords(polygon),
        }),
        Geometry::MultiPolygon(polygons) => json!({
            "type": "MultiPolygon",
            "coordinates": polygons.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
        _ => bail!("[io::geojson] Unsupported geometry type for output"),
    })
}

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

/// Parse a GeoJSON geometry object (Point, MultiPoint, Polygon, MultiPolygon).
fn parse_geometry(geometry: &Value) -> Result<Geometry<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing coordinates"))?;

    Ok(match geometry["type"].as_str() {
        Some("Point") => Geometry::Point(Point::from(parse_coord(coords)?)),
        Some("MultiPoint") => Geometry::MultiPoint(MultiPoint(
            coords.iter().map(|c| Ok(Point::from(parse_coord(as_array(c)?)?))).collect::<Result<_>>()?
        )),
        Some("Polygon") => Geometry::Polygon(parse_polygon_coords(coords)?),
        Some("MultiPolygon") => Geometry::MultiPolygon(MultiPolygon(
            coords.iter().map(|p| parse_polygon_coords(as_array(p)?)).collect::<Result<_>>()?
        )),
        Some(other) => bail!("unsupported geometry type {other:?}"),
        None => bail!("missing geometry type"),
    })
}

#[inline]
fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("expected a coordinate array"))
}

/// Parse Polygon coordinates: [exterior, hole, hole, ...].
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| parse_ring_coords(as_array(ring)?));
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("polygon without exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring (exterior or interior): [[x, y], [x, y], ...].
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|c| parse_coord(as_array(c)?))
        .collect::<Result<Vec<_>>>()?;

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// Parse a position: [x, y] (extra ordinates are ignored).
fn parse_coord(position: &[Value]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord {
            x: x.as_f64().ok_or_else(|| anyhow!("x must be a number"))?,
            y: y.as_f64().ok_or_else(|| anyhow!("y must be a number"))?,
        }),
        _ => bail!("position needs at least two numbers"),
    }
}
