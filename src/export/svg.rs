//! SVG rendering of the accessibility graph.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use ahash::AHashMap;
use anyhow::{anyhow, Context, Result};
use geo::{BoundingRect, Centroid, Coord, CoordsIter, LineString, MultiPolygon, Point, Rect};
use tracing::info;

use crate::{
    export::color::{functional_type_color, travel_time_color},
    graph::AccessGraph,
    types::{Building, HouseId, Site, SiteId},
};

/// Projection function: layer coords -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

struct SvgWriter {
    writer: BufWriter<File>,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl SvgWriter {
    fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[export::svg] Failed to create {}", path.display()))?;
        Ok(Self { writer: BufWriter::new(file) })
    }

    /// Write the XML declaration, the opening <svg> tag and the styles.
    fn write_header(&mut self, width: f64, height: f64) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.3} {height:.3}">"##)?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        writeln!(self, r##"<defs>
<style>
    .site {{ stroke: #111827; stroke-width: 0.5; fill-opacity: 0.6; }}
    .edge {{ stroke-opacity: 0.35; stroke-width: 0.6; }}
    .bldg {{ fill: #374151; }}
</style>
</defs>"##)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }
}

/// Draw site outlines, building points and graph edges to an SVG file.
///
/// Only graph nodes are drawn; edges run from the site centroid to the
/// building and are colored by travel time.
pub fn render_svg(graph: &AccessGraph, sites: &[Site], buildings: &[Building], path: &Path) -> Result<()> {
    render_svg_with_size(graph, sites, buildings, path, 1200.0, 10.0)
}

fn render_svg_with_size(
    graph: &AccessGraph,
    sites: &[Site],
    buildings: &[Building],
    path: &Path,
    width: f64,
    margin: f64,
) -> Result<()> {
    let sites = sites.iter()
        .filter(|site| graph.site(site.id).is_some())
        .map(|site| (site.id, site))
        .collect::<AHashMap<SiteId, &Site>>();
    let buildings = buildings.iter()
        .filter(|building| graph.building(building.id).is_some())
        .map(|building| (building.id, building))
        .collect::<AHashMap<HouseId, &Building>>();

    let bounds = sites.values().filter_map(|site| site.geometry.bounding_rect())
        .chain(buildings.values().map(|building| building.location.bounding_rect()))
        .reduce(merge_rects)
        .ok_or_else(|| anyhow!("[export::svg] Graph has no geometry to draw"))?;

    let scale = (width - 2.0 * margin) / bounds.width().max(bounds.height()).max(f64::EPSILON);
    let height = bounds.height() * scale + 2.0 * margin;

    // Preserve aspect, Y down.
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    let mut writer = SvgWriter::new(path)?;
    writer.write_header(width, height)?;

    let mut ordered_sites = sites.values().copied().collect::<Vec<_>>();
    ordered_sites.sort_by_key(|site| site.id);
    for site in &ordered_sites {
        let ty = graph.site(site.id).and_then(|node| node.functional_type);
        writeln!(writer, r#"<path class="site" d="{}" style="fill:{}"/>"#,
            multipolygon_to_path(&site.geometry, &project), functional_type_color(ty))?;
    }

    let mut edges = 0;
    for (site, house, time) in graph.edges() {
        let (Some(site), Some(building)) = (sites.get(&site), buildings.get(&house)) else { continue };
        let Some(centroid) = site.geometry.centroid() else { continue };
        draw_edge(&mut writer, &centroid, &building.location, &project, &travel_time_color(time).to_string())?;
        edges += 1;
    }

    let mut ordered_buildings = buildings.values().copied().collect::<Vec<_>>();
    ordered_buildings.sort_by_key(|building| building.id);
    for building in ordered_buildings {
        let (x, y) = project(&building.location.0);
        writeln!(writer, r#"<circle class="bldg" cx="{x:.3}" cy="{y:.3}" r="1.5"/>"#)?;
    }

    writer.write_footer()?;
    writer.flush()?;

    info!(path = %path.display(), sites = sites.len(), buildings = buildings.len(), edges, "rendered graph");
    Ok(())
}

fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

fn draw_edge(writer: &mut impl Write, from: &Point<f64>, to: &Point<f64>, project: &Projection, color: &str) -> Result<()> {
    let (x1, y1) = project(&from.0);
    let (x2, y2) = project(&to.0);
    writeln!(writer, r##"<line class="edge" x1="{x1:.3}" y1="{y1:.3}" x2="{x2:.3}" y2="{y2:.3}" style="stroke:{color}"/>"##)?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use crate::{join::Reach, graph::GraphBuilder, types::{AreaType, TravelTime}};

    #[test]
    fn renders_sites_buildings_and_edges() {
        let square = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)]]);
        let sites = [Site::new(SiteId(1), 100.0, AreaType::Large, square)];
        let buildings = [
            Building::new(HouseId(1), 5, Point::new(20.0, 5.0)),
            Building::new(HouseId(2), 5, Point::new(40.0, 5.0)),
        ];
        let reach = Reach::from([(SiteId(1), [HouseId(1)].into())]);
        let graph = GraphBuilder::new(&sites, &buildings).build(&reach, &reach, &reach).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.svg");
        render_svg(&graph, &sites, &buildings, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="site""#).count(), 1);
        // Building 2 is not in the graph.
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains(&travel_time_color(TravelTime::Five).to_string()));
    }

    #[test]
    fn empty_graph_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_svg(&AccessGraph::default(), &[], &[], &dir.path().join("empty.svg")).is_err());
    }
}
