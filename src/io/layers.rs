use std::{collections::HashSet, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Area, Centroid, Geometry, MultiPolygon, Point};
use serde_json::{json, Map};
use tracing::{debug, info};

use crate::{
    config::FieldNames,
    io::{read_geojson, read_shapefile, Feature},
    types::{Building, HouseId, Service, Site, SiteId},
};

/// Read a vector layer, choosing the format from the file extension.
pub fn read_layer(path: &Path) -> Result<Vec<Feature>> {
    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let features = match extension.as_deref() {
        Some("geojson" | "json") => read_geojson(path)?,
        Some("shp") => read_shapefile(path)?,
        _ => bail!("[io::layers] Unsupported layer format: {}", path.display()),
    };
    info!(path = %path.display(), features = features.len(), "read layer");
    Ok(features)
}

/// Representative point of a feature: the point itself, or the centroid of an areal geometry.
fn representative_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(point) => Some(*point),
        other => other.centroid(),
    }
}

/// Build sites from a polygon layer.
pub fn sites_from_features(features: &[Feature], fields: &FieldNames) -> Result<Vec<Site>> {
    let mut seen = HashSet::new();
    features.iter().enumerate()
        .map(|(i, feature)| {
            let site = site_from_feature(feature, fields)
                .with_context(|| format!("[io::layers] Invalid site in feature {i}"))?;
            if !seen.insert(site.id) { bail!("[io::layers] Duplicate site id {}", site.id) }
            Ok(site)
        })
        .collect()
}

fn site_from_feature(feature: &Feature, fields: &FieldNames) -> Result<Site> {
    let id = feature.get_u64(&fields.site_id)
        .ok_or_else(|| anyhow!("missing or invalid {:?}", fields.site_id))?;

    let geometry = match &feature.geometry {
        Some(Geometry::Polygon(polygon)) => MultiPolygon(vec![polygon.clone()]),
        Some(Geometry::MultiPolygon(polygons)) => polygons.clone(),
        _ => bail!("site {id} has no polygon geometry"),
    };

    let area_type = feature.get_str(&fields.site_area_type)
        .ok_or_else(|| anyhow!("site {id} is missing {:?}", fields.site_area_type))?
        .parse()?;

    let area = feature.get_f64(&fields.site_area).unwrap_or_else(|| geometry.unsigned_area());

    let mut site = Site::new(SiteId(id), area, area_type, geometry);
    site.city_function = feature.get_str(&fields.site_city_function).map(str::to_string);
    if let Some(ty) = feature.get_str(&fields.site_functional_type) {
        site.functional_type = Some(ty.parse()?);
    }
    if let Some(state) = feature.get_str(&fields.site_exists) {
        site.existence = state.parse()?;
    }
    Ok(site)
}

/// Build buildings from a point or polygon layer.
/// Without an id attribute, buildings are numbered densely in file order.
pub fn buildings_from_features(features: &[Feature], fields: &FieldNames) -> Result<Vec<Building>> {
    let mut seen = HashSet::new();
    features.iter().enumerate()
        .map(|(i, feature)| {
            let id = match feature.get(&fields.house_id) {
                None => HouseId(i as u64),
                Some(value) => feature.get_u64(&fields.house_id).map(HouseId)
                    .ok_or_else(|| anyhow!("[io::layers] Invalid {:?} {value} in feature {i}", fields.house_id))?,
            };
            if !seen.insert(id) { bail!("[io::layers] Duplicate building id {id}") }

            let people = feature.get_u64(&fields.house_people)
                .ok_or_else(|| anyhow!("[io::layers] Building {id} is missing {:?}", fields.house_people))?;
            let people = u32::try_from(people)
                .with_context(|| format!("[io::layers] Building {id} population out of range"))?;

            let location = feature.geometry.as_ref()
                .and_then(representative_point)
                .ok_or_else(|| anyhow!("[io::layers] Building {id} has no usable geometry"))?;

            Ok(Building::new(id, people, location))
        })
        .collect()
}

/// Build services from a point layer, skipping records without geometry.
/// Records without a subtype are kept as untyped services.
pub fn services_from_features(features: &[Feature], fields: &FieldNames) -> Vec<Service> {
    let services = features.iter()
        .filter_map(|feature| {
            let location = feature.geometry.as_ref().and_then(representative_point)?;
            Some(Service {
                service_type: feature.get_str(&fields.service_type).map(str::to_string),
                location,
            })
        })
        .collect::<Vec<_>>();

    if services.len() < features.len() {
        debug!(skipped = features.len() - services.len(), "services without geometry");
    }
    services
}

/// Convert sites back to features, writing their current classification.
pub fn sites_to_features(sites: &[Site], fields: &FieldNames) -> Vec<Feature> {
    sites.iter()
        .map(|site| {
            let mut properties = Map::new();
            properties.insert(fields.site_id.clone(), json!(site.id.0));
            properties.insert(fields.site_area.clone(), json!(site.area));
            properties.insert(fields.site_area_type.clone(), json!(site.area_type.to_str()));
            if let Some(function) = &site.city_function {
                properties.insert(fields.site_city_function.clone(), json!(function));
            }
            properties.insert(fields.site_functional_type.clone(),
                json!(site.functional_type.map(|ty| ty.to_str()).unwrap_or("")));
            properties.insert(fields.site_exists.clone(), json!(site.existence.to_str()));
            Feature::new(Some(Geometry::MultiPolygon(site.geometry.clone())), properties)
        })
        .collect()
}
