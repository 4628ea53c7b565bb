use std::{collections::BTreeMap, path::{Path, PathBuf}};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Geometry, MultiPolygon};
use serde_json::{json, Map};

use crate::{
    io::{read_geojson, write_geojson, Feature},
    types::{SiteId, TravelTime},
};

/// Attribute holding the site id in isochrone layer files.
const ID_FIELD: &str = "id";

/// Reachable-area polygons of every site for one travel-time budget.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneLayer {
    time: TravelTime,
    polygons: BTreeMap<SiteId, MultiPolygon<f64>>,
}

impl IsochroneLayer {
    pub fn new(time: TravelTime) -> Self {
        Self { time, polygons: BTreeMap::new() }
    }

    /// Get the travel-time budget of this layer.
    #[inline] pub fn time(&self) -> TravelTime { self.time }

    #[inline] pub fn len(&self) -> usize { self.polygons.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.polygons.is_empty() }

    /// Get the isochrone of a site, if one was computed.
    #[inline]
    pub fn get(&self, site: SiteId) -> Option<&MultiPolygon<f64>> { self.polygons.get(&site) }

    /// Set the isochrone of a site, replacing any previous one.
    pub fn insert(&mut self, site: SiteId, polygon: impl Into<MultiPolygon<f64>>) {
        self.polygons.insert(site, polygon.into());
    }

    /// Iterate over (site, polygon) pairs in site order.
    pub fn iter(&self) -> impl Iterator<Item = (SiteId, &MultiPolygon<f64>)> {
        self.polygons.iter().map(|(&site, polygon)| (site, polygon))
    }

    /// Read a layer from a GeoJSON file whose features carry the site `id`.
    pub fn read(path: &Path, time: TravelTime) -> Result<Self> {
        let mut layer = Self::new(time);
        for (i, feature) in read_geojson(path)?.into_iter().enumerate() {
            let site = feature.get_u64(ID_FIELD)
                .map(SiteId)
                .ok_or_else(|| anyhow!("[isochrone] Feature {i} of {} has no site id", path.display()))?;
            let polygon = match feature.geometry {
                Some(Geometry::Polygon(polygon)) => MultiPolygon(vec![polygon]),
                Some(Geometry::MultiPolygon(polygons)) => polygons,
                _ => bail!("[isochrone] Isochrone of site {site} in {} is not a polygon", path.display()),
            };
            if layer.polygons.insert(site, polygon).is_some() {
                bail!("[isochrone] Site {site} has two isochrones in {}", path.display());
            }
        }
        Ok(layer)
    }

    /// Write the layer as a GeoJSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let features = self.iter()
            .map(|(site, polygon)| {
                let mut properties = Map::new();
                properties.insert(ID_FIELD.to_string(), json!(site.0));
                properties.insert("time".to_string(), json!(self.time.minutes()));
                Feature::new(Some(Geometry::MultiPolygon(polygon.clone())), properties)
            })
            .collect::<Vec<_>>();
        write_geojson(path, &features)
    }
}

/// The three isochrone layers (5, 10 and 20 minutes).
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneSet {
    five: IsochroneLayer,
    ten: IsochroneLayer,
    twenty: IsochroneLayer,
}

impl IsochroneSet {
    /// Assemble a set from three layers; each must carry its matching budget.
    pub fn new(five: IsochroneLayer, ten: IsochroneLayer, twenty: IsochroneLayer) -> Result<Self> {
        for (layer, expected) in [(&five, TravelTime::Five), (&ten, TravelTime::Ten), (&twenty, TravelTime::Twenty)] {
            if layer.time() != expected {
                bail!("[isochrone] Expected a {expected} layer, got {}", layer.time());
            }
        }
        Ok(Self { five, ten, twenty })
    }

    /// Get the layer for a budget.
    pub fn get(&self, time: TravelTime) -> &IsochroneLayer {
        match time {
            TravelTime::Five => &self.five,
            TravelTime::Ten => &self.ten,
            TravelTime::Twenty => &self.twenty,
        }
    }

    /// File name of a layer inside an isochrone directory, e.g. `iso_10.geojson`.
    pub fn file_name(time: TravelTime) -> String { format!("iso_{}.geojson", time.minutes()) }

    fn layer_path(dir: &Path, time: TravelTime) -> PathBuf { dir.join(Self::file_name(time)) }

    /// Read `iso_5.geojson`, `iso_10.geojson` and `iso_20.geojson` from a directory.
    pub fn read_dir(dir: &Path) -> Result<Self> {
        let read = |time| IsochroneLayer::read(&Self::layer_path(dir, time), time)
            .with_context(|| format!("[isochrone] Failed to load {time} isochrones from {}", dir.display()));
        Self::new(read(TravelTime::Five)?, read(TravelTime::Ten)?, read(TravelTime::Twenty)?)
    }

    /// Write the three layers into a directory, creating it if needed.
    pub fn write_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("[isochrone] Failed to create {}", dir.display()))?;
        for time in TravelTime::all() {
            self.get(time).write(&Self::layer_path(dir, time))?;
        }
        Ok(())
    }
}
