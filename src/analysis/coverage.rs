use std::fmt;

use serde::Serialize;

use crate::{graph::AccessGraph, types::FunctionalType};

/// Building coverage by existing sites, and mean travel time to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    pub multifunctional: usize,
    pub event: usize,
    pub educational: usize,
    pub sports: usize,
    pub fully_covered: usize,
    pub total_buildings: usize,
    /// Mean over existing sites of each site's mean edge time, in minutes.
    /// `None` when the graph holds no existing site with an edge.
    pub mean_travel_time: Option<f64>,
}

impl CoverageReport {
    /// Number of buildings covered by at least one existing site of the given type.
    #[inline]
    pub fn covered(&self, ty: FunctionalType) -> usize {
        match ty {
            FunctionalType::Multifunctional => self.multifunctional,
            FunctionalType::Event => self.event,
            FunctionalType::Educational => self.educational,
            FunctionalType::Sports => self.sports,
        }
    }

    /// Share of buildings covered by the given type, in percent (0.0 with no buildings).
    #[inline]
    pub fn percent(&self, ty: FunctionalType) -> f64 { self.ratio(self.covered(ty)) }

    /// Share of buildings covered by all four types, in percent (0.0 with no buildings).
    #[inline]
    pub fn fully_covered_percent(&self) -> f64 { self.ratio(self.fully_covered) }

    fn ratio(&self, count: usize) -> f64 {
        if self.total_buildings == 0 { return 0.0 }
        count as f64 / self.total_buildings as f64 * 100.0
    }
}

/// Compute coverage over every building node of the graph.
pub fn coverage(graph: &AccessGraph) -> CoverageReport {
    let mut report = graph.buildings().fold(CoverageReport::default(), |mut report, building| {
        let provision = &building.provision;
        report.total_buildings += 1;
        report.multifunctional += provision.covers(FunctionalType::Multifunctional) as usize;
        report.event += provision.covers(FunctionalType::Event) as usize;
        report.educational += provision.covers(FunctionalType::Educational) as usize;
        report.sports += provision.covers(FunctionalType::Sports) as usize;
        report.fully_covered += provision.is_full() as usize;
        report
    });

    let site_means = graph.sites()
        .filter(|site| site.is_existing())
        .filter_map(|site| {
            let (sum, count) = graph.site_neighbors(site.id)
                .fold((0u64, 0u64), |(sum, count), (_, time)| (sum + time.minutes() as u64, count + 1));
            (count > 0).then(|| sum as f64 / count as f64)
        })
        .collect::<Vec<_>>();

    report.mean_travel_time = (!site_means.is_empty())
        .then(|| site_means.iter().sum::<f64>() / site_means.len() as f64);
    report
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buildings: {}", self.total_buildings)?;
        for ty in FunctionalType::all() {
            writeln!(f, "  {:<16} {:>6} ({:.2}%)", ty.to_str(), self.covered(ty), self.percent(ty))?;
        }
        writeln!(f, "  {:<16} {:>6} ({:.2}%)", "all", self.fully_covered, self.fully_covered_percent())?;
        match self.mean_travel_time {
            Some(minutes) => writeln!(f, "Mean travel time to existing sites: {minutes:.2} min"),
            None => writeln!(f, "Mean travel time to existing sites: n/a"),
        }
    }
}
