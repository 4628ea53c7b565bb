use std::fmt;

use serde::Serialize;

use crate::{graph::AccessGraph, types::FunctionalType};

/// Counts of existing sites in the graph, by functional type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub multifunctional: usize,
    pub event: usize,
    pub educational: usize,
    pub sports: usize,
    pub total: usize, // Includes existing sites with no type
}

impl SiteSummary {
    #[inline]
    pub fn get(&self, ty: FunctionalType) -> usize {
        match ty {
            FunctionalType::Multifunctional => self.multifunctional,
            FunctionalType::Event => self.event,
            FunctionalType::Educational => self.educational,
            FunctionalType::Sports => self.sports,
        }
    }
}

/// Count existing site nodes by functional type.
pub fn site_summary(graph: &AccessGraph) -> SiteSummary {
    graph.sites()
        .filter(|site| site.is_existing())
        .fold(SiteSummary::default(), |mut summary, site| {
            summary.total += 1;
            match site.functional_type {
                Some(FunctionalType::Multifunctional) => summary.multifunctional += 1,
                Some(FunctionalType::Event) => summary.event += 1,
                Some(FunctionalType::Educational) => summary.educational += 1,
                Some(FunctionalType::Sports) => summary.sports += 1,
                None => {}
            }
            summary
        })
}

impl fmt::Display for SiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Existing sites: {}", self.total)?;
        for ty in FunctionalType::all() {
            writeln!(f, "  {:<16} {}", ty.to_str(), self.get(ty))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::GraphBuilder,
        join::Reach,
        types::{AreaType, Building, ExistenceState, HouseId, Site, SiteId},
    };
    use geo::{MultiPolygon, Point};

    fn site(id: u64, ty: Option<FunctionalType>, existence: ExistenceState) -> Site {
        let mut site = Site::new(SiteId(id), 10.0, AreaType::Large, MultiPolygon::new(vec![]));
        site.functional_type = ty;
        site.existence = existence;
        site
    }

    #[test]
    fn counts_existing_sites_only() {
        let sites = [
            site(1, Some(FunctionalType::Sports), ExistenceState::Existing),
            site(2, Some(FunctionalType::Sports), ExistenceState::Existing),
            site(3, Some(FunctionalType::Event), ExistenceState::Potential),
            site(4, None, ExistenceState::Existing),
        ];
        let buildings = [Building::new(HouseId(1), 3, Point::new(0.0, 0.0))];
        let reach = (1..=4).map(|s| (SiteId(s), std::collections::BTreeSet::from([HouseId(1)]))).collect::<Reach>();
        let graph = GraphBuilder::new(&sites, &buildings).build(&reach, &reach, &reach).unwrap();

        let summary = site_summary(&graph);
        assert_eq!(summary, SiteSummary { multifunctional: 0, event: 0, educational: 0, sports: 2, total: 3 });
        assert_eq!(summary.get(FunctionalType::Sports), 2);
    }

    #[test]
    fn empty_graph_gives_zero_counts() {
        assert_eq!(site_summary(&AccessGraph::default()), SiteSummary::default());
    }
}
