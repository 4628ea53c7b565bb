use crate::types::FunctionalType;

/// Planning rules attached to a typed site when it is exported.
pub trait ServicePolicy {
    /// Target service ratio for a site of this type and area, if one is defined.
    fn ratio(&self, functional_type: FunctionalType, area: f64) -> Option<f64>;

    /// Services recommended for a site of this type and area.
    fn recommend_services(&self, functional_type: FunctionalType, area: f64) -> Vec<String>;
}

/// Policy with no rules: no ratio and no recommended services.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnspecifiedPolicy;

impl ServicePolicy for UnspecifiedPolicy {
    fn ratio(&self, _: FunctionalType, _: f64) -> Option<f64> { None }

    fn recommend_services(&self, _: FunctionalType, _: f64) -> Vec<String> { Vec::new() }
}
