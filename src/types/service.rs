use geo::Point;

/// A city service (theatre, library, stadium, ...) used as evidence when classifying sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub service_type: Option<String>, // `city_service_type` in the source layer
    pub location: Point<f64>,
}

impl Service {
    pub fn new(service_type: impl Into<String>, location: Point<f64>) -> Self {
        Self { service_type: Some(service_type.into()), location }
    }

    /// A service without a subtype; it matches no category but still counts as nearby.
    pub fn untyped(location: Point<f64>) -> Self { Self { service_type: None, location } }
}
