//! Color mapping for SVG rendering.

use std::fmt;

use crate::types::{FunctionalType, TravelTime};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

const NEUTRAL: Rgb = Rgb { r: 150, g: 150, b: 150 };

/// Edge color by travel time: green for short walks, red for long ones.
pub(crate) fn travel_time_color(time: TravelTime) -> Rgb {
    match time {
        TravelTime::Five => Rgb { r: 26, g: 150, b: 65 },
        TravelTime::Ten => Rgb { r: 253, g: 174, b: 97 },
        TravelTime::Twenty => Rgb { r: 215, g: 25, b: 28 },
    }
}

/// Site fill by functional type; untyped sites are gray.
pub(crate) fn functional_type_color(ty: Option<FunctionalType>) -> Rgb {
    match ty {
        Some(FunctionalType::Multifunctional) => Rgb { r: 117, g: 112, b: 179 },
        Some(FunctionalType::Event) => Rgb { r: 231, g: 41, b: 138 },
        Some(FunctionalType::Educational) => Rgb { r: 230, g: 171, b: 2 },
        Some(FunctionalType::Sports) => Rgb { r: 27, g: 158, b: 119 },
        None => NEUTRAL,
    }
}
