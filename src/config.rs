use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::FunctionalType;

/// Model configuration: attribute names of the source layers and classifier rules.
///
/// Every field has a default matching the source data, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub fields: FieldNames,
    pub classifier: ClassifierRules,
}

impl ModelConfig {
    /// Read a configuration from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("[config] Failed to parse {}", path.display()))
    }
}

/// Attribute names used when reading site, building and service layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub site_id: String,
    pub site_area: String,
    pub site_area_type: String,
    pub site_city_function: String,
    pub site_functional_type: String,
    pub site_exists: String,
    pub house_id: String,
    pub house_people: String,
    pub service_type: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            site_id: "id".to_string(),
            site_area: "area".to_string(),
            site_area_type: "area_type".to_string(),
            site_city_function: "Городская функция".to_string(),
            site_functional_type: "functional_type".to_string(),
            site_exists: "exists".to_string(),
            house_id: "house_id".to_string(),
            house_people: "people".to_string(),
            service_type: "city_service_type".to_string(),
        }
    }
}

/// Rules for classifying candidate sites from nearby services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Only sites tagged with this city function are classification candidates.
    pub candidate_function: String,
    /// Search radius around each site, in layer distance units.
    pub radius: f64,
    pub multifunctional: Vec<String>,
    pub event: Vec<String>,
    pub educational: Vec<String>,
    pub sports: Vec<String>,
}

impl ClassifierRules {
    /// Service subtypes counted toward a functional type.
    pub fn subtypes(&self, ty: FunctionalType) -> &[String] {
        match ty {
            FunctionalType::Multifunctional => &self.multifunctional,
            FunctionalType::Event => &self.event,
            FunctionalType::Educational => &self.educational,
            FunctionalType::Sports => &self.sports,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> { values.iter().map(|s| s.to_string()).collect() }

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            candidate_function: "Природа".to_string(),
            radius: 200.0,
            multifunctional: strings(&[
                "Клуб для детей и подростков", "Торгово-развлекательный центр", "Парк развлечений", "Зоопарк",
            ]),
            event: strings(&[
                "Театр/Концертный зал", "Музей", "Кинотеатр", "Квест", "Картинная галерея",
                "Арт пространство", "Аквапарк", "Цирк", "Боулинг",
            ]),
            educational: strings(&["Музыкальная школа", "Библиотека", "Музей"]),
            sports: strings(&["Спортивная секция", "Спортивный центр", "Бассейн", "Стадион"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: ModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.classifier.radius, 200.0);
        assert_eq!(config.fields.house_people, "people");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: ModelConfig = serde_json::from_str(
            r#"{ "classifier": { "radius": 50.0 }, "fields": { "site_id": "fid" } }"#,
        ).unwrap();

        assert_eq!(config.classifier.radius, 50.0);
        assert_eq!(config.classifier.candidate_function, "Природа");
        assert_eq!(config.fields.site_id, "fid");
        assert_eq!(config.fields.site_area, "area");
    }

    #[test]
    fn museum_counts_toward_event_and_educational() {
        let rules = ClassifierRules::default();
        let museum = "Музей".to_string();
        assert!(rules.subtypes(FunctionalType::Event).contains(&museum));
        assert!(rules.subtypes(FunctionalType::Educational).contains(&museum));
        assert!(!rules.subtypes(FunctionalType::Sports).contains(&museum));
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "classifier": { "candidate_function": "Park" } }"#).unwrap();

        let config = ModelConfig::read(&path).unwrap();
        assert_eq!(config.classifier.candidate_function, "Park");
        assert!(ModelConfig::read(&dir.path().join("missing.json")).is_err());
    }
}
