//! Persona descriptions: display name, traits, style and constraints for
//! each personality, loaded from a YAML document.
//!
//! Loading never fails the caller: a missing file, a parse error or a
//! document that omits a personality falls back to the built-in set with a
//! warning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::builtin;
use crate::contracts::Personality;
use crate::error::PersonaConfigError;

/// Description of one personality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Display name.
    pub name: String,

    pub key: Personality,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub traits: Vec<String>,

    #[serde(default)]
    pub communication_style: Vec<String>,

    #[serde(default)]
    pub response_principles: Vec<String>,

    #[serde(default)]
    pub constraints: Vec<String>,
}

/// On-disk layouts accepted for the persona document.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersonaDocument {
    /// `personas: [ {key: CuteCat, ...}, ... ]`
    List { personas: Vec<PersonaConfig> },
    /// `CuteCat: {key: CuteCat, ...}`
    Map(BTreeMap<Personality, PersonaConfig>),
}

/// Read-only set of persona descriptions, keyed by personality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaCatalog {
    personas: BTreeMap<Personality, PersonaConfig>,

    /// File the catalog was loaded from, if any.
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PersonaCatalog {
    /// The built-in descriptions for all six personalities.
    pub fn builtin() -> Self {
        Self {
            personas: Personality::ALL
                .iter()
                .map(|p| (*p, builtin::default_config(*p)))
                .collect(),
            source: None,
        }
    }

    /// Parse a persona document.  The result may be partial.
    pub fn from_yaml(yaml: &str) -> Result<Self, PersonaConfigError> {
        let personas = match serde_yaml::from_str::<PersonaDocument>(yaml)? {
            PersonaDocument::List { personas } => {
                personas.into_iter().map(|c| (c.key, c)).collect()
            }
            PersonaDocument::Map(map) => map,
        };
        Ok(Self {
            personas,
            source: None,
        })
    }

    /// Parse a persona document from disk.  The result may be partial.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PersonaConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut catalog = Self::from_yaml(&content)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Error if any personality lacks an entry.
    pub fn require_complete(&self) -> Result<(), PersonaConfigError> {
        match Personality::ALL.iter().find(|p| !self.personas.contains_key(*p)) {
            Some(missing) => Err(PersonaConfigError::Missing(*missing)),
            None => Ok(()),
        }
    }

    /// Load a complete catalog from `path`, or the built-in one.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::from_yaml_file(path).and_then(|c| c.require_complete().map(|_| c)) {
            Ok(catalog) => {
                info!("Loaded {} personas from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!(
                    "Persona document {} unusable ({}), using built-in personas",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    pub fn get(&self, personality: Personality) -> Option<&PersonaConfig> {
        self.personas.get(&personality)
    }

    /// Personalities with an entry, in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = Personality> + '_ {
        self.personas.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaConfig> {
        self.personas.values()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

static DEFAULT_CATALOG: OnceLock<PersonaCatalog> = OnceLock::new();

/// Process-wide persona catalog.
///
/// Loaded once from `COMPANION_PERSONA_FILE` when set, else built in.
pub fn persona_catalog() -> &'static PersonaCatalog {
    DEFAULT_CATALOG.get_or_init(|| {
        let path = std::env::var_os(crate::config::ENV_PERSONA_FILE).map(PathBuf::from);
        PersonaCatalog::load(path.as_deref())
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = include_str!("../../config/personas.yaml");

    #[test]
    fn test_builtin_is_complete() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(catalog.len(), Personality::COUNT);
        assert!(catalog.require_complete().is_ok());
        assert_eq!(catalog.keys().collect::<Vec<_>>(), Personality::ALL.to_vec());
        assert!(catalog.iter().all(|c| !c.description.is_empty()));
        assert_eq!(
            catalog.get(Personality::CuteCat).unwrap().key,
            Personality::CuteCat
        );
    }

    #[test]
    fn test_sample_document_is_complete() {
        let catalog = PersonaCatalog::from_yaml(SAMPLE).unwrap();
        assert!(catalog.require_complete().is_ok());
    }

    #[test]
    fn test_map_layout() {
        let yaml = r#"
ColdBoss:
  name: The Boss
  key: ColdBoss
  traits: [demanding]
"#;
        let catalog = PersonaCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(Personality::ColdBoss).unwrap().name, "The Boss");
        assert!(matches!(
            catalog.require_complete(),
            Err(PersonaConfigError::Missing(Personality::StandardAssistant))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let catalog = PersonaCatalog::load(Some(Path::new("/nonexistent/personas.yaml")));
        assert_eq!(catalog, PersonaCatalog::builtin());
    }

    #[test]
    fn test_partial_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "personas:\n  - name: Cat\n    key: CuteCat").unwrap();
        let catalog = PersonaCatalog::load(Some(file.path()));
        assert_eq!(catalog.len(), Personality::COUNT);
        assert!(catalog.source().is_none());
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "personas: [[[").unwrap();
        let catalog = PersonaCatalog::load(Some(file.path()));
        assert_eq!(catalog, PersonaCatalog::builtin());
    }

    #[test]
    fn test_complete_file_is_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let catalog = PersonaCatalog::load(Some(file.path()));
        assert_eq!(catalog.source(), Some(file.path()));
        assert_eq!(catalog.len(), Personality::COUNT);
    }
}
