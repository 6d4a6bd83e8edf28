use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use super::authority::{AuthorityDefinition, AuthorityDocument};
use super::error::StandardsError;
use super::table::ConfigurationError;
use crate::config::StandardsConfig;

const BUILTIN_DOCUMENTS: [(&str, &str); 4] = [
    ("cook.json", include_str!("../../data/authorities/cook.json")),
    ("dupage.json", include_str!("../../data/authorities/dupage.json")),
    ("lake.json", include_str!("../../data/authorities/lake.json")),
    ("will.json", include_str!("../../data/authorities/will.json")),
];

/// Failure to assemble the registry at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read authority data at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("authority document {name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("no authority documents found in {path}")]
    Empty { path: PathBuf },
}

/// Immutable set of configured housing authorities, keyed by registry key.
#[derive(Debug, Clone)]
pub struct AuthorityRegistry {
    authorities: BTreeMap<String, AuthorityDefinition>,
}

impl AuthorityRegistry {
    pub fn new(
        definitions: impl IntoIterator<Item = AuthorityDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut authorities = BTreeMap::new();
        for definition in definitions {
            if authorities.contains_key(&definition.key) {
                return Err(ConfigurationError::DuplicateAuthority {
                    key: definition.key,
                });
            }
            authorities.insert(definition.key.clone(), definition);
        }
        Ok(Self { authorities })
    }

    /// The four county authorities shipped with the crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        let documents = BUILTIN_DOCUMENTS
            .iter()
            .map(|(name, raw)| parse_document(name, raw.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_documents(documents)
    }

    pub fn from_documents(documents: Vec<AuthorityDocument>) -> Result<Self, RegistryError> {
        let definitions = documents
            .into_iter()
            .map(AuthorityDefinition::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        let registry = Self::new(definitions)?;

        for authority in registry.authorities() {
            info!(
                key = %authority.key,
                authority = %authority.abbreviation,
                effective = %authority.effective_date,
                zip_codes = authority.table.zip_count(),
                towns = authority.table.town_count(),
                "payment standards loaded"
            );
        }

        Ok(registry)
    }

    /// Loads every `*.json` document in `dir`, in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(RegistryError::Empty {
                path: dir.to_path_buf(),
            });
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let mut raw = Vec::new();
            std::fs::File::open(&path)
                .and_then(|mut file| file.read_to_end(&mut raw))
                .map_err(|source| RegistryError::Io {
                    path: path.clone(),
                    source,
                })?;
            documents.push(parse_document(&path.display().to_string(), &raw)?);
        }

        Self::from_documents(documents)
    }

    pub fn from_config(config: &StandardsConfig) -> Result<Self, RegistryError> {
        match &config.authority_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Finds the authority serving `county`: registry key, county name (with or
    /// without "County") or authority abbreviation, ignoring case.
    pub fn get_authority(&self, county: &str) -> Result<&AuthorityDefinition, StandardsError> {
        let key = county.trim().to_ascii_lowercase();
        if let Some(authority) = self.authorities.get(&key) {
            return Ok(authority);
        }

        self.authorities
            .values()
            .find(|authority| authority.answers_to(county))
            .ok_or_else(|| StandardsError::UnsupportedCounty {
                county: county.trim().to_string(),
            })
    }

    pub fn authorities(&self) -> impl Iterator<Item = &AuthorityDefinition> {
        self.authorities.values()
    }

    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }
}

fn parse_document(name: &str, raw: &[u8]) -> Result<AuthorityDocument, RegistryError> {
    serde_json::from_slice(raw).map_err(|source| RegistryError::Parse {
        name: name.to_string(),
        source,
    })
}
