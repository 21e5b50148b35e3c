#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::csv::countries::{CountryRecord, normalize_numeric, parse_countries_csv};
use crate::csv::recodes::{RecodeRecord, parse_recodes_csv};
use crate::csv::sitc::{SitcCodeRecord, parse_sitc_csv};
use crate::error::ConcordanceError;
use crate::hash::sha256_hex;
use crate::manifest::{MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile};
use crate::paths::reference_root;

const ROLE_COUNTRIES: &str = "countries";
const ROLE_SITC: &str = "sitc_r2";
const ROLE_RECODES: &str = "intertemporal_countries";

const REQUIRED_ROLES: &[&str] = &[ROLE_COUNTRIES, ROLE_SITC, ROLE_RECODES];

/// A code vocabulary the concordance can translate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSpace {
    /// Three-digit numeric country code.
    Iso3Numeric,
    /// Three-letter alpha country code.
    Iso3Alpha,
    /// Standardized country display name.
    CountryName,
    /// Intertemporally consistent alpha code.
    IntertemporalRecode,
    /// SITC revision 2 product code.
    SitcR2,
    /// Membership in the official SITC revision 2 list.
    SitcOfficial,
}

/// Result of a concordance lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation<'a> {
    Code(&'a str),
    Flag(bool),
    /// Key not found, or the space pair is not supported.
    Missing,
}

impl<'a> Translation<'a> {
    pub fn code(self) -> Option<&'a str> {
        match self {
            Translation::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Translation::Missing)
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ReferenceSummary {
    pub reference_dir: PathBuf,
    pub file_count: usize,
    pub country_count: usize,
    pub sitc_code_count: usize,
    pub recode_count: usize,
}

/// Immutable country and product code mappings.
///
/// Built once from the reference tables and shared read-only by every
/// transformation.
#[derive(Debug, Clone, Default)]
pub struct CodeConcordance {
    numeric_to_alpha: BTreeMap<String, String>,
    numeric_to_name: BTreeMap<String, String>,
    alpha_to_name: BTreeMap<String, String>,
    name_to_alpha: BTreeMap<String, String>,
    alpha_to_recode: BTreeMap<String, String>,
    official_sitc: BTreeSet<String>,
}

impl CodeConcordance {
    pub fn builder() -> CodeConcordanceBuilder {
        CodeConcordanceBuilder::default()
    }

    /// Loads from the default reference directory.
    pub fn load_default() -> Result<Self, ConcordanceError> {
        Self::verify_and_load(&reference_root()).map(|(concordance, _)| concordance)
    }

    /// Verifies every table against `manifest.toml`, then parses them.
    pub fn verify_and_load(
        reference_dir: &Path,
    ) -> Result<(Self, ReferenceSummary), ConcordanceError> {
        let manifest = load_manifest(&reference_dir.join("manifest.toml"))?;
        validate_manifest(&manifest)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        for file in &files {
            verify_file(reference_dir, file)?;
        }

        let countries =
            parse_countries_csv(&resolve_role_path(reference_dir, &files, ROLE_COUNTRIES)?)?;
        let sitc = parse_sitc_csv(&resolve_role_path(reference_dir, &files, ROLE_SITC)?)?;
        let recodes =
            parse_recodes_csv(&resolve_role_path(reference_dir, &files, ROLE_RECODES)?)?;

        let summary = ReferenceSummary {
            reference_dir: reference_dir.to_path_buf(),
            file_count: files.len(),
            country_count: countries.len(),
            sitc_code_count: sitc.len(),
            recode_count: recodes.len(),
        };
        info!(
            reference_dir = %reference_dir.display(),
            countries = summary.country_count,
            sitc_codes = summary.sitc_code_count,
            recodes = summary.recode_count,
            "loaded code concordance"
        );

        Ok((Self::from_records(&countries, &sitc, &recodes), summary))
    }

    pub fn from_records(
        countries: &[CountryRecord],
        sitc: &[SitcCodeRecord],
        recodes: &[RecodeRecord],
    ) -> Self {
        let mut builder = Self::builder();
        for country in countries {
            builder = builder.country(
                &country.numeric_code,
                &country.alpha_code,
                &country.display_name,
            );
        }
        for code in sitc {
            builder = builder.official_sitc(&code.code);
        }
        for recode in recodes {
            builder = builder.recode(&recode.alpha_code, &recode.recode);
        }
        builder.build()
    }

    /// Looks `key` up in `source` space and returns its image in `target` space.
    pub fn translate(&self, source: CodeSpace, target: CodeSpace, key: &str) -> Translation<'_> {
        let key = key.trim();
        let found = match (source, target) {
            (CodeSpace::Iso3Numeric, CodeSpace::Iso3Alpha) => {
                lookup(&self.numeric_to_alpha, &normalize_numeric(key))
            }
            (CodeSpace::Iso3Numeric, CodeSpace::CountryName) => {
                lookup(&self.numeric_to_name, &normalize_numeric(key))
            }
            (CodeSpace::Iso3Alpha, CodeSpace::CountryName) => lookup(&self.alpha_to_name, key),
            (CodeSpace::CountryName, CodeSpace::Iso3Alpha) => lookup(&self.name_to_alpha, key),
            (CodeSpace::Iso3Alpha, CodeSpace::IntertemporalRecode) => {
                lookup(&self.alpha_to_recode, key)
            }
            (CodeSpace::SitcR2, CodeSpace::SitcOfficial) => {
                return Translation::Flag(self.official_sitc.contains(key));
            }
            _ => None,
        };
        found.map_or(Translation::Missing, Translation::Code)
    }

    pub fn iso3_alpha(&self, numeric: &str) -> Option<&str> {
        self.translate(CodeSpace::Iso3Numeric, CodeSpace::Iso3Alpha, numeric)
            .code()
    }

    pub fn country_name(&self, numeric: &str) -> Option<&str> {
        self.translate(CodeSpace::Iso3Numeric, CodeSpace::CountryName, numeric)
            .code()
    }

    /// Intertemporal recode target, or `None` when the country is absent
    /// from the recode table or marked for dropping.
    pub fn recode(&self, alpha: &str) -> Option<&str> {
        self.translate(CodeSpace::Iso3Alpha, CodeSpace::IntertemporalRecode, alpha)
            .code()
            .filter(|code| *code != crate::csv::recodes::DROP_MARKER)
    }

    pub fn is_official_sitc(&self, code: &str) -> bool {
        matches!(
            self.translate(CodeSpace::SitcR2, CodeSpace::SitcOfficial, code),
            Translation::Flag(true)
        )
    }

    pub fn country_count(&self) -> usize {
        self.numeric_to_alpha.len()
    }
}

/// Incremental construction of a [`CodeConcordance`].
///
/// The first entry wins for the many-to-one maps (alpha to name and name to
/// alpha), matching the order of the reference tables.
#[derive(Debug, Default)]
pub struct CodeConcordanceBuilder {
    inner: CodeConcordance,
}

impl CodeConcordanceBuilder {
    #[must_use]
    pub fn country(mut self, numeric: &str, alpha: &str, name: &str) -> Self {
        let numeric = normalize_numeric(numeric);
        self.inner
            .numeric_to_alpha
            .insert(numeric.clone(), alpha.to_string());
        self.inner
            .numeric_to_name
            .insert(numeric, name.to_string());
        self.inner
            .alpha_to_name
            .entry(alpha.to_string())
            .or_insert_with(|| name.to_string());
        self.inner
            .name_to_alpha
            .entry(name.to_string())
            .or_insert_with(|| alpha.to_string());
        self
    }

    #[must_use]
    pub fn official_sitc(mut self, code: &str) -> Self {
        self.inner.official_sitc.insert(code.to_string());
        self
    }

    #[must_use]
    pub fn recode(mut self, alpha: &str, recode: &str) -> Self {
        self.inner
            .alpha_to_recode
            .insert(alpha.to_string(), recode.to_string());
        self
    }

    pub fn build(self) -> CodeConcordance {
        self.inner
    }
}

fn lookup<'m>(map: &'m BTreeMap<String, String>, key: &str) -> Option<&'m str> {
    map.get(key).map(String::as_str)
}

fn load_manifest(path: &Path) -> Result<Manifest, ConcordanceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConcordanceError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConcordanceError::io(path, e)
        }
    })?;
    toml::from_str(&contents).map_err(|e| ConcordanceError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ConcordanceError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ConcordanceError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(ConcordanceError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(ConcordanceError::InvalidManifest {
                message: format!("duplicate role: {}", file.role),
            });
        }
        validate_sha(&file.sha256, &file.path)?;
        validate_path(&file.path)?;
    }

    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(ConcordanceError::MissingTable {
                role: role.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), ConcordanceError> {
    if sha.len() != 64 || !sha.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConcordanceError::InvalidManifest {
            message: format!("invalid sha256 for {path}: {sha}"),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ConcordanceError> {
    let candidate = Path::new(path);
    let escapes = candidate
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || escapes {
        return Err(ConcordanceError::InvalidManifest {
            message: format!("path must be relative to the reference directory: {path}"),
        });
    }
    Ok(())
}

fn verify_file(reference_dir: &Path, file: &ManifestFile) -> Result<(), ConcordanceError> {
    let full_path = reference_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConcordanceError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            ConcordanceError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(ConcordanceError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn resolve_role_path(
    reference_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, ConcordanceError> {
    let file = files
        .iter()
        .find(|f| f.role == role)
        .ok_or_else(|| ConcordanceError::MissingTable {
            role: role.to_string(),
        })?;
    Ok(reference_dir.join(&file.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concordance() -> CodeConcordance {
        CodeConcordance::builder()
            .country("842", "USA", "United States")
            .country("0", "WLD", "World")
            .country("280", "DEU", "Fm German FR")
            .country("278", "DDR", "Fm German DR")
            .official_sitc("001")
            .official_sitc("0011")
            .recode("USA", "USA")
            .recode("DDR", "DEU")
            .recode("ANT", ".")
            .build()
    }

    #[test]
    fn numeric_to_alpha_pads_keys() {
        let c = concordance();
        assert_eq!(
            c.translate(CodeSpace::Iso3Numeric, CodeSpace::Iso3Alpha, "842"),
            Translation::Code("USA")
        );
        assert_eq!(c.iso3_alpha("000"), Some("WLD"));
        assert_eq!(c.iso3_alpha("0"), Some("WLD"));
        assert_eq!(c.iso3_alpha("999"), None);
    }

    #[test]
    fn names_round_trip_through_alpha() {
        let c = concordance();
        assert_eq!(c.country_name("280"), Some("Fm German FR"));
        assert_eq!(
            c.translate(CodeSpace::CountryName, CodeSpace::Iso3Alpha, "Fm German DR"),
            Translation::Code("DDR")
        );
        assert_eq!(
            c.translate(CodeSpace::Iso3Alpha, CodeSpace::CountryName, "USA"),
            Translation::Code("United States")
        );
    }

    #[test]
    fn unsupported_pairs_are_missing() {
        let c = concordance();
        assert!(
            c.translate(CodeSpace::Iso3Alpha, CodeSpace::Iso3Numeric, "USA")
                .is_missing()
        );
        assert!(
            c.translate(CodeSpace::SitcR2, CodeSpace::CountryName, "0011")
                .is_missing()
        );
    }

    #[test]
    fn official_flags() {
        let c = concordance();
        assert_eq!(
            c.translate(CodeSpace::SitcR2, CodeSpace::SitcOfficial, "0011"),
            Translation::Flag(true)
        );
        assert!(c.is_official_sitc("001"));
        assert!(!c.is_official_sitc("001A"));
    }

    #[test]
    fn recode_drop_marker_is_none() {
        let c = concordance();
        assert_eq!(c.recode("DDR"), Some("DEU"));
        assert_eq!(c.recode("ANT"), None);
        assert_eq!(c.recode("FRA"), None);
        assert_eq!(
            c.translate(CodeSpace::Iso3Alpha, CodeSpace::IntertemporalRecode, "ANT"),
            Translation::Code(".")
        );
    }

    #[test]
    fn rejects_escaping_paths() {
        assert!(validate_path("countries.csv").is_ok());
        assert!(validate_path("../countries.csv").is_err());
        assert!(validate_path("/etc/countries.csv").is_err());
        assert!(validate_path("").is_err());
    }
}
