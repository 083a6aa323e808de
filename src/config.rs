//! Configuration management for the GNSS toolkit
//!
//! The toolkit consumes small YAML maps keyed by lowercase 4-character site
//! codes: reference site information for `metacheck`/`unify`, an old-to-new
//! site map for `rename`, sub-network membership for `subnet` and a flat
//! site list for `sitecheck`.
//!
//! A missing or malformed configuration file is a batch-level fatal error,
//! reported before any file is touched.

use crate::constants::SITESINFO_DEFAULT_KEY;
use crate::{Error, Result};
use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single site attribute value from the YAML configuration.
///
/// Attributes are scalars (`receiver: TRIMBLE NETR9`, `interval: 30`) or
/// lists (`rm_sys: [R, E]`, `obs_type: [C1, P1, L1]`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Free-text value
    Text(String),
    /// Numeric value (intervals, thresholds)
    Number(f64),
    /// List value (observation types, constellations to strip)
    List(Vec<String>),
}

impl AttributeValue {
    /// Scalar string form of the value; lists join with a comma.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => format!("{number}"),
            Self::List(items) => items.join(","),
        }
    }
}

/// Attributes of one site, keyed by attribute name.
pub type SiteAttributes = HashMap<String, AttributeValue>;

/// Reference site information: site code -> attribute map, with the special
/// `all` key supplying defaults applied to every site before site-specific
/// overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SitesInfo {
    sites: HashMap<String, SiteAttributes>,
}

impl SitesInfo {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    /// Whether the configuration names this site explicitly.
    pub fn contains(&self, site: &str) -> bool {
        self.sites.contains_key(&site.to_lowercase())
    }

    /// The attributes configured for this site only (no defaults applied).
    pub fn site(&self, site: &str) -> Option<&SiteAttributes> {
        self.sites.get(&site.to_lowercase())
    }

    /// The effective attributes for a site: defaults from the `all` entry,
    /// overridden by the site's own entry.
    pub fn effective(&self, site: &str) -> SiteAttributes {
        let mut merged = self
            .sites
            .get(SITESINFO_DEFAULT_KEY)
            .cloned()
            .unwrap_or_default();
        if let Some(specific) = self.sites.get(&site.to_lowercase()) {
            merged.extend(specific.clone());
        }
        merged
    }
}

/// Site renaming map: old 4-character code -> new 4-character code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SiteMap {
    map: HashMap<String, String>,
}

impl SiteMap {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    /// The replacement code for a site, if one is configured.
    pub fn replacement(&self, site: &str) -> Option<&str> {
        self.map.get(&site.to_lowercase()).map(String::as_str)
    }
}

/// Sub-network membership: net name -> member sites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Subnets {
    nets: HashMap<String, Vec<String>>,
}

impl Subnets {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    /// Net names, for directory creation.
    pub fn net_names(&self) -> impl Iterator<Item = &str> {
        self.nets.keys().map(String::as_str)
    }

    /// All nets a site belongs to, in sorted order.
    pub fn nets_of(&self, site: &str) -> Vec<&str> {
        let site = site.to_lowercase();
        let mut nets: Vec<&str> = self
            .nets
            .iter()
            .filter(|(_, sites)| sites.iter().any(|s| s.eq_ignore_ascii_case(&site)))
            .map(|(net, _)| net.as_str())
            .collect();
        nets.sort_unstable();
        nets
    }
}

/// Site list for existence checks, under a top-level `sites:` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteList {
    sites: Vec<String>,
}

impl SiteList {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    /// The sites as a lowercase set.
    pub fn as_set(&self) -> HashSet<String> {
        self.sites.iter().map(|s| s.to_lowercase()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Resolve a configuration path: an explicit `--cfg` path must exist; the
/// default file name is looked up in the current directory first, then in
/// the user configuration directory.
pub fn resolve_config_path(explicit: Option<&Path>, default_name: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "configuration file does not exist: {}",
                path.display()
            )));
        }
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(default_name);
    if local.exists() {
        return Ok(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("gnss-toolkit").join(default_name);
        if fallback.exists() {
            return Ok(fallback);
        }
    }

    Err(Error::configuration(format!(
        "configuration file '{default_name}' not found in the current directory \
         or the user configuration directory"
    )))
}

fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::configuration(format!(
            "configuration file does not exist: {}",
            path.display()
        )));
    }
    debug!("Loading configuration from {}", path.display());
    let value = Figment::new().merge(Yaml::file(path)).extract::<T>()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_sites_info_defaults_and_overrides() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            "_sitesinfo.yml",
            "all:\n  interval: 30\n  observer: ops\nbjfs:\n  antenna: 'TRM59900.00     SCIS'\n  interval: 15\n",
        );

        let info = SitesInfo::load(&path).unwrap();
        assert!(info.contains("bjfs"));
        assert!(info.contains("BJFS"));
        assert!(!info.contains("aggo"));

        let effective = info.effective("bjfs");
        assert_eq!(
            effective.get("antenna").unwrap().as_text(),
            "TRM59900.00     SCIS"
        );
        assert_eq!(effective.get("interval").unwrap().as_text(), "15");
        assert_eq!(effective.get("observer").unwrap().as_text(), "ops");

        // unknown sites still receive the defaults
        let defaults = info.effective("aggo");
        assert_eq!(defaults.get("interval").unwrap().as_text(), "30");
    }

    #[test]
    fn test_attribute_value_forms() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            "_sitesinfo.yml",
            "bjfs:\n  obs_type: [C1, P1, L1]\n  rm_sys: [R, E]\n  interval: 30\n",
        );

        let info = SitesInfo::load(&path).unwrap();
        let attrs = info.site("bjfs").unwrap();
        assert_eq!(attrs.get("obs_type").unwrap().as_text(), "C1,P1,L1");
        assert_eq!(
            attrs.get("rm_sys").unwrap(),
            &AttributeValue::List(vec!["R".to_string(), "E".to_string()])
        );
        assert_eq!(attrs.get("interval").unwrap().as_text(), "30");
    }

    #[test]
    fn test_site_map() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "_sitemap.yml", "aggo: lpgs\nwuhn: wuh2\n");

        let map = SiteMap::load(&path).unwrap();
        assert_eq!(map.replacement("aggo"), Some("lpgs"));
        assert_eq!(map.replacement("AGGO"), Some("lpgs"));
        assert_eq!(map.replacement("bjfs"), None);
    }

    #[test]
    fn test_subnets_membership() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            "_subnet.yml",
            "net1:\n  - algo\n  - shao\nnet2:\n  - algo\n  - warn\n",
        );

        let subnets = Subnets::load(&path).unwrap();
        assert_eq!(subnets.nets_of("algo"), vec!["net1", "net2"]);
        assert_eq!(subnets.nets_of("warn"), vec!["net2"]);
        assert!(subnets.nets_of("wuhn").is_empty());

        let mut names: Vec<&str> = subnets.net_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["net1", "net2"]);
    }

    #[test]
    fn test_site_list() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "_sites.yml", "sites:\n  - aggo\n  - BJFS\n  - warn\n");

        let list = SiteList::load(&path).unwrap();
        let set = list.as_set();
        assert_eq!(set.len(), 3);
        assert!(set.contains("bjfs"));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("_nowhere.yml");
        assert!(matches!(
            SiteMap::load(&missing),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "_sitemap.yml", "aggo: [unclosed\n");
        assert!(SiteMap::load(&path).is_err());
    }

    #[test]
    fn test_resolve_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("_sites.yml");
        assert!(resolve_config_path(Some(missing.as_path()), "_sites.yml").is_err());

        let existing = write_config(&temp, "_sites.yml", "- aggo\n");
        let resolved = resolve_config_path(Some(existing.as_path()), "_sites.yml").unwrap();
        assert_eq!(resolved, existing);
    }
}
