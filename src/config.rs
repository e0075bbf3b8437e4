//! YAML configuration with shell-style `$VAR` / `${VAR}` interpolation

use directories::ProjectDirs;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, SitacError};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yml";

const DEFAULT_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub web: WebConfig,
    pub dcs: DcsConfig,
    pub map: MapConfig,
    pub features: FeaturesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    #[serde(deserialize_with = "from_str_or_value")]
    pub port: u16,
    pub title: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            title: "Foothold Sitac Server".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcsConfig {
    /// Root holding one directory per server
    pub saved_games: PathBuf,
}

impl Default for DcsConfig {
    fn default() -> Self {
        Self {
            saved_games: PathBuf::from("var"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub url_tiles: String,
    #[serde(deserialize_with = "from_str_or_value")]
    pub min_zoom: u8,
    #[serde(deserialize_with = "from_str_or_value")]
    pub max_zoom: u8,
    pub alternative_tiles: Vec<TileLayer>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            url_tiles: DEFAULT_TILES.to_string(),
            min_zoom: 8,
            max_zoom: 11,
            alternative_tiles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Expose per-group unit counts on the map
    #[serde(deserialize_with = "from_str_or_value")]
    pub show_zone_forces: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            show_zone_forces: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueOrString<T> {
    Value(T),
    Text(String),
}

/// Accept a scalar either natively or as a string, since interpolated
/// values always arrive as strings
fn from_str_or_value<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match ValueOrString::<T>::deserialize(deserializer)? {
        ValueOrString::Value(value) => Ok(value),
        ValueOrString::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `config/config.yml` and then
    /// the user config directory are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(SitacError::Config(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.is_file()),
        };

        let Some(path) = path else {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| SitacError::Config(format!("cannot read {:?}: {}", path, e)))?;
        let config = Self::from_yaml_with(&text, |name| std::env::var(name).ok())
            .map_err(|e| match e {
                SitacError::Config(msg) => SitacError::Config(format!("{:?}: {}", path, msg)),
                other => other,
            })?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a YAML document, expanding variables through `lookup`
    pub fn from_yaml_with<F>(text: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut document: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| SitacError::Config(e.to_string()))?;
        if document.is_null() {
            return Ok(Self::default());
        }

        expand_value(&mut document, &lookup);
        let config: Self =
            serde_yaml::from_value(document).map_err(|e| SitacError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.map.min_zoom > self.map.max_zoom {
            return Err(SitacError::Config(format!(
                "map.min_zoom ({}) is greater than map.max_zoom ({})",
                self.map.min_zoom, self.map.max_zoom
            )));
        }
        Ok(())
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Some(dirs) = ProjectDirs::from("", "", "foothold-sitac") {
        paths.push(dirs.config_dir().join("config.yml"));
    }
    paths
}

fn expand_value<F>(value: &mut serde_yaml::Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        serde_yaml::Value::String(s) => *s = expand_env(s.as_str(), lookup),
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                expand_value(item, lookup);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for item in map.values_mut() {
                expand_value(item, lookup);
            }
        }
        serde_yaml::Value::Tagged(tagged) => expand_value(&mut tagged.value, lookup),
        _ => {}
    }
}

/// Expand `$NAME` and `${NAME}`; unknown variables stay as written
pub fn expand_env<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .char_indices()
                .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
                .map_or(after.len(), |(i, _)| i);
            (&after[..end], end)
        };

        let expanded = if name.is_empty() { None } else { lookup(name) };
        match expanded {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[idx..idx + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_expand_env() {
        let lookup = env(&[("HOME", "/home/dcs"), ("PORT", "9000")]);
        assert_eq!(expand_env("$HOME/saves", &lookup), "/home/dcs/saves");
        assert_eq!(expand_env("${HOME}_x", &lookup), "/home/dcs_x");
        assert_eq!(expand_env("port=$PORT.", &lookup), "port=9000.");
        assert_eq!(expand_env("$UNSET and ${UNSET}", &lookup), "$UNSET and ${UNSET}");
        assert_eq!(expand_env("cost $5 or $", &lookup), "cost $5 or $");
        assert_eq!(expand_env("${broken", &lookup), "${broken");
        assert_eq!(expand_env("no vars", &lookup), "no vars");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml_with("", env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.dcs.saved_games, PathBuf::from("var"));
        assert_eq!((config.map.min_zoom, config.map.max_zoom), (8, 11));
        assert!(config.features.show_zone_forces);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let yaml = "web:\n  title: My Server\nmap:\n  max_zoom: 14\n";
        let config = AppConfig::from_yaml_with(yaml, env(&[])).unwrap();
        assert_eq!(config.web.title, "My Server");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.map.max_zoom, 14);
        assert_eq!(config.map.min_zoom, 8);
    }

    #[test]
    fn test_interpolated_scalars() {
        let yaml = r#"
web:
  port: "$WEB_PORT"
dcs:
  saved_games: "${SAVED_GAMES}/DCS"
features:
  show_zone_forces: "$SHOW_FORCES"
map:
  alternative_tiles:
    - name: Topo
      url: "https://tiles.example/$STYLE/{z}/{x}/{y}"
"#;
        let lookup = env(&[
            ("WEB_PORT", "9090"),
            ("SAVED_GAMES", "/srv/saved"),
            ("SHOW_FORCES", "false"),
            ("STYLE", "topo"),
        ]);
        let config = AppConfig::from_yaml_with(yaml, lookup).unwrap();
        assert_eq!(config.web.port, 9090);
        assert_eq!(config.dcs.saved_games, PathBuf::from("/srv/saved/DCS"));
        assert!(!config.features.show_zone_forces);
        assert_eq!(
            config.map.alternative_tiles[0].url,
            "https://tiles.example/topo/{z}/{x}/{y}"
        );
    }

    #[test]
    fn test_unset_port_variable_is_an_error() {
        let err = AppConfig::from_yaml_with("web:\n  port: $WEB_PORT\n", env(&[])).unwrap_err();
        assert!(matches!(err, SitacError::Config(_)));
    }

    #[test]
    fn test_zoom_bounds_validated() {
        let yaml = "map:\n  min_zoom: 12\n  max_zoom: 10\n";
        assert!(AppConfig::from_yaml_with(yaml, env(&[])).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = AppConfig::load(Some(Path::new("/nope/config.yml"))).unwrap_err();
        assert!(matches!(err, SitacError::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "logging:\n  log_level: debug\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.logging.log_level, "debug");
    }
}
