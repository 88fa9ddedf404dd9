//! Configuration management for Trellis.
//!
//! Parses `trellis.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `menu.root`
//! - every value in `[routes]`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output trimming.
    pub trim: Option<bool>,
    /// Override the list element type (`ul` or `ol`).
    pub list_type: Option<String>,
    /// Override the class applied to the current menu item.
    pub current_class: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "trellis.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Menu compiler defaults.
    pub menu: MenuConfig,
    /// List compiler defaults.
    pub list: ListConfig,
    /// Output finishing defaults.
    pub output: OutputConfig,
    /// Select builder defaults.
    pub select: SelectConfig,
    /// Translation table (key to display string).
    pub strings: BTreeMap<String, String>,
    /// Route table (route name to path template with `{param}` placeholders).
    pub routes: BTreeMap<String, String>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Menu compiler defaults.
///
/// Unset values fall back to the compiler's built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Container markup, e.g. `<nav class="menu"/>`.
    pub root: Option<String>,
    /// Wrapper element for each item.
    pub item_el: Option<String>,
    /// Inner label element inside each link.
    pub inner_el: Option<String>,
    /// Icon element name.
    pub icon_el: Option<String>,
    /// Class appended to every icon.
    pub icon_class: Option<String>,
    /// Icon position: 0 before the label, 1 after it.
    pub icon_pos: Option<u8>,
    /// Class for the current item.
    pub current_class: Option<String>,
    /// Class for every item.
    pub item_class: Option<String>,
    /// Element used for builder labels.
    pub label_class: Option<String>,
    /// Class for the inner label element.
    pub inner_class: Option<String>,
}

/// List compiler defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// List element type, `ul` or `ol`.
    #[serde(rename = "type")]
    pub list_type: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            list_type: "ul".to_owned(),
        }
    }
}

/// Output finishing defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Return trees instead of strings (library callers only).
    pub raw: bool,
    /// Trim serialized output.
    pub trim: bool,
}

/// Select builder defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Copy `name` into a missing `id`.
    pub id: bool,
    /// Treat the selected value as a bitmask.
    pub mask: bool,
    /// Label key for complex option entries.
    pub labelkey: String,
    /// Value key for complex option entries.
    pub valuekey: String,
    /// Translation prefix for option labels.
    pub ns: Option<String>,
    /// Translation prefix for option tooltips.
    pub ttns: Option<String>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            id: false,
            mask: false,
            labelkey: "text".to_owned(),
            valuekey: "id".to_owned(),
            ns: None,
            ttns: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`routes.home`").
        field: String,
        /// Error message (e.g., "${`BASE_URL`} environment variable not found").
        message: String,
    },
}

/// Require an optional element name to be non-empty when set.
fn require_element_name(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(|name| name.trim().is_empty()) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `trellis.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(trim) = settings.trim {
            self.output.trim = trim;
        }
        if let Some(list_type) = &settings.list_type {
            self.list.list_type.clone_from(list_type);
        }
        if let Some(current_class) = &settings.current_class {
            self.menu.current_class = Some(current_class.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_menu()?;
        self.validate_list()?;
        Ok(())
    }

    /// Validate menu configuration.
    fn validate_menu(&self) -> Result<(), ConfigError> {
        let menu = &self.menu;
        require_element_name(menu.item_el.as_deref(), "menu.item_el")?;
        require_element_name(menu.inner_el.as_deref(), "menu.inner_el")?;
        require_element_name(menu.icon_el.as_deref(), "menu.icon_el")?;
        require_element_name(menu.label_class.as_deref(), "menu.label_class")?;

        if let Some(pos) = menu.icon_pos
            && pos > 1
        {
            return Err(ConfigError::Validation(format!(
                "menu.icon_pos must be 0 (before) or 1 (after), got {pos}"
            )));
        }

        Ok(())
    }

    /// Validate list configuration.
    fn validate_list(&self) -> Result<(), ConfigError> {
        match self.list.list_type.as_str() {
            "ul" | "ol" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "list.type must be \"ul\" or \"ol\", got \"{other}\""
            ))),
        }
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.menu.root {
            self.menu.root = Some(expand::expand_env(root, "menu.root")?);
        }

        for (name, template) in &mut self.routes {
            *template = expand::expand_env(template, &format!("routes.{name}"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.list.list_type, "ul");
        assert!(!config.output.trim);
        assert!(!config.output.raw);
        assert_eq!(config.select.labelkey, "text");
        assert_eq!(config.select.valuekey, "id");
        assert!(config.menu.item_el.is_none());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.list.list_type, "ul");
        assert!(config.strings.is_empty());
    }

    #[test]
    fn test_parse_menu_config() {
        let toml = r#"
[menu]
root = '<nav class="main"/>'
item_el = "li"
inner_el = "span"
icon_pos = 1
current_class = "active"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.menu.root.as_deref(), Some(r#"<nav class="main"/>"#));
        assert_eq!(config.menu.item_el.as_deref(), Some("li"));
        assert_eq!(config.menu.inner_el.as_deref(), Some("span"));
        assert_eq!(config.menu.icon_pos, Some(1));
        assert_eq!(config.menu.current_class.as_deref(), Some("active"));
    }

    #[test]
    fn test_parse_routes_and_strings_keep_sorted_order() {
        let toml = r#"
[routes]
user = "/users/{id}"
home = "/"

[strings]
"nav.home" = "Home"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let names: Vec<_> = config.routes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["home", "user"]);
        assert_eq!(config.strings["nav.home"], "Home");
    }

    #[test]
    fn test_parse_list_type() {
        let config: Config = toml::from_str("[list]\ntype = \"ol\"\n").unwrap();

        assert_eq!(config.list.list_type, "ol");
    }

    #[test]
    fn test_invalid_list_type_fails_validation() {
        let config: Config = toml::from_str("[list]\ntype = \"dl\"\n").unwrap();

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("list.type"));
    }

    #[test]
    fn test_invalid_icon_pos_fails_validation() {
        let config: Config = toml::from_str("[menu]\nicon_pos = 2\n").unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("menu.icon_pos"));
    }

    #[test]
    fn test_empty_element_name_fails_validation() {
        let config: Config = toml::from_str("[menu]\nitem_el = \" \"\n").unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            trim: Some(true),
            list_type: Some("ol".to_owned()),
            current_class: Some("active".to_owned()),
        };

        config.apply_cli_settings(&overrides);

        assert!(config.output.trim);
        assert!(!config.output.raw); // Unchanged
        assert_eq!(config.list.list_type, "ol");
        assert_eq!(config.menu.current_class.as_deref(), Some("active"));
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/trellis.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_sets_path_and_expands_routes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[routes]\nhome = \"${TRELLIS_TEST_SURELY_UNSET:-/app}/\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.routes["home"], "/app/");
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ntrim = false\n").unwrap();
        let settings = CliSettings {
            trim: Some(true),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert!(config.output.trim);
    }

    #[test]
    fn test_load_rejects_invalid_cli_list_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            list_type: Some("dl".to_owned()),
            ..Default::default()
        };

        assert!(Config::load(Some(&path), Some(&settings)).is_err());
    }

    #[test]
    fn test_discover_walks_up_to_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_from(&nested).unwrap();

        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
