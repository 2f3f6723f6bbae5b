//! Configuration module for the binding generator.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SB_` and use double underscores
//! to separate nested levels:
//! - `SB_RENDER__NAMESPACE=mylib` sets `render.namespace`
//! - `SB_FILTER__REQUIRE_METHOD=process` sets `filter.require_method`
//! - `SB_INPUT__RECURSIVE=true` sets `input.recursive`

use crate::error::{BindError, BindResult};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".stkbind";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "SB_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .stkbind is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Header discovery
    #[serde(default)]
    pub input: InputConfig,

    /// Class name filtering
    #[serde(default)]
    pub filter: FilterConfig,

    /// Registration script rendering
    #[serde(default)]
    pub render: RenderConfig,

    /// Output destination
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InputConfig {
    /// Directory holding the headers (or tree dumps) to process
    #[serde(default = "default_include_dir")]
    pub include_dir: PathBuf,

    /// File extensions picked up by discovery
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into subdirectories of `include_dir`
    #[serde(default = "default_false")]
    pub recursive: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilterConfig {
    /// Header stems that are never processed
    #[serde(default = "default_skip")]
    pub skip: Vec<String>,

    /// When non-empty, only these header stems are processed
    #[serde(default)]
    pub only: Vec<String>,

    /// Classes without a public method of this name are left out.
    /// An empty string disables the check.
    #[serde(default = "default_require_method")]
    pub require_method: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenderConfig {
    /// C++ namespace the classes live in
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Type names starting with this token get the namespace prepended
    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,

    /// Namespace of the bridge's `overload` helper
    #[serde(default = "default_bridge_namespace")]
    pub bridge_namespace: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputConfig {
    /// Script destination; stdout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_include_dir() -> PathBuf {
    PathBuf::from("build/deps/stk-install/include/stk")
}
fn default_extensions() -> Vec<String> {
    vec!["h".to_string(), "hpp".to_string(), "json".to_string()]
}
fn default_require_method() -> String {
    "tick".to_string()
}
fn default_namespace() -> String {
    "stk".to_string()
}
fn default_type_prefix() -> String {
    "Stk".to_string()
}
fn default_bridge_namespace() -> String {
    "luabridge".to_string()
}

/// Headers of the STK distribution that are abstract bases, I/O plumbing
/// or otherwise unsuitable for direct registration.
fn default_skip() -> Vec<String> {
    [
        "Effect",
        "FileLoop",
        "FileRead",
        "FileWrite",
        "FileWvIn",
        "FileWvOut",
        "Filter",
        "Fir",
        "FM",
        "Function",
        "Generator",
        "Iir",
        "InetWvIn",
        "InetWvOut",
        "Instrmnt",
        "Messager",
        "MidiFileIn",
        "Modal",
        "ModalBar",
        "Mutex",
        "Phonemes",
        "RtAudio",
        "RtMidi",
        "RtWvIn",
        "RtWvOut",
        "Sampler",
        "Skini",
        "SKINImsg",
        "SkiniSpec",
        "SKINItbl",
        "Socket",
        "Stk",
        "TcpClient",
        "TcpServer",
        "Thread",
        "UdpSocket",
        "Vector3D",
        "WvIn",
        "WvOut",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            input: InputConfig::default(),
            filter: FilterConfig::default(),
            render: RenderConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            include_dir: default_include_dir(),
            extensions: default_extensions(),
            recursive: false,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip: default_skip(),
            only: Vec::new(),
            require_method: default_require_method(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            type_prefix: default_type_prefix(),
            bridge_namespace: default_bridge_namespace(),
        }
    }
}

impl FilterConfig {
    /// The required method name, if the check is enabled.
    pub fn required_method(&self) -> Option<&str> {
        let name = self.require_method.trim();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Whether a header with this stem passes the allow/deny lists.
    pub fn accepts(&self, stem: &str) -> bool {
        if self.skip.iter().any(|s| s == stem) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|s| s == stem)
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load from an explicit file, or from the workspace when none is given.
    /// Failures are reported as [`BindError::ConfigError`].
    pub fn resolve(explicit: Option<&Path>) -> BindResult<Self> {
        let loaded = match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        loaded.map_err(|e| BindError::ConfigError {
            reason: match explicit {
                Some(path) => format!("cannot load '{}': {e}", path.display()),
                None => e.to_string(),
            },
        })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscore stays
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the workspace config by looking for a .stkbind directory
    /// from the current directory up to the root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .stkbind is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'stkbind init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let skip = default_skip()
            .iter()
            .map(|s| format!("    \"{s}\","))
            .collect::<Vec<_>>()
            .join("\n");

        let template = format!(
            r#"# stkbind configuration file

# Version of the configuration schema
version = 1

# Global debug mode (same as --verbose)
debug = false

[input]
# Directory holding the headers to process
include_dir = "{}"

# Extensions picked up during discovery. ".json" files are read as
# declaration tree dumps, everything else is parsed as a C++ header.
extensions = ["h", "hpp", "json"]

# Descend into subdirectories
recursive = false

[filter]
# Only process these header stems (empty = all)
only = []

# Classes without a public method of this name are left out.
# Set to "" to keep every class.
require_method = "tick"

# Header stems that are never processed
skip = [
{}
]

[render]
# Namespace the classes live in
namespace = "stk"

# Parameter types starting with this token are qualified with the namespace
type_prefix = "Stk"

# Namespace of the bridge's overload helper
bridge_namespace = "luabridge"

[output]
# Script destination (stdout when unset)
# path = "mappings.cpp"
"#,
            default_include_dir().display(),
            skip
        );

        std::fs::write(&config_path, template)?;

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.render.namespace, "stk");
        assert_eq!(settings.render.type_prefix, "Stk");
        assert_eq!(settings.filter.required_method(), Some("tick"));
        assert!(settings.filter.skip.contains(&"WvOut".to_string()));
        assert!(settings.output.path.is_none());
    }

    #[test]
    fn test_filter_accepts() {
        let mut filter = FilterConfig::default();
        assert!(filter.accepts("ADSR"));
        assert!(!filter.accepts("Generator"));

        filter.only = vec!["BiQuad".to_string()];
        assert!(filter.accepts("BiQuad"));
        assert!(!filter.accepts("ADSR"));

        // Skip wins over only
        filter.only.push("Generator".to_string());
        assert!(!filter.accepts("Generator"));
    }

    #[test]
    fn test_empty_require_method_disables_check() {
        let filter = FilterConfig {
            require_method: "  ".to_string(),
            ..FilterConfig::default()
        };
        assert_eq!(filter.required_method(), None);
    }

    #[test]
    #[serial_test::serial]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2

[input]
include_dir = "vendor/include"
recursive = true

[filter]
skip = ["Foo"]
require_method = ""

[render]
namespace = "dsp"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.input.include_dir, PathBuf::from("vendor/include"));
        assert!(settings.input.recursive);
        assert_eq!(settings.filter.skip, vec!["Foo"]);
        assert_eq!(settings.filter.required_method(), None);
        assert_eq!(settings.render.namespace, "dsp");
        // Untouched values keep their defaults
        assert_eq!(settings.render.type_prefix, "Stk");
        assert_eq!(settings.render.bridge_namespace, "luabridge");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            "[render]\nnamespace = \"file\"\ntype_prefix = \"File\"\n",
        )
        .unwrap();

        unsafe {
            std::env::set_var("SB_RENDER__BRIDGE_NAMESPACE", "bridge");
        }

        let settings = Settings::load_from(&config_path).unwrap();

        unsafe {
            std::env::remove_var("SB_RENDER__BRIDGE_NAMESPACE");
        }

        assert_eq!(settings.render.namespace, "file");
        assert_eq!(settings.render.bridge_namespace, "bridge");
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_explicit_file_errors_are_config_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[render]\nnamespace = [1, 2]\n").unwrap();

        let err = Settings::resolve(Some(&config_path)).unwrap_err();
        assert_eq!(err.status_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("settings.toml"));
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[filter]\nonly = [\"Echo\"]\n").unwrap();

        let settings = Settings::resolve(Some(&config_path)).unwrap();
        assert_eq!(settings.filter.only, vec!["Echo"]);
    }
}
