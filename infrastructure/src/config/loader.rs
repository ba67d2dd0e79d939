//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level configuration file names, checked in order.
const PROJECT_CONFIG_FILES: &[&str] = &["langbridge.toml", ".langbridge.toml"];

/// Prefix of environment variables overriding file settings.
const ENV_PREFIX: &str = "LANGBRIDGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `LANGBRIDGE_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./langbridge.toml` or `./.langbridge.toml`
    /// 4. Global: `<config dir>/langbridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path(),
            Path::new("."),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File sources layered over the defaults.
    fn figment(global: Option<PathBuf>, project_dir: &Path, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("langbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {ENV_PREFIX}* variables");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./langbridge.toml or ./.langbridge.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.tools.modules.is_empty());
        assert!(config.tools.hydrate_from_env);
        assert_eq!(config.resolver.config_file, "dagger.json");
    }

    #[test]
    fn test_global_config_path() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("langbridge/config.toml"));
        }
    }

    #[test]
    fn test_layering() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[engine]\nport = 1111\n\n[tools]\nmodules = [\"github\"]\n",
        )
        .unwrap();
        fs::write(dir.path().join(".langbridge.toml"), "[engine]\nport = 2222\n").unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[resolver]\nfind_up = false\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(global), dir.path(), Some(&explicit))
            .extract()
            .unwrap();

        assert_eq!(config.engine.port, Some(2222));
        assert_eq!(config.tools.modules, vec!["github"]);
        assert!(!config.resolver.find_up);
        assert!(config.resolver.resolve_from_caller);
    }

    #[test]
    fn test_project_file_precedence() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("langbridge.toml"), "[engine]\nport = 1\n").unwrap();
        fs::write(dir.path().join(".langbridge.toml"), "[engine]\nport = 2\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, dir.path(), None)
            .extract()
            .unwrap();
        assert_eq!(config.engine.port, Some(1));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("broken.toml");
        fs::write(&explicit, "[engine]\nport = \"not a port\"\n").unwrap();

        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, dir.path(), Some(&explicit)).extract();
        assert!(result.is_err());
    }
}
