use crate::domain::{config::SerialComConfig, error::{SerialComError, SerialComResult}};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".serialcom";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> SerialComResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Manager rooted at explicit paths
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration: the nearest project file wins over the global one
    pub fn load_config(&self) -> SerialComResult<SerialComConfig> {
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                return self.load_config_from_path(project_path);
            }
        }

        if self.global_config_path.exists() {
            return self.load_config_from_path(&self.global_config_path);
        }

        Ok(SerialComConfig::default())
    }

    /// Get global configuration path
    fn get_global_config_path() -> SerialComResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SerialComError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("serialcom").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_project_config_from(&current_dir)
    }

    fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        let mut path = start;

        loop {
            let config_path = path.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> SerialComResult<SerialComConfig> {
        let content = fs::read_to_string(path).map_err(|e| SerialComError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| SerialComError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path, creating parent directories
    pub fn save_config_to_path(&self, path: &Path, config: &SerialComConfig) -> SerialComResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SerialComError::Config {
                message: format!("Failed to create config directory {}: {}", parent.display(), e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| SerialComError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SerialComError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration under `dir/.serialcom`
    pub fn init_project_config(&self, dir: &Path) -> SerialComResult<PathBuf> {
        let config_file = dir.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_file.exists() {
            return Err(SerialComError::Config {
                message: format!("Project configuration already exists: {}", config_file.display()),
            });
        }

        self.save_config_to_path(&config_file, &SerialComConfig::default())?;
        Ok(config_file)
    }

    /// Write the default global configuration
    pub fn init_global_config(&self) -> SerialComResult<&Path> {
        if self.global_config_path.exists() {
            return Err(SerialComError::Config {
                message: format!(
                    "Global configuration already exists: {}",
                    self.global_config_path.display()
                ),
            });
        }
        self.save_config_to_path(&self.global_config_path, &SerialComConfig::default())?;
        Ok(&self.global_config_path)
    }

    /// The file `load_config` reads, if any
    pub fn active_config_path(&self) -> Option<&Path> {
        self.project_config_path
            .as_deref()
            .filter(|path| path.exists())
            .or_else(|| Some(self.global_config_path.as_path()).filter(|path| path.exists()))
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> ConfigManager {
        ConfigManager::with_paths(dir.path().join("global").join(CONFIG_FILE), None)
    }

    #[test]
    fn test_load_default_config() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let config = manager.load_config().unwrap();

        assert_eq!(config, SerialComConfig::default());
        assert_eq!(config.port.baud_rate, 460_800);
        assert!(manager.active_config_path().is_none());
    }

    #[test]
    fn test_init_project_config() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        let path = manager.init_project_config(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(".serialcom").join("config.toml"));

        let loaded = manager.load_config_from_path(&path).unwrap();
        assert_eq!(loaded, SerialComConfig::default());
        assert!(manager.init_project_config(dir.path()).is_err());
    }

    #[test]
    fn test_project_config_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global_path = dir.path().join("global").join(CONFIG_FILE);
        let project_path = dir.path().join("project").join(CONFIG_FILE);

        let mut global = SerialComConfig::default();
        global.port.baud_rate = 9600;
        let mut project = SerialComConfig::default();
        project.port.baud_rate = 115_200;

        let manager = ConfigManager::with_paths(global_path.clone(), Some(project_path.clone()));
        manager.save_config_to_path(&global_path, &global).unwrap();
        assert_eq!(manager.load_config().unwrap().port.baud_rate, 9600);

        manager.save_config_to_path(&project_path, &project).unwrap();
        assert_eq!(manager.load_config().unwrap().port.baud_rate, 115_200);
        assert_eq!(manager.active_config_path(), Some(project_path.as_path()));
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let expected = manager.init_project_config(dir.path()).unwrap();

        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(ConfigManager::find_project_config_from(&nested), Some(expected));
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[port]\nbaud_rate = \"fast\"\n").unwrap();

        let err = manager_in(&dir).load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, SerialComError::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
