use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::InitError;

pub const CONFIG_PATH: &str = "config/config.toml";

#[derive(Serialize, Deserialize, Debug)]
pub struct GlobalConfig {
    /// 0 trace, 1 debug, 2 info, 3 warn, 4 error
    #[serde(default = "default_log_level")]
    pub log_level: usize,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub admin: Admin,
    #[serde(default)]
    pub ui: Ui,
}

fn default_log_level() -> usize {
    3
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            database: Default::default(),
            admin: Default::default(),
            ui: Default::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Database {
    pub path: String,
    pub salt: String,
    #[serde(default = "default_migrate")]
    pub migrate: bool,
}

fn default_migrate() -> bool {
    true
}

impl Default for Database {
    fn default() -> Self {
        Self {
            path: "database/coursedesk.sqlite".to_owned(),
            salt: "be sure to change it".to_owned(),
            migrate: default_migrate(),
        }
    }
}

/// account created when the users table is empty
#[derive(Serialize, Deserialize, Debug)]
pub struct Admin {
    pub email: String,
    pub password: String,
}

impl Default for Admin {
    fn default() -> Self {
        Self {
            email: "admin@coursedesk.local".to_owned(),
            password: "admin".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Ui {
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

fn default_max_column_width() -> usize {
    30
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            max_column_width: default_max_column_width(),
        }
    }
}

/// Load config from `path`
///
/// Write the default config to `path` if it doesn't exist yet.
pub async fn load(path: impl AsRef<Path>) -> super::Result<GlobalConfig> {
    let path = path.as_ref();
    if fs::metadata(path).await.is_ok() {
        let raw = fs::read_to_string(path)
            .await
            .map_err(InitError::ConfigRead)?;
        return toml::from_str(&raw).map_err(InitError::ConfigParse);
    }

    eprintln!("Unable to find {}, generating default config", path.display());
    let config = GlobalConfig::default();

    if let Some(parent) = path.parent().filter(|x| !x.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(InitError::ConfigDir)?;
    }
    let config_txt = toml::to_string(&config).map_err(InitError::ConfigSerialize)?;
    fs::write(path, config_txt)
        .await
        .map_err(InitError::ConfigWrite)?;

    eprintln!(
        "Config generated, please change the salt in {} before adding users",
        path.display()
    );
    Ok(config)
}
