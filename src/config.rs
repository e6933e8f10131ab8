use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::filtering::{FieldMap, FilterError, FilterProfile};
use crate::formatting::LabelMap;
use crate::notifications::NotificationConfig;
use crate::notifications::models::DEFAULT_TELEGRAM_API_BASE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(String),
    #[error("Invalid filter {name}: {source}")]
    Filter {
        name: String,
        #[source]
        source: FilterError,
    },
    #[error("Unsupported value for filter {0}: expected a string or a number")]
    UnsupportedFilterValue(String),
    #[error("field_map must contain at least one entry")]
    EmptyFieldMap,
    #[error("Unknown preset {0:?}: expected \"auction\" or \"dedicated\"")]
    UnknownPreset(String),
}

/// Built-in profile for one of the two snapshot feeds. A preset supplies the
/// environment prefix, field map, labels and default title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Server auction feed: `cpu`, `ram` and `traffic` fields, prefix `SB`.
    #[default]
    Auction,
    /// Dedicated server feed: `cpu_fullname`, `ram_hr` and `name`, prefix `EN`.
    Dedicated,
}

impl Preset {
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Preset::Auction => "SB",
            Preset::Dedicated => "EN",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Preset::Auction => "Server auction match",
            Preset::Dedicated => "Dedicated server match",
        }
    }

    pub fn field_map(&self) -> FieldMap {
        match self {
            Preset::Auction => FieldMap::from_iter([
                ("PRICE", "price"),
                ("AuctionID", "id"),
                ("CPU", "cpu"),
                ("RAM", "ram"),
                ("Drives", "hdd_arr"),
                ("LOCATION", "datacenter"),
                ("TRAFFIC", "traffic"),
            ]),
            Preset::Dedicated => FieldMap::from_iter([
                ("Price", "price"),
                ("Name", "name"),
                ("AuctionID", "id"),
                ("CPU", "cpu_fullname"),
                ("RAM", "ram_hr"),
                ("Drives", "hdd_arr"),
                ("Location", "datacenter"),
            ]),
        }
    }

    pub fn labels(&self) -> LabelMap {
        match self {
            Preset::Auction => LabelMap::from_iter([
                ("PRICE", "Price (€)"),
                ("AuctionID", "Server AuctionID"),
                ("RAM", "RAM (GB)"),
            ]),
            Preset::Dedicated => LabelMap::from_iter([
                ("Price", "Price (€)"),
                ("Name", "Server Name"),
                ("AuctionID", "AuctionID"),
                ("RAM", "RAM (Detailed)"),
            ]),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auction" | "sb" => Ok(Preset::Auction),
            "dedicated" | "en" => Ok(Preset::Dedicated),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Auction => f.write_str("auction"),
            Preset::Dedicated => f.write_str("dedicated"),
        }
    }
}

/// Everything one run needs, validated once at startup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub preset: Preset,
    pub snapshot_path: PathBuf,
    pub filters: FilterProfile,
    pub field_map: FieldMap,
    pub labels: LabelMap,
    pub notification: NotificationConfig,
}

// Partial configs for layering
#[derive(Deserialize, Default, Debug)]
struct FileConfig {
    snapshot_path: Option<PathBuf>,
    filters: Option<toml::Table>,
    field_map: Option<FieldMap>,
    labels: Option<LabelMap>,
    #[serde(default)]
    notification: FileNotification,
}

#[derive(Deserialize, Default, Debug)]
struct FileNotification {
    title: Option<String>,
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
    telegram_api_base: Option<String>,
    bark_url: Option<String>,
    bark_device_key: Option<String>,
}

/// Variables shared by every profile.
#[derive(Deserialize, Default, Debug)]
struct SharedEnv {
    tg_token: Option<String>,
    tg_chat_id: Option<String>,
    tg_api_base: Option<String>,
    bark_push_url: Option<String>,
    bark_push_key: Option<String>,
}

/// Variables read under the profile prefix, e.g. `SB_CPU`.
#[derive(Deserialize, Default, Debug)]
struct ProfileEnv {
    notify_title: Option<String>,
    cpu: Option<String>,
    ram: Option<String>,
    location: Option<String>,
    traffic: Option<String>,
    price: Option<String>,
    live_data_json: Option<PathBuf>,
}

impl ProfileEnv {
    fn filters(&self) -> [(&'static str, Option<&String>); 5] {
        [
            ("CPU", self.cpu.as_ref()),
            ("RAM", self.ram.as_ref()),
            ("LOCATION", self.location.as_ref()),
            ("TRAFFIC", self.traffic.as_ref()),
            ("PRICE", self.price.as_ref()),
        ]
    }
}

impl MonitorConfig {
    /// Loads `.env`, then layers: preset defaults < config file < environment.
    pub fn load(file: Option<&Path>, preset: Preset, env_prefix: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let vars = std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::load_from_vars(file, preset, env_prefix, vars)
    }

    /// Same as [`MonitorConfig::load`] with an explicit environment and no `.env` handling.
    pub fn load_from_vars<I>(
        file: Option<&Path>,
        preset: Preset,
        env_prefix: Option<&str>,
        vars: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // 1. Load from file (optional)
        let file_config = match file {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        // 2. Load from environment variables
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let prefix = format!("{}_", env_prefix.unwrap_or(preset.env_prefix()));
        let shared: SharedEnv = envy::from_iter(vars.iter().cloned())?;
        let profile: ProfileEnv = envy::prefixed(prefix.as_str()).from_iter(vars)?;

        // 3. Merge: environment overrides file, file overrides preset
        let snapshot_path = profile
            .live_data_json
            .clone()
            .or(file_config.snapshot_path)
            .ok_or_else(|| ConfigError::Missing(format!("{prefix}LIVE_DATA_JSON (or snapshot_path)")))?;

        let mut filters = FilterProfile::new();
        if let Some(table) = &file_config.filters {
            for (name, value) in table {
                let raw = filter_text(name, value)?;
                set_filter(&mut filters, name, &raw)?;
            }
        }
        for (name, value) in profile.filters() {
            if let Some(raw) = value {
                set_filter(&mut filters, name, raw)?;
            }
        }

        let field_map = file_config.field_map.unwrap_or_else(|| preset.field_map());
        if field_map.is_empty() {
            return Err(ConfigError::EmptyFieldMap);
        }
        let labels = file_config.labels.unwrap_or_else(|| preset.labels());

        let file_notification = file_config.notification;
        let notification = NotificationConfig {
            title: profile
                .notify_title
                .or(file_notification.title)
                .unwrap_or_else(|| preset.default_title().to_string()),
            telegram_bot_token: shared.tg_token.or(file_notification.telegram_bot_token),
            telegram_chat_id: shared.tg_chat_id.or(file_notification.telegram_chat_id),
            telegram_api_base: shared
                .tg_api_base
                .or(file_notification.telegram_api_base)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            bark_url: shared.bark_push_url.or(file_notification.bark_url),
            bark_device_key: shared.bark_push_key.or(file_notification.bark_device_key),
        };

        for missing in notification.partially_configured() {
            warn!(missing, "Notification channel is missing a credential and will be skipped, not attempted.");
        }

        let config = MonitorConfig {
            preset,
            snapshot_path,
            filters,
            field_map,
            labels,
            notification,
        };
        info!(
            preset = %config.preset,
            snapshot = ?config.snapshot_path,
            criteria = config.filters.active_criteria().count(),
            "Loaded monitor configuration."
        );
        Ok(config)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn filter_text(name: &str, value: &toml::Value) -> Result<String, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        _ => Err(ConfigError::UnsupportedFilterValue(name.to_string())),
    }
}

fn set_filter(filters: &mut FilterProfile, name: &str, raw: &str) -> Result<(), ConfigError> {
    filters.set(name, raw).map_err(|source| ConfigError::Filter {
        name: name.to_string(),
        source,
    })
}
