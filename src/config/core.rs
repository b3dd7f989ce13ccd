use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::links::LinkKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Timing constants for the guided tour. All values are milliseconds except
/// `countdown`, which is the number of countdown ticks shown per step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourTiming {
    pub activation_delay_ms: u64,
    pub step_period_ms: u64,
    pub tick_interval_ms: u64,
    pub countdown: u8,
}

impl Default for TourTiming {
    fn default() -> Self {
        Self {
            activation_delay_ms: 1000,
            step_period_ms: 4000,
            tick_interval_ms: 1000,
            countdown: 4,
        }
    }
}

impl TourTiming {
    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }

    pub fn step_period(&self) -> Duration {
        Duration::from_millis(self.step_period_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Countdown length, never below one.
    pub fn countdown(&self) -> u8 {
        self.countdown.max(1)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.step_period_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tour.step_period_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tour.tick_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.countdown == 0 {
            return Err(ConfigError::Invalid {
                field: "tour.countdown",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Static copy shown around the links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageCopy {
    pub title: String,
    pub tagline: String,
    pub footer: String,
    pub logo_alt: String,
}

impl Default for PageCopy {
    fn default() -> Self {
        Self {
            title: "Fetuccine Eldorado".to_string(),
            tagline: "Delícias italianas ao seu alcance! Peça agora e saboreie.".to_string(),
            footer: "Copyright 2025 - Fetuccine Eldorado".to_string(),
            logo_alt: "Logo Fetuccine Eldorado - A sua casa de massas".to_string(),
        }
    }
}

/// Replaces the label and/or destination of one of the fixed links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOverride {
    pub kind: LinkKind,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub enabled: bool,
    pub first_delay_ms: u64,
    pub interval_ms: u64,
    pub display_ms: u64,
    pub max_visible: usize,
    pub seed: Option<u64>,
    pub names: Vec<String>,
    pub dishes: Vec<String>,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_delay_ms: 8000,
            interval_ms: 15000,
            display_ms: 4000,
            max_visible: 2,
            seed: None,
            names: ["Ana", "Bruno", "Carla", "Diego", "Fernanda", "Lucas", "Mariana", "Rafael"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            dishes: [
                "Fettuccine Alfredo",
                "Lasanha à Bolonhesa",
                "Nhoque ao Sugo",
                "Espaguete Carbonara",
                "Ravioli de Queijo",
                "Talharim ao Pesto",
            ]
            .iter()
            .map(|dish| dish.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    pub code: String,
    pub label: String,
}

impl Default for CouponConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 3000,
            code: "FETU10".to_string(),
            label: "10% OFF no primeiro pedido".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallPromptConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    pub message: String,
}

impl Default for InstallPromptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 5000,
            message: "Instale nosso app para pedir mais rápido!".to_string(),
        }
    }
}

/// Top-level configuration. Every field has a default so an empty JSON
/// object (or no file at all) yields the stock page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub page: PageCopy,
    pub links: Vec<LinkOverride>,
    pub tour: TourTiming,
    pub toasts: ToastConfig,
    pub coupon: CouponConfig,
    pub install: InstallPromptConfig,
    pub store_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub frame_interval_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            page: PageCopy::default(),
            links: Vec::new(),
            tour: TourTiming::default(),
            toasts: ToastConfig::default(),
            coupon: CouponConfig::default(),
            install: InstallPromptConfig::default(),
            store_path: PathBuf::from(".fetuccine_hub/storage.json"),
            log_path: None,
            log_max_bytes: 1024 * 1024,
            frame_interval_ms: 100,
        }
    }
}

impl HubConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tour.validate()?;
        if self.toasts.enabled {
            if self.toasts.interval_ms == 0 {
                return Err(ConfigError::Invalid {
                    field: "toasts.interval_ms",
                    reason: "must be greater than zero".to_string(),
                });
            }
            if self.toasts.names.is_empty() || self.toasts.dishes.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "toasts",
                    reason: "names and dishes must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
