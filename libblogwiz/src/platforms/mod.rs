//! Publishing targets and their credential bundles
//!
//! Each target gets its own payload builder. Builders only *prepare* a
//! payload plus the metadata a transport step would need; nothing here talks
//! to the network.
//!
//! # Examples
//!
//! ```
//! use libblogwiz::platforms::{Platform, PlatformConfig, TistoryConfig};
//!
//! let platform: Platform = "tistory".parse().unwrap();
//! let config = PlatformConfig::Tistory(TistoryConfig {
//!     access_token: "token".to_string(),
//!     blog_name: "myblog".to_string(),
//!     category_id: String::new(),
//! });
//! assert_eq!(config.platform(), platform);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FormatError;

pub mod custom;
pub mod naver;
pub mod tistory;

/// Payload content plus transport metadata, produced by a builder
pub type Payload = (String, Map<String, Value>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tistory,
    Naver,
    Custom,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Tistory, Platform::Naver, Platform::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tistory => "tistory",
            Platform::Naver => "naver",
            Platform::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tistory" => Ok(Platform::Tistory),
            "naver" => Ok(Platform::Naver),
            "custom" => Ok(Platform::Custom),
            _ => Err(FormatError::UnknownPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TistoryConfig {
    pub access_token: String,
    pub blog_name: String,
    /// Empty means "no category"
    pub category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NaverConfig {
    pub client_id: String,
    pub client_secret: String,
    pub blog_id: String,
}

/// Credential bundle for exactly one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PlatformConfig {
    Tistory(TistoryConfig),
    Naver(NaverConfig),
    Custom,
}

impl PlatformConfig {
    pub fn platform(&self) -> Platform {
        match self {
            PlatformConfig::Tistory(_) => Platform::Tistory,
            PlatformConfig::Naver(_) => Platform::Naver,
            PlatformConfig::Custom => Platform::Custom,
        }
    }
}

/// Stored credentials for every target, as kept in `AppSettings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub tistory: TistoryConfig,
    pub naver: NaverConfig,
}

impl PlatformSettings {
    /// Pick the bundle for `platform`
    pub fn config_for(&self, platform: Platform) -> PlatformConfig {
        match platform {
            Platform::Tistory => PlatformConfig::Tistory(self.tistory.clone()),
            Platform::Naver => PlatformConfig::Naver(self.naver.clone()),
            Platform::Custom => PlatformConfig::Custom,
        }
    }
}

/// Serialize a payload struct, mapping encoder failures into `FormatError`
pub(crate) fn encode<T: Serialize>(payload: &T) -> Result<String, FormatError> {
    serde_json::to_string(payload).map_err(|e| FormatError::Encode(e.to_string()))
}
