use crate::{
    brands::{BrandDictionary, BrandEntry},
    error::AppError,
    normalize::MultiLevelTldTable,
};
use serde::Deserialize;
use std::{env, path::Path, time::Duration};

pub const DEFAULT_TYPOSQUAT_THRESHOLD: usize = 2;
pub const DEFAULT_REDIRECT_TIMEOUT_MS: u64 = 5000;

/// File types whose direct download is treated as a red flag.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &[
    // executables and scripts
    "exe", "msi", "bat", "cmd", "scr", "ps1", "vbs", "jar", "apk", "sh", "bin",
    // archives
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz",
    // documents
    "pdf", "doc", "docx", "docm", "xls", "xlsx", "xlsm", "ppt", "pptx", "rtf",
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "tiff",
    // audio and video
    "mp3", "wav", "mp4", "avi", "mov", "mkv",
    // disk images and app bundles
    "iso", "img", "dmg", "vhd", "pkg", "app", "ipa", "deb", "rpm",
];

/// Immutable engine configuration, handed to the analyzer at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub brands: BrandDictionary,
    pub multi_level_tlds: MultiLevelTldTable,
    pub typosquat_threshold: usize,
    pub redirect_timeout: Duration,
    pub file_extensions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brands: BrandDictionary::default(),
            multi_level_tlds: MultiLevelTldTable::default(),
            typosquat_threshold: DEFAULT_TYPOSQUAT_THRESHOLD,
            redirect_timeout: Duration::from_millis(DEFAULT_REDIRECT_TIMEOUT_MS),
            file_extensions: DEFAULT_FILE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineConfigFile {
    typosquat_threshold: Option<usize>,
    redirect_timeout_ms: Option<u64>,
    multi_level_tlds: Option<Vec<String>>,
    file_extensions: Option<Vec<String>>,
    brands: Option<Vec<BrandEntry>>,
}

impl EngineConfig {
    /// Reads a TOML brand file. Keys it omits keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let file: EngineConfigFile = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(threshold) = file.typosquat_threshold {
            config.typosquat_threshold = threshold;
        }
        if let Some(timeout_ms) = file.redirect_timeout_ms {
            if timeout_ms == 0 {
                return Err(AppError::Config("redirect_timeout_ms must be positive".to_string()));
            }
            config.redirect_timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(tlds) = file.multi_level_tlds {
            config.multi_level_tlds = MultiLevelTldTable::new(tlds);
        }
        if let Some(extensions) = file.file_extensions {
            config.file_extensions = extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(brands) = file.brands {
            config.brands = BrandDictionary::new(
                brands
                    .into_iter()
                    .map(|b| BrandEntry::new(&b.name, b.domains))
                    .collect(),
            );
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Settings of the HTTP service wrapping the engine.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub brands_file: Option<String>,
    pub user_agent: String,
    pub max_batch_size: usize,
    pub engine: EngineConfig,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        let bind_addr = env::var("LINKGUARD_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let brands_file = env::var("LINKGUARD_BRANDS_FILE").ok();
        let user_agent = env::var("LINKGUARD_USER_AGENT")
            .unwrap_or_else(|_| format!("linkguard-engine/{}", env!("CARGO_PKG_VERSION")));

        let max_batch_size = env::var("LINKGUARD_MAX_BATCH")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .unwrap_or(500);

        let mut engine = match &brands_file {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(threshold) = env::var("LINKGUARD_TYPOSQUAT_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            engine.typosquat_threshold = threshold;
        }
        if let Some(timeout_ms) = env::var("LINKGUARD_REDIRECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            engine.redirect_timeout = Duration::from_millis(timeout_ms);
        }

        Ok(ServiceConfig {
            bind_addr,
            brands_file,
            user_agent,
            max_batch_size,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.typosquat_threshold, 2);
        assert_eq!(config.redirect_timeout, Duration::from_millis(5000));
        assert!(config.multi_level_tlds.contains("co.uk"));
        assert!(config.file_extensions.iter().any(|e| e == "exe"));
        assert!(!config.brands.is_empty());
    }

    #[test]
    fn test_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            typosquat_threshold = 1
            redirect_timeout_ms = 1500
            multi_level_tlds = ["co.uk", "Com.AU"]
            file_extensions = [".EXE", "zip"]

            [[brands]]
            name = "Acme"
            domains = ["acme.com", "https://www.acme.co.uk/"]
            "#,
        )
        .unwrap();

        assert_eq!(config.typosquat_threshold, 1);
        assert_eq!(config.redirect_timeout, Duration::from_millis(1500));
        assert!(config.multi_level_tlds.contains("com.au"));
        assert_eq!(config.file_extensions, vec!["exe", "zip"]);
        let acme = config.brands.get("acme").unwrap();
        assert_eq!(acme.domains, vec!["acme.com", "acme.co.uk"]);
        assert_eq!(config.brands.len(), 1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EngineConfig::from_toml_str("typosquat_threshold = 3").unwrap();
        assert_eq!(config.typosquat_threshold, 3);
        assert!(config.brands.get("paypal").is_some());
    }

    #[test]
    fn test_example_brand_file_parses() {
        let config = EngineConfig::from_toml_str(include_str!("../brands.example.toml")).unwrap();
        assert_eq!(config.brands.len(), 3);
        assert!(config.brands.get("npm").unwrap().is_canonical("registry.npmjs.org"));
        assert!(!config.multi_level_tlds.contains("co.za"));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("typosquat_threshold = \"two\""),
            Err(AppError::BrandFile(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("redirect_timeout_ms = 0"),
            Err(AppError::Config(_))
        ));
    }
}
