//! Runtime configuration parsed from environment variables.
//!
//! All keys are optional. `from_lookup` takes the variable source as a
//! closure so parsing can be tested without touching the process
//! environment.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_ARTIFACTS_DIR: &str = "pixel-art";
pub const DEFAULT_DISPLAY_PATH: &str = "config.json";
pub const FALLBACK_CACHE_DIR: &str = ".pixelboard";

/// Where artifacts and the display record live inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// Directory holding one JSON file per artifact.
    pub artifacts_dir: String,
    /// Well-known path of the display indirection record.
    pub display_path: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self { artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_owned(), display_path: DEFAULT_DISPLAY_PATH.to_owned() }
    }
}

/// Remote store settings that don't come from the credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub api_base_url: String,
    /// Branch used when the credential record doesn't name one.
    pub default_branch: String,
    pub layout: StoreLayout,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            default_branch: DEFAULT_BRANCH.to_owned(),
            layout: StoreLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory of the local durable cache.
    pub cache_dir: PathBuf,
    pub store: StoreSettings,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// - `PIXELBOARD_CACHE_DIR`: default `<data dir>/pixelboard`, else `.pixelboard`
    /// - `PIXELBOARD_API_BASE_URL`: default `https://api.github.com`
    /// - `PIXELBOARD_BRANCH`: default `main`
    /// - `PIXELBOARD_ARTIFACTS_DIR`: default `pixel-art`
    /// - `PIXELBOARD_DISPLAY_PATH`: default `config.json`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source. Blank values count as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let cache_dir = get("PIXELBOARD_CACHE_DIR").map_or_else(default_cache_dir, PathBuf::from);
        let api_base_url = get("PIXELBOARD_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let default_branch = get("PIXELBOARD_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_owned());
        let artifacts_dir = get("PIXELBOARD_ARTIFACTS_DIR")
            .unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_owned())
            .trim_matches('/')
            .to_owned();
        let display_path = get("PIXELBOARD_DISPLAY_PATH").unwrap_or_else(|| DEFAULT_DISPLAY_PATH.to_owned());

        Self {
            cache_dir,
            store: StoreSettings { api_base_url, default_branch, layout: StoreLayout { artifacts_dir, display_path } },
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR), |dir| dir.join("pixelboard"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
