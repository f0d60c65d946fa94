//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `PRODUCT_CONSOLE__*` environment variables (e.g. `PRODUCT_CONSOLE__API__BASE_URL`).

use crate::forms::FormVariant;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

pub const DEFAULT_CONFIG_FILE: &str = "product-console";
pub const CONFIG_PATH_VAR: &str = "PRODUCT_CONSOLE_CONFIG";
pub const ENV_PREFIX: &str = "PRODUCT_CONSOLE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Edit in a dialog over the list.
    #[default]
    Dialog,
    /// Navigate to a dedicated edit page that fetches the product by id.
    Routed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormSettings {
    pub variant: FormVariant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiSettings {
    pub edit_mode: EditMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StubSettings {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub log: LogSettings,
    pub form: FormSettings,
    pub ui: UiSettings,
    pub stub: StubSettings,
}

impl Settings {
    /// Loads from the file named by `PRODUCT_CONSOLE_CONFIG`, falling back to `product-console.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api.base_url", "https://localhost:44385/api/product")?
            .set_default("log.level", "info")?
            .set_default("form.variant", "catalog")?
            .set_default("ui.edit_mode", "dialog")?
            .set_default("stub.bind_addr", "127.0.0.1:5080")?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load_from("does-not-exist/product-console").unwrap();

        assert_eq!(settings.api.base_url, "https://localhost:44385/api/product");
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.form.variant, FormVariant::Catalog);
        assert_eq!(settings.ui.edit_mode, EditMode::Dialog);
        assert_eq!(settings.stub.bind_addr.to_string(), "127.0.0.1:5080");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "product-console-settings-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://127.0.0.1:5080/api/product\"\n\n[form]\nvariant = \"basic\"\n\n[ui]\nedit_mode = \"routed\""
        )
        .unwrap();

        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.api.base_url, "http://127.0.0.1:5080/api/product");
        assert_eq!(settings.form.variant, FormVariant::Basic);
        assert_eq!(settings.ui.edit_mode, EditMode::Routed);
        assert_eq!(settings.log.level, "info");
    }
}
