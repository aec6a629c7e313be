// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./thoughtchain.toml` > `~/.config/thoughtchain/thoughtchain.toml`
//! > `/etc/thoughtchain/thoughtchain.toml` with environment variable overrides
//! via the `THOUGHTCHAIN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ThoughtchainConfig;

/// Config sections addressable from `THOUGHTCHAIN_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["server", "storage", "maintenance", "metrics"];

/// Legacy switch that enables the maintenance endpoint when set to `1`.
pub const LEGACY_MAINTENANCE_VAR: &str = "DEV_MAINTENANCE";

pub(crate) const LOCAL_CONFIG_FILE: &str = "thoughtchain.toml";
pub(crate) const SYSTEM_CONFIG_FILE: &str = "/etc/thoughtchain/thoughtchain.toml";

pub(crate) fn user_config_file() -> std::path::PathBuf {
    dirs::config_dir()
        .map(|d| d.join("thoughtchain").join(LOCAL_CONFIG_FILE))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/thoughtchain/thoughtchain.toml` (system-wide)
/// 3. `~/.config/thoughtchain/thoughtchain.toml` (user XDG config)
/// 4. `./thoughtchain.toml` (local directory)
/// 5. `THOUGHTCHAIN_*` environment variables
/// 6. `DEV_MAINTENANCE=1`
pub fn load_config() -> Result<ThoughtchainConfig, figment::Error> {
    let mut config: ThoughtchainConfig = build_figment().extract()?;
    apply_legacy_maintenance_flag(
        &mut config,
        std::env::var(LEGACY_MAINTENANCE_VAR).ok().as_deref(),
    );
    Ok(config)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ThoughtchainConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThoughtchainConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ThoughtchainConfig, figment::Error> {
    let mut config: ThoughtchainConfig = Figment::new()
        .merge(Serialized::defaults(ThoughtchainConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    apply_legacy_maintenance_flag(
        &mut config,
        std::env::var(LEGACY_MAINTENANCE_VAR).ok().as_deref(),
    );
    Ok(config)
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ThoughtchainConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_file()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Turn the maintenance endpoint on when the legacy variable equals `1`.
///
/// The variable can only enable the endpoint, never disable a config file
/// setting.
pub fn apply_legacy_maintenance_flag(config: &mut ThoughtchainConfig, value: Option<&str>) {
    if value.map(str::trim) == Some("1") {
        tracing::warn!("{LEGACY_MAINTENANCE_VAR}=1 set -- maintenance endpoint enabled");
        config.maintenance.enabled = true;
    }
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that contain
/// underscores survive: `THOUGHTCHAIN_STORAGE_BUSY_TIMEOUT_MS` maps to
/// `storage.busy_timeout_ms`, not `storage.busy.timeout.ms`.
fn env_provider() -> Env {
    Env::prefixed("THOUGHTCHAIN_").map(|key| map_env_key(key.as_str()).into())
}

/// Figment hands over the key with the prefix stripped but case preserved.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(
            map_env_key("storage_busy_timeout_ms"),
            "storage.busy_timeout_ms"
        );
        assert_eq!(map_env_key("maintenance_enabled"), "maintenance.enabled");
        assert_eq!(map_env_key("unknown_key"), "unknown_key");
    }

    #[test]
    fn uppercase_env_keys_map_to_sections() {
        assert_eq!(map_env_key("SERVER_PORT"), "server.port");
        assert_eq!(map_env_key("METRICS_ENABLED"), "metrics.enabled");
        assert_eq!(
            map_env_key("STORAGE_DATABASE_PATH"),
            "storage.database_path"
        );
    }

    #[test]
    fn legacy_flag_only_enables_on_one() {
        let mut config = ThoughtchainConfig::default();
        apply_legacy_maintenance_flag(&mut config, Some("0"));
        assert!(!config.maintenance.enabled);
        apply_legacy_maintenance_flag(&mut config, None);
        assert!(!config.maintenance.enabled);
        apply_legacy_maintenance_flag(&mut config, Some("1"));
        assert!(config.maintenance.enabled);
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "thoughtchain.toml",
                r#"
[server]
port = 4000
"#,
            )?;
            jail.set_env("THOUGHTCHAIN_SERVER_PORT", "5000");
            jail.set_env("THOUGHTCHAIN_STORAGE_BUSY_TIMEOUT_MS", "250");
            jail.set_env("THOUGHTCHAIN_MAINTENANCE_ENABLED", "true");

            let config = load_config_from_path(Path::new("thoughtchain.toml"))?;
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.storage.busy_timeout_ms, 250);
            assert!(config.maintenance.enabled);
            Ok(())
        });
    }
}
