// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

/// Where and how to query the STH-Comet historian.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorianConfig {
    pub host: String,
    pub port: u16,
    /// `fiware-service` request header.
    pub service: String,
    /// `fiware-servicepath` request header.
    pub service_path: String,
    pub entity_type: String,
    pub device_id: String,
    /// Lookback window: most-recent raw points requested per attribute.
    pub last_n: u32,
}

impl Default for HistorianConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8666,
            service: "smart".to_string(),
            service_path: "/".to_string(),
            entity_type: "Lamp".to_string(),
            device_id: "urn:ngsi-ld:Lamp:001".to_string(),
            last_n: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub bind_addr: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            bind_addr: "0.0.0.0:8051".to_string(),
        }
    }
}

/// Display-only concern: offset applied when re-rendering timestamps for the
/// `/series/display` endpoint. Never feeds back into aggregation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub utc_offset_minutes: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub historian: HistorianConfig,
    pub poll: PollConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config from {}", path.display()))?;
        Ok(cfg)
    }

    /// Load config using env var + fallbacks:
    /// 1) $DASHBOARD_CONFIG_PATH
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    /// Individual env overrides apply on top in every case.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                anyhow::bail!("DASHBOARD_CONFIG_PATH points to non-existent path");
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Config::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("STH_HOST") {
            self.historian.host = v;
        }
        if let Some(v) = env_parse("STH_PORT") {
            self.historian.port = v;
        }
        if let Ok(v) = std::env::var("STH_SERVICE") {
            self.historian.service = v;
        }
        if let Ok(v) = std::env::var("STH_SERVICE_PATH") {
            self.historian.service_path = v;
        }
        if let Ok(v) = std::env::var("STH_ENTITY_TYPE") {
            self.historian.entity_type = v;
        }
        if let Ok(v) = std::env::var("STH_DEVICE_ID") {
            self.historian.device_id = v;
        }
        if let Some(v) = env_parse("STH_LAST_N") {
            self.historian.last_n = v;
        }
        if let Some(v) = env_parse("POLL_INTERVAL_SECS") {
            self.poll.interval_secs = v;
        }
        if let Ok(v) = std::env::var("DASH_BIND_ADDR") {
            self.poll.bind_addr = v;
        }
        if let Some(v) = env_parse("DISPLAY_UTC_OFFSET_MINUTES") {
            self.display.utc_offset_minutes = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const OVERRIDE_VARS: &[&str] = &[
        "STH_HOST",
        "STH_PORT",
        "STH_SERVICE",
        "STH_SERVICE_PATH",
        "STH_ENTITY_TYPE",
        "STH_DEVICE_ID",
        "STH_LAST_N",
        "POLL_INTERVAL_SECS",
        "DASH_BIND_ADDR",
        "DISPLAY_UTC_OFFSET_MINUTES",
    ];

    fn clear_env() {
        env::remove_var(ENV_CONFIG_PATH);
        for v in OVERRIDE_VARS {
            env::remove_var(v);
        }
    }

    #[test]
    fn defaults_mirror_reference_deployment() {
        let cfg = Config::default();
        assert_eq!(cfg.historian.port, 8666);
        assert_eq!(cfg.historian.last_n, 30);
        assert_eq!(cfg.historian.device_id, "urn:ngsi-ld:Lamp:001");
        assert_eq!(cfg.poll.interval_secs, 10);
    }

    #[test]
    fn toml_partial_override_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [historian]
            host = "10.0.0.7"
            last_n = 50
            "#,
        )
        .unwrap();
        assert_eq!(cfg.historian.host, "10.0.0.7");
        assert_eq!(cfg.historian.last_n, 50);
        assert_eq!(cfg.historian.port, 8666);
        assert_eq!(cfg.poll.interval_secs, 10);
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_path_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        clear_env();

        // No files in temp CWD -> built-in defaults
        let cfg = Config::load_default().unwrap();
        assert_eq!(cfg.historian.port, 8666);

        // Env path takes precedence
        let p = tmp.path().join("dashboard.toml");
        fs::write(&p, "[poll]\ninterval_secs = 5\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        let cfg2 = Config::load_default().unwrap();
        assert_eq!(cfg2.poll.interval_secs, 5);
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_apply_on_top() {
        clear_env();
        env::set_var("STH_LAST_N", "7");
        env::set_var("STH_HOST", "historian.local");
        let mut cfg = Config::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.historian.last_n, 7);
        assert_eq!(cfg.historian.host, "historian.local");
        clear_env();
    }
}
