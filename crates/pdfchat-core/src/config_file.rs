use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Config;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub storage: Option<StorageConfig>,
    pub llm: Option<LlmConfig>,
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub history_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdfchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfchat").join("config.toml"))
}

/// Load config by cascading CWD `.pdfchat.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfchat.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        storage: Some(StorageConfig {
            history_path: overlay
                .storage
                .as_ref()
                .and_then(|s| s.history_path.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.history_path.clone())),
        }),
        llm: Some(LlmConfig {
            api_base: overlay
                .llm
                .as_ref()
                .and_then(|l| l.api_base.clone())
                .or_else(|| base.llm.as_ref().and_then(|l| l.api_base.clone())),
            api_key: overlay
                .llm
                .as_ref()
                .and_then(|l| l.api_key.clone())
                .or_else(|| base.llm.as_ref().and_then(|l| l.api_key.clone())),
            model: overlay
                .llm
                .as_ref()
                .and_then(|l| l.model.clone())
                .or_else(|| base.llm.as_ref().and_then(|l| l.model.clone())),
            timeout_secs: overlay
                .llm
                .as_ref()
                .and_then(|l| l.timeout_secs)
                .or_else(|| base.llm.as_ref().and_then(|l| l.timeout_secs)),
        }),
        server: Some(ServerConfig {
            host: overlay
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.host.clone())),
            port: overlay
                .server
                .as_ref()
                .and_then(|s| s.port)
                .or_else(|| base.server.as_ref().and_then(|s| s.port)),
            max_upload_mb: overlay
                .server
                .as_ref()
                .and_then(|s| s.max_upload_mb)
                .or_else(|| base.server.as_ref().and_then(|s| s.max_upload_mb)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

impl ConfigFile {
    /// Apply every value present in the file on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = self.storage.as_ref().and_then(|s| s.history_path.as_ref()) {
            config.history_path = PathBuf::from(path);
        }
        if let Some(llm) = &self.llm {
            if let Some(base) = &llm.api_base {
                config.api_base = base.clone();
            }
            if let Some(key) = llm.api_key.as_ref().filter(|k| !k.is_empty()) {
                config.api_key = Some(key.clone());
            }
            if let Some(model) = &llm.model {
                config.model = model.clone();
            }
            if let Some(secs) = llm.timeout_secs {
                config.request_timeout = Duration::from_secs(secs);
            }
        }
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.server_host = host.clone();
            }
            if let Some(port) = server.port {
                config.server_port = port;
            }
            if let Some(mb) = server.max_upload_mb {
                config.max_upload_mb = mb;
            }
        }
        if let Some(theme) = self.display.as_ref().and_then(|d| d.theme.as_ref()) {
            config.theme = theme.clone();
        }
    }
}

/// Defaults, then config files, then environment.
pub fn resolve_config() -> Config {
    let mut config = Config::default();
    load_config().apply_to(&mut config);
    config.apply_env();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let cfg: ConfigFile = toml::from_str("[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();
        assert!(cfg.storage.is_none());
        assert_eq!(cfg.llm.unwrap().model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base: ConfigFile = toml::from_str(
            "[server]\nhost = \"0.0.0.0\"\nport = 9000\n[display]\ntheme = \"modern\"\n",
        )
        .unwrap();
        let overlay: ConfigFile = toml::from_str("[server]\nport = 8100\n").unwrap();

        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8100));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn apply_to_overrides_only_present_values() {
        let file: ConfigFile = toml::from_str(
            "[storage]\nhistory_path = \"/tmp/h.json\"\n[llm]\ntimeout_secs = 5\napi_key = \"\"\n",
        )
        .unwrap();
        let mut config = Config::default();
        file.apply_to(&mut config);

        assert_eq!(config.history_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, crate::DEFAULT_MODEL);
        assert_eq!(config.server_port, 8001);
    }

    #[test]
    fn load_from_path_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
