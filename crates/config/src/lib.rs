pub mod schema;
pub mod watcher;

pub use schema::{
    Edge, ExportConfig, GraphConfig, MonitorConfig, RenderConfig, SamplerConfig, ThemeConfig,
    WindowConfig, XScale,
};
pub use watcher::ConfigWatcher;

use sysgraph_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()`
/// if the file doesn't exist so the overlay always has sensible defaults.
///
/// The parsed config is passed through [`MonitorConfig::sanitized`] before
/// it is returned.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// [`load`], falling back to defaults (with a warning) when the file is
/// unreadable or malformed.  For the overlay, which should always come up.
pub fn load_or_default(path: impl AsRef<Path>) -> MonitorConfig {
    let path = path.as_ref();
    load(path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring config '{}': {e}; using defaults.", path.display());
        MonitorConfig::default()
    })
}

/// Parse a TOML document into a sanitized [`MonitorConfig`].
pub fn parse(raw: &str) -> Result<MonitorConfig> {
    let config: MonitorConfig =
        toml::from_str(raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    Ok(config.sanitized())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("sysgraph").join("sysgraph.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sysgraph_core::MetricKind;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.sampler.capacity, 50);
        assert_eq!(config.sampler.interval_ms, 1000);
        assert_eq!(config.graphs.len(), 3);
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[sampler]
capacity = 120

[render]
x_scale = "fill"

[[graphs]]
kind  = "memory"
color = "#00ff00"
"##
        )
        .unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.sampler.capacity, 120);
        assert_eq!(config.sampler.interval_ms, 1000);
        assert_eq!(config.render.x_scale, XScale::Fill);
        assert_eq!(config.graphs.len(), 1);
        assert_eq!(config.graphs[0].kind, MetricKind::Memory);
        assert_eq!(config.graphs[0].label(), "Memory");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sampler\ncapacity = ").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults_for_the_overlay() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sampler\ncapacity = ").unwrap();

        let config = load_or_default(file.path());
        assert_eq!(config.sampler.capacity, 50);
        assert_eq!(config.graphs.len(), 3);

        let mut good = NamedTempFile::new().unwrap();
        writeln!(good, "[sampler]\ncapacity = 80").unwrap();
        assert_eq!(load_or_default(good.path()).sampler.capacity, 80);
    }

    #[test]
    fn unknown_metric_kind_is_rejected() {
        let err = parse("[[graphs]]\nkind = \"gpu\"\ncolor = \"#fff\"\n").unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }
}
