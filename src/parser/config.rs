//! `pathmap.conf`: plain `key: value` lines with `#` comments.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::session::Mode;

pub const CONFIG_ENV: &str = "PATHMAP_CONFIG";
pub const DEFAULT_FILE: &str = "pathmap.conf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub playback_interval_ms: u64,
    pub recenter_ms: u64,
    pub show_enzyme_labels: bool,
    pub show_exam_markers: bool,
    pub sidebar_visible: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Research,
            playback_interval_ms: 2000,
            recenter_ms: 750,
            show_enzyme_labels: true,
            show_exam_markers: true,
            sidebar_visible: true,
            log_file: None,
        }
    }
}

impl Config {
    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn recenter_duration(&self) -> Duration {
        Duration::from_millis(self.recenter_ms)
    }

    /// Where the TUI writes its log.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("pathmap.log"))
    }
}

pub fn parse(input: &str) -> Result<Config> {
    let mut config = Config::default();
    for (i, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("expected `key: value` at line {}: {:?}", i + 1, raw);
        };
        let value = value.trim();
        match key.trim() {
            "mode" => {
                config.mode = value
                    .parse()
                    .with_context(|| format!("invalid mode at line {}", i + 1))?;
            }
            "playback_interval_ms" => {
                config.playback_interval_ms = parse_millis(value, i)?;
            }
            "recenter_ms" => config.recenter_ms = parse_millis(value, i)?,
            "show_enzyme_labels" => config.show_enzyme_labels = parse_bool(value, i)?,
            "show_exam_markers" => config.show_exam_markers = parse_bool(value, i)?,
            "sidebar_visible" => config.sidebar_visible = parse_bool(value, i)?,
            "log_file" => {
                config.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => {}
        }
    }
    Ok(config)
}

fn parse_bool(value: &str, line: usize) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => bail!("expected true or false at line {}, got {:?}", line + 1, other),
    }
}

fn parse_millis(value: &str, line: usize) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("expected milliseconds at line {}, got {:?}", line + 1, value))
}

/// Pick the config file: an explicit path, then `$PATHMAP_CONFIG`, then
/// `./pathmap.conf` if it exists.
pub fn locate(explicit: Option<&Path>, from_env: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_FILE);
    local.exists().then_some(local)
}

/// Load the located config, or defaults when no file exists yet.
pub fn load(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let path = locate(explicit, env::var_os(CONFIG_ENV));
    let config = match &path {
        Some(p) if p.exists() => {
            let content = fs::read_to_string(p)
                .with_context(|| format!("failed to read config {}", p.display()))?;
            parse(&content).with_context(|| format!("in {}", p.display()))?
        }
        _ => Config::default(),
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::settings::serialize_config;

    #[test]
    fn empty_input_gives_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
        assert_eq!(parse("# only a comment\n\n").unwrap(), Config::default());
    }

    #[test]
    fn parses_known_keys_and_ignores_unknown() {
        let cfg = parse(
            "mode: teaching\nplayback_interval_ms: 500\nsidebar_visible: off\ncolour: red\nlog_file: /tmp/x.log\n",
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Teaching);
        assert_eq!(cfg.playback_interval(), Duration::from_millis(500));
        assert!(!cfg.sidebar_visible);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn bad_values_report_line_numbers() {
        let err = parse("mode: research\nrecenter_ms: soon\n").unwrap_err();
        assert!(
            format!("{err:#}").contains("line 2"),
            "error should name the line: {err:#}"
        );
        let err = parse("show_exam_markers\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }

    #[test]
    fn serialized_config_round_trips_through_file() {
        let cfg = Config {
            mode: Mode::Teaching,
            playback_interval_ms: 1500,
            recenter_ms: 400,
            show_enzyme_labels: false,
            show_exam_markers: true,
            sidebar_visible: false,
            log_file: Some(PathBuf::from("logs/pathmap.log")),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        fs::write(&path, serialize_config(&cfg)).unwrap();

        let (loaded, found) = load(Some(&path)).unwrap();
        assert_eq!(found.as_deref(), Some(path.as_path()));
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn locate_prefers_explicit_then_env() {
        let explicit = Path::new("/etc/explicit.conf");
        assert_eq!(
            locate(Some(explicit), Some("/from/env.conf".into())),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            locate(None, Some("/from/env.conf".into())),
            Some(PathBuf::from("/from/env.conf"))
        );
    }

    #[test]
    fn missing_explicit_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.conf");
        let (cfg, found) = load(Some(&path)).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(found, Some(path));
    }
}
