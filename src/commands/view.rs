use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::parser::config::{Config, DEFAULT_FILE};
use crate::parser::dataset;
use crate::session::{Mode, Session};
use crate::tui::canvas;

pub fn run(
    dataset: Option<&Path>,
    mut cfg: Config,
    config_path: Option<PathBuf>,
    teaching: bool,
) -> Result<()> {
    if teaching {
        cfg.mode = Mode::Teaching;
    }
    let session = open_session(dataset, &cfg)?;
    canvas::run(session, cfg, config_path, false)
}

/// Settings panel only. Writes to the located config file, or creates
/// `pathmap.conf` in the working directory.
pub fn run_setup(dataset: Option<&Path>, cfg: Config, config_path: Option<PathBuf>) -> Result<()> {
    let session = open_session(dataset, &cfg)?;
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
    canvas::run(session, cfg, Some(path), true)
}

fn open_session(dataset: Option<&Path>, cfg: &Config) -> Result<Session> {
    let dataset = dataset::load(dataset)?;
    Session::initialize(&dataset, cfg).context("failed to load reaction network")
}
