use anyhow::{Context, Result, ensure};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{self, FilepaneConfig};

pub struct FilepaneContext {
    pub invocation: Cli,
    pub config: FilepaneConfig,
    pub config_path: Option<PathBuf>,
    pub start_dir: PathBuf,
}

impl FilepaneContext {
    pub fn new(invocation: Cli) -> Result<Self> {
        let working_dir =
            std::env::current_dir().context("Failed to read the working directory")?;
        let (config, config_path) = config::load(invocation.config.as_deref(), &working_dir)?;
        let start_dir = match &invocation.dir {
            Some(dir) => working_dir.join(dir),
            None => working_dir,
        };
        ensure!(
            start_dir.is_dir(),
            "Not a directory: {}",
            start_dir.display()
        );
        Ok(Self {
            invocation,
            config,
            config_path,
            start_dir,
        })
    }
}
