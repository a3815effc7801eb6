use clap::Parser;
use std::path::PathBuf;

use crate::logging::LoggingMode;

#[derive(Parser, Debug)]
#[command(name = "filepane")]
#[command(about = "Terminal file browser with a paged directory tree", long_about = None)]
pub struct Cli {
    /// Initial directory (defaults to the working directory)
    pub dir: Option<PathBuf>,

    /// Path to a filepane.toml (otherwise searched upwards from the working directory)
    #[arg(long, env = "FILEPANE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LoggingMode::File)]
    pub logging_mode: LoggingMode,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,
}
