use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const APP_DIR: &str = "filepane";

#[derive(Copy, Clone, Debug, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum LoggingMode {
    File,
    Stderr,
}

pub fn init_logging(mode: LoggingMode, debug: bool) -> Result<()> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let thread_id = format!("{:?}", std::thread::current().id());
            let module = record.module_path().unwrap_or(record.target());
            let line = record
                .line()
                .map(|line| line.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.finish(format_args!(
                "[{}] [{}] [{}] [{}:{}] [{}]",
                record.level(),
                timestamp,
                thread_id,
                module,
                line,
                message
            ))
        });

    match mode {
        LoggingMode::Stderr => {
            dispatch = dispatch.chain(std::io::stderr());
        }
        // The UI owns stdout, so a file is the only quiet sink.
        LoggingMode::File => match create_log_file() {
            Ok(log_file) => {
                dispatch = dispatch.chain(log_file);
            }
            Err(err) => {
                eprintln!("Failed to open log file: {}", err);
                dispatch = dispatch.chain(std::io::stderr());
            }
        },
    }

    dispatch.apply()?;
    Ok(())
}

fn log_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .context("Failed to resolve a data directory for logs")?;
    Ok(base.join(APP_DIR).join("logs"))
}

fn create_log_file() -> Result<std::fs::File> {
    let log_dir = log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let log_path: PathBuf = log_dir.join(format!("{}.log", date));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    Ok(file)
}
