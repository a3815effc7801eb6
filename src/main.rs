use anyhow::Result;
use clap::Parser;
use log::info;

use filepane::app;
use filepane::cli::Cli;
use filepane::context::FilepaneContext;
use filepane::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.logging_mode, cli.debug)?;
    info!("filepane starting");
    info!("logging mode: {:?}", cli.logging_mode);
    info!("args: {:?}", std::env::args().collect::<Vec<_>>());

    let context = FilepaneContext::new(cli)?;
    if let Some(path) = &context.config_path {
        info!("config: {}", path.display());
    }
    info!("start dir: {}", context.start_dir.display());

    app::run(&context)
}
