//! The prompt's command language: `cd PATH`, `ls PATH [-p N]`, `cp SRC DST`.
//!
//! Invalid targets are ignored without a message, like a shell that does
//! nothing on a typo. Only `cp` and tree walk failures end up in the
//! status pane.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::config::FilepaneConfig;
use crate::copy;
use crate::session::Session;
use crate::tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cd { path: String },
    Ls { path: String, page: usize },
    Cp { source: String, destination: String },
    Noop,
}

fn path_arg(tokens: &[&str], index: usize) -> Option<String> {
    tokens
        .get(index)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

fn page_arg(tokens: &[&str]) -> usize {
    match tokens {
        [_, _, flag, value, ..] if flag.eq_ignore_ascii_case("-p") => value
            .parse::<i64>()
            .map(|page| usize::try_from(page.max(1)).unwrap_or(usize::MAX))
            .unwrap_or(1),
        _ => 1,
    }
}

/// Splits on single spaces, so runs of spaces leave empty tokens that
/// never name a path. The verb is case-insensitive; arguments keep their
/// case unless `fold_case` is set.
pub fn parse(line: &str, fold_case: bool) -> Command {
    let line = if fold_case {
        line.to_lowercase()
    } else {
        line.to_string()
    };
    let tokens: Vec<&str> = line.split(' ').collect();
    let verb = tokens.first().copied().unwrap_or_default().to_lowercase();

    let command = match verb.as_str() {
        "cd" => path_arg(&tokens, 1).map(|path| Command::Cd { path }),
        "ls" => path_arg(&tokens, 1).map(|path| Command::Ls {
            path,
            page: page_arg(&tokens),
        }),
        "cp" => path_arg(&tokens, 1)
            .zip(path_arg(&tokens, 2))
            .map(|(source, destination)| Command::Cp {
                source,
                destination,
            }),
        _ => None,
    };
    command.unwrap_or(Command::Noop)
}

pub struct Dispatcher {
    fold_case: bool,
    page_lines: usize,
}

impl Dispatcher {
    pub fn new(fold_case: bool, page_lines: usize) -> Self {
        Self {
            fold_case,
            page_lines,
        }
    }

    pub fn from_config(config: &FilepaneConfig) -> Self {
        Self::new(config.commands.fold_case, config.tree.page_lines as usize)
    }

    /// Parses and runs one input line against the session.
    pub fn execute(&self, session: &mut Session, line: &str) -> Command {
        let command = parse(line, self.fold_case);
        debug!("dispatch {:?}", command);
        session.status = None;

        match &command {
            Command::Cd { path } => self.change_dir(session, path),
            Command::Ls { path, page } => self.list(session, path, *page),
            Command::Cp {
                source,
                destination,
            } => self.copy(session, source, destination),
            Command::Noop => {}
        }
        command
    }

    fn change_dir(&self, session: &mut Session, path: &str) {
        let target = session.resolve(path);
        if !target.is_dir() {
            debug!("cd: {} is not a directory", target.display());
            return;
        }
        let typed = Path::new(path);
        session.current_dir = if typed.is_absolute() {
            PathBuf::from(path)
        } else {
            target
        };
        info!("current dir: {}", session.current_dir.display());
    }

    fn list(&self, session: &mut Session, path: &str, page: usize) {
        let target = session.resolve(path);
        if !target.is_dir() {
            debug!("ls: {} is not a directory", target.display());
            return;
        }
        match tree::render(&target, page, self.page_lines) {
            Ok(rendered) => {
                debug!(
                    "ls {}: page {} of {} ({} lines)",
                    target.display(),
                    rendered.page,
                    rendered.page_count,
                    rendered.total_lines
                );
                session.tree = Some(rendered);
            }
            Err(err) => {
                warn!("ls {} failed: {:#}", target.display(), err);
                session.status = Some(format!("ls: {:#}", err));
            }
        }
    }

    fn copy(&self, session: &mut Session, source: &str, destination: &str) {
        let source = session.resolve(source);
        let destination = session.resolve(destination);
        match copy::copy(&source, &destination, true) {
            Ok(()) => info!("copied {} to {}", source.display(), destination.display()),
            Err(err) => {
                warn!(
                    "cp {} {} failed: {}",
                    source.display(),
                    destination.display(),
                    err
                );
                session.status = Some(format!("cp: {}", err));
            }
        }
    }
}
