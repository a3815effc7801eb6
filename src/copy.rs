use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{} does not exist", .0.display())]
    SourceMissing(PathBuf),
    #[error("{} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CopyError + '_ {
    move |source| CopyError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copies a file, or a directory's files (and with `recursive`, its
/// subdirectories) into `destination`. Existing files are never
/// overwritten. Symlinks are recreated, not followed. A failure part way
/// leaves whatever was already copied.
///
/// When `destination` lies inside `source`, the copy skips it.
pub fn copy(source: &Path, destination: &Path, recursive: bool) -> Result<(), CopyError> {
    if source.is_dir() {
        fs::create_dir_all(destination).map_err(io_error(destination))?;
        let skip = fs::canonicalize(destination).map_err(io_error(destination))?;
        copy_dir(source, destination, recursive, &skip)
    } else if source.is_file() {
        copy_file(source, destination)
    } else {
        Err(CopyError::SourceMissing(source.to_path_buf()))
    }
}

fn copy_dir(
    source: &Path,
    destination: &Path,
    recursive: bool,
    skip: &Path,
) -> Result<(), CopyError> {
    let mut files = Vec::new();
    let mut links = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| CopyError::Io {
            path: source.to_path_buf(),
            source: err.into(),
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            dirs.push(entry.into_path());
        } else if file_type.is_symlink() {
            links.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    fs::create_dir_all(destination).map_err(io_error(destination))?;
    debug!(
        "copying {} files from {} to {}",
        files.len() + links.len(),
        source.display(),
        destination.display()
    );

    for file in &files {
        if let Some(name) = file.file_name() {
            copy_file(file, &destination.join(name))?;
        }
    }
    for link in &links {
        if let Some(name) = link.file_name() {
            copy_link(link, &destination.join(name))?;
        }
    }

    if recursive {
        for dir in &dirs {
            let Some(name) = dir.file_name() else {
                continue;
            };
            if fs::canonicalize(dir).map_err(io_error(dir))? == skip {
                debug!("skipping {}, it is the copy destination", dir.display());
                continue;
            }
            copy_dir(dir, &destination.join(name), true, skip)?;
        }
    }
    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), CopyError> {
    if destination.symlink_metadata().is_ok() {
        return Err(CopyError::DestinationExists(destination.to_path_buf()));
    }
    fs::copy(source, destination).map_err(io_error(source))?;
    Ok(())
}

fn copy_link(source: &Path, destination: &Path) -> Result<(), CopyError> {
    if destination.symlink_metadata().is_ok() {
        return Err(CopyError::DestinationExists(destination.to_path_buf()));
    }
    let target = fs::read_link(source).map_err(io_error(source))?;
    make_link(&target, destination).map_err(io_error(destination))
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    if link.parent().is_some_and(|dir| dir.join(target).is_dir()) {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
