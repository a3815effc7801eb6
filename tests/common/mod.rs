#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A scratch directory under the system temp dir, unique per test.
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Result<Self> {
        let path = temp_dir("filepane_tests", name);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.path.join(rel)
    }

    /// Path as the string a user would type at the prompt.
    pub fn arg(&self, rel: &str) -> String {
        self.join(rel).display().to_string()
    }

    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let p = self.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(p, content)?;
        Ok(())
    }

    pub fn mkdir(&self, rel: &str) -> Result<()> {
        fs::create_dir_all(self.join(rel))?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let p = self.join(rel);
        fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))
    }

    /// Creates `files` files in every directory of a `depth`-deep chain of
    /// `width` subdirectories per level, and returns (files, directories)
    /// created below the root.
    pub fn populate(&self, rel: &str, depth: usize, width: usize, files: usize) -> Result<(usize, usize)> {
        let root = self.join(rel);
        fs::create_dir_all(&root)?;
        populate_dir(&root, depth, width, files)
    }
}

fn populate_dir(dir: &Path, depth: usize, width: usize, files: usize) -> Result<(usize, usize)> {
    let mut file_count = 0;
    let mut dir_count = 0;
    for i in 0..files {
        fs::write(dir.join(format!("file{i:02}.txt")), format!("{i}"))?;
        file_count += 1;
    }
    if depth == 0 {
        return Ok((file_count, dir_count));
    }
    for i in 0..width {
        let sub = dir.join(format!("dir{i:02}"));
        fs::create_dir_all(&sub)?;
        dir_count += 1;
        let (f, d) = populate_dir(&sub, depth - 1, width, files)?;
        file_count += f;
        dir_count += d;
    }
    Ok((file_count, dir_count))
}

fn temp_dir(base: &str, name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(base)
        .join(name)
        .join(Uuid::new_v4().to_string())
}
