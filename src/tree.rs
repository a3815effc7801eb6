//! Directory tree rendering.
//!
//! [`TreeWalker`] yields one [`TreeLine`] per entry in pre-order, reading a
//! directory's listing only when the walk reaches it. [`render`] windows that
//! stream into fixed-size pages without holding the whole tree.

use anyhow::{Context, Result};
use std::fmt;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::vec;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Branch,
    Last,
}

impl Glyph {
    fn for_sibling(is_last: bool) -> Self {
        if is_last { Glyph::Last } else { Glyph::Branch }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Glyph::Branch => "├─",
            Glyph::Last => "└─",
        }
    }

    /// Indent contributed to the children of an entry drawn with this glyph.
    fn child_indent(&self) -> &'static str {
        match self {
            Glyph::Branch => "│ ",
            Glyph::Last => "  ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub indent: String,
    pub glyph: Glyph,
    pub label: String,
    pub kind: EntryKind,
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.indent, self.glyph.as_str(), self.label)
    }
}

#[derive(Debug)]
struct Child {
    name: String,
    dir: Option<PathBuf>,
}

struct Frame {
    indent: String,
    children: Peekable<vec::IntoIter<Child>>,
}

/// Files first, then subdirectories, each sorted by name. Anything that is
/// not a directory (symlinks included) counts as a file.
fn read_children(path: &Path) -> Result<Vec<Child>> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    let walker = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            dirs.push(Child {
                name,
                dir: Some(entry.into_path()),
            });
        } else {
            files.push(Child { name, dir: None });
        }
    }
    files.extend(dirs);
    Ok(files)
}

fn root_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lazy pre-order walk. Restart by constructing a new walker.
pub struct TreeWalker {
    root: Option<PathBuf>,
    stack: Vec<Frame>,
    failed: bool,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            stack: Vec::new(),
            failed: false,
        }
    }

    fn enter(
        &mut self,
        path: &Path,
        label: String,
        indent: String,
        glyph: Glyph,
    ) -> Result<TreeLine> {
        let children = read_children(path)?;
        self.stack.push(Frame {
            indent: format!("{}{}", indent, glyph.child_indent()),
            children: children.into_iter().peekable(),
        });
        Ok(TreeLine {
            indent,
            glyph,
            label,
            kind: EntryKind::Directory,
        })
    }

    fn step(&mut self) -> Option<Result<TreeLine>> {
        if let Some(root) = self.root.take() {
            let label = root_label(&root);
            return Some(self.enter(&root, label, String::new(), Glyph::Last));
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(child) = frame.children.next() else {
                self.stack.pop();
                continue;
            };
            let glyph = Glyph::for_sibling(frame.children.peek().is_none());
            let indent = frame.indent.clone();
            return Some(match child.dir {
                Some(path) => self.enter(&path, child.name, indent, glyph),
                None => Ok(TreeLine {
                    indent,
                    glyph,
                    label: child.name,
                    kind: EntryKind::File,
                }),
            });
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<TreeLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.step();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePage {
    pub root: PathBuf,
    pub lines: Vec<TreeLine>,
    pub page: usize,
    pub page_count: usize,
    pub total_lines: usize,
}

impl TreePage {
    pub fn footer(&self) -> String {
        format!("╡ {} of {} ╞", self.page, self.page_count)
    }
}

/// Renders page `page` (1-based) of the tree under `root`.
///
/// Pages past the end clamp to the last page and page 0 reads as page 1.
/// The walk is a single pass that keeps at most two windows of lines.
pub fn render(root: &Path, page: usize, page_lines: usize) -> Result<TreePage> {
    let page_lines = page_lines.max(1);
    let requested = page.max(1);
    let start = (requested - 1).saturating_mul(page_lines);
    let end = start.saturating_add(page_lines);

    let mut window = Vec::with_capacity(page_lines);
    let mut tail = Vec::with_capacity(page_lines);
    let mut total_lines = 0;

    for (index, line) in TreeWalker::new(root).enumerate() {
        let line = line?;
        total_lines = index + 1;
        if index >= end {
            continue;
        }
        if index >= start {
            window.push(line);
        } else {
            if index % page_lines == 0 {
                tail.clear();
            }
            tail.push(line);
        }
    }

    let page_count = total_lines.div_ceil(page_lines).max(1);
    let (page, lines) = if window.is_empty() {
        (page_count, tail)
    } else {
        (requested, window)
    };

    Ok(TreePage {
        root: root.to_path_buf(),
        lines,
        page,
        page_count,
        total_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join("filepane_unit")
            .join(name)
            .join(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn rendered(root: &Path) -> Vec<String> {
        TreeWalker::new(root)
            .map(|line| line.unwrap().to_string())
            .collect()
    }

    #[test]
    fn glyphs_and_indents_follow_sibling_position() {
        let root = scratch("glyphs").join("proj");
        touch(&root, "a.txt");
        touch(&root, "b.txt");
        touch(&root, "sub1/c.txt");
        fs::create_dir_all(root.join("sub2")).unwrap();

        assert_eq!(
            rendered(&root),
            vec![
                "└─proj",
                "  ├─a.txt",
                "  ├─b.txt",
                "  ├─sub1",
                "  │ └─c.txt",
                "  └─sub2",
            ]
        );
    }

    #[test]
    fn last_file_is_branch_when_directories_follow() {
        let root = scratch("files_then_dirs").join("r");
        touch(&root, "only.txt");
        touch(&root, "d/inner/deep.txt");

        assert_eq!(
            rendered(&root),
            vec![
                "└─r",
                "  ├─only.txt",
                "  └─d",
                "    └─inner",
                "      └─deep.txt",
            ]
        );
    }

    #[test]
    fn empty_root_is_a_single_line() {
        let root = scratch("empty").join("nothing");
        fs::create_dir_all(&root).unwrap();
        let page = render(&root, 1, 16).unwrap();
        assert_eq!(page.total_lines, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.lines[0].kind, EntryKind::Directory);
        assert_eq!(page.footer(), "╡ 1 of 1 ╞");
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = scratch("missing").join("not-there");
        assert!(render(&root, 1, 16).is_err());
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let root = scratch("page_zero").join("r");
        for i in 0..5 {
            touch(&root, &format!("f{i}.txt"));
        }
        let page = render(&root, 0, 2).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.lines.len(), 2);
        assert_eq!(page.lines[0].label, "r");
    }

    #[test]
    fn huge_page_clamps_to_last_page() {
        let root = scratch("huge_page").join("r");
        for i in 0..5 {
            touch(&root, &format!("f{i}.txt"));
        }
        let page = render(&root, usize::MAX, 4).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.lines.len(), 2);
        assert_eq!(page.lines[1].label, "f4.txt");
    }

    #[test]
    fn walker_stops_after_an_error() {
        let root = scratch("stops").join("gone");
        let mut walker = TreeWalker::new(&root);
        assert!(matches!(walker.next(), Some(Err(_))));
        assert!(walker.next().is_none());
    }
}
