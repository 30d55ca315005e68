//! # Idempotent Writer
//!
//! Merges rendered blocks into output files between generator-owned markers.
//!
//! ## Markers
//!
//! Each block is delimited by a pair of comment lines that embed the generator
//! identity and the artifact kind, so several generated blocks (or several
//! generators) can share one file:
//!
//! ```text
//! <!-- BEGIN project-synth:dependencies -->
//! ...generated...
//! <!-- END project-synth:dependencies -->
//! ```
//!
//! ## Merge Rules
//!
//! 1.  A missing file starts from the target's skeleton.
//! 2.  If the file has no marker pair for a kind, a new block is inserted
//!     before the last line matching the placement anchor, or appended at the
//!     end of the file when there is no anchor.
//! 3.  If the pair exists, only the lines strictly between the markers are
//!     replaced. The block keeps the indentation of its begin marker.
//! 4.  Everything outside marker pairs passes through byte-for-byte.
//! 5.  A lone begin or end marker, an end before its begin, or a repeated
//!     pair is [`Error::MarkerCorruption`]. The writer never guesses a repair.
//!
//! The merged file is staged in memory and compared against what is on disk.
//! Only a real difference leads to a write, which goes through a temporary
//! file in the same directory followed by a rename.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::target::{ArtifactKind, CommentStyle, Placement};

/// Generator identity embedded in every marker
pub const GENERATOR: &str = "project-synth";

/// Builds and recognizes marker lines
#[derive(Debug, Clone)]
pub struct Markers {
    generator: String,
    style: CommentStyle,
}

impl Markers {
    pub fn new(generator: impl Into<String>, style: CommentStyle) -> Self {
        Self {
            generator: generator.into(),
            style,
        }
    }

    pub fn begin(&self, kind: ArtifactKind) -> String {
        self.style
            .wrap(&format!("BEGIN {}:{}", self.generator, kind.as_str()))
    }

    pub fn end(&self, kind: ArtifactKind) -> String {
        self.style
            .wrap(&format!("END {}:{}", self.generator, kind.as_str()))
    }
}

/// One rendered block and where to put it if it is new
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: ArtifactKind,
    pub text: String,
    pub anchor: Option<String>,
    pub indent: String,
}

impl Block {
    /// A block appended at end of file with no indentation.
    pub fn new(kind: ArtifactKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            anchor: None,
            indent: String::new(),
        }
    }

    /// A block positioned according to a target placement.
    pub fn placed(kind: ArtifactKind, text: impl Into<String>, placement: &Placement) -> Self {
        Self {
            kind,
            text: text.into(),
            anchor: placement.anchor.map(str::to_string),
            indent: placement.indent.to_string(),
        }
    }
}

/// What a write did to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

impl WriteOutcome {
    pub fn is_change(self) -> bool {
        self != WriteOutcome::Unchanged
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Updated => "updated",
            WriteOutcome::Unchanged => "unchanged",
        }
    }
}

/// Merges blocks into files and writes only real changes
#[derive(Debug, Clone)]
pub struct Writer {
    markers: Markers,
    dry_run: bool,
}

impl Writer {
    pub fn new(markers: Markers) -> Self {
        Self {
            markers,
            dry_run: false,
        }
    }

    /// Compute outcomes without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Merge one block into `path`, appending it at end of file when new.
    ///
    /// A missing or blank file starts from `skeleton`.
    pub fn write(
        &self,
        path: &Path,
        skeleton: &str,
        kind: ArtifactKind,
        text: &str,
    ) -> Result<WriteOutcome> {
        self.write_blocks(path, skeleton, &[Block::new(kind, text)])
    }

    /// Merge several blocks into `path` and write the file once.
    ///
    /// `skeleton` is the starting content when the file does not exist yet or
    /// holds only whitespace. If any block fails to merge, the file is left
    /// untouched.
    pub fn write_blocks(&self, path: &Path, skeleton: &str, blocks: &[Block]) -> Result<WriteOutcome> {
        let existing = read_existing(path)?;
        let merged = self.merge(path, existing.as_deref(), skeleton, blocks)?;

        let outcome = match existing {
            None => WriteOutcome::Created,
            Some(ref current) if *current == merged => WriteOutcome::Unchanged,
            Some(_) => WriteOutcome::Updated,
        };

        if outcome == WriteOutcome::Unchanged {
            debug!("{} is up to date", path.display());
            return Ok(outcome);
        }
        if self.dry_run {
            info!("Would have {} {}", outcome.as_str(), path.display());
            return Ok(outcome);
        }

        persist(path, &merged)?;
        info!("{} {}", outcome.as_str(), path.display());
        Ok(outcome)
    }

    /// Merge blocks into `existing` (or the skeleton, when `existing` is
    /// missing or blank) without any I/O.
    pub fn merge(
        &self,
        path: &Path,
        existing: Option<&str>,
        skeleton: &str,
        blocks: &[Block],
    ) -> Result<String> {
        let mut content = match existing {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => skeleton.to_string(),
        };
        for block in blocks {
            content = merge_block(&content, &self.markers, block).map_err(|message| {
                Error::MarkerCorruption {
                    path: path.to_path_buf(),
                    kind: block.kind.as_str().to_string(),
                    message,
                }
            })?;
        }
        Ok(content)
    }
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Filesystem {
            message: format!("Failed to read '{}': {}", path.display(), e),
        }),
    }
}

/// Replace `path` with `content` through a temporary file and a rename.
fn persist(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", parent.display(), e),
    })?;

    let mut staged = tempfile::NamedTempFile::new_in(&parent).map_err(|e| Error::Filesystem {
        message: format!("Failed to stage '{}': {}", path.display(), e),
    })?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| Error::Filesystem {
            message: format!("Failed to stage '{}': {}", path.display(), e),
        })?;

    // Keep the permissions of the file being replaced; new files get 0644.
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        fs::set_permissions(staged.path(), permissions).map_err(|e| Error::Filesystem {
            message: format!("Failed to set permissions on '{}': {}", path.display(), e),
        })?;
    }

    staged.persist(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e.error),
    })?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn leading_whitespace(line: &str) -> &str {
    let body = strip_eol(line);
    &body[..body.len() - body.trim_start().len()]
}

/// Indent every non-empty line of `text` and terminate it with `eol`.
fn body_lines(text: &str, indent: &str, eol: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push_str(eol);
    }
    out
}

fn merge_block(content: &str, markers: &Markers, block: &Block) -> std::result::Result<String, String> {
    let begin = markers.begin(block.kind);
    let end = markers.end(block.kind);
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let find = |marker: &str| -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| strip_eol(line).trim() == marker)
            .map(|(index, _)| index)
            .collect()
    };
    let begins = find(&begin);
    let ends = find(&end);

    match (begins.as_slice(), ends.as_slice()) {
        ([], []) => Ok(insert_block(&lines, &begin, &end, block, eol)),
        ([b], [e]) if b < e => {
            let indent = leading_whitespace(lines[*b]);
            let mut out: String = lines[..=*b].concat();
            out.push_str(&body_lines(&block.text, indent, eol));
            out.push_str(&lines[*e..].concat());
            Ok(out)
        }
        ([b], [e]) => Err(format!(
            "end marker on line {} comes before begin marker on line {}",
            e + 1,
            b + 1
        )),
        ([b], []) => Err(format!(
            "begin marker on line {} has no matching end marker",
            b + 1
        )),
        ([], [e]) => Err(format!(
            "end marker on line {} has no matching begin marker",
            e + 1
        )),
        (b, e) => Err(format!(
            "found {} begin and {} end markers, expected exactly one pair",
            b.len(),
            e.len()
        )),
    }
}

fn insert_block(lines: &[&str], begin: &str, end: &str, block: &Block, eol: &str) -> String {
    let indent = block.indent.as_str();
    let mut section = String::new();
    section.push_str(indent);
    section.push_str(begin);
    section.push_str(eol);
    section.push_str(&body_lines(&block.text, indent, eol));
    section.push_str(indent);
    section.push_str(end);
    section.push_str(eol);

    let anchor_at = block.anchor.as_deref().and_then(|anchor| {
        lines
            .iter()
            .rposition(|line| strip_eol(line).trim() == anchor)
    });

    match anchor_at {
        Some(index) => {
            let mut out: String = lines[..index].concat();
            out.push_str(&section);
            out.push_str(&lines[index..].concat());
            out
        }
        None => {
            let mut out = lines.concat();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push_str(eol);
            }
            out.push_str(&section);
            out
        }
    }
}
