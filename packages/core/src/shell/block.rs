//! Managed block editing for shell startup files
//!
//! A managed block is a run of lines owned by awscred, delimited by a start
//! and an end marker line:
//!
//! ```text
//! # BEGIN_AWSCRED
//! ...generated script...
//! # END_AWSCRED
//! ```
//!
//! Everything outside the markers belongs to the user and is preserved byte
//! for byte. Files are rewritten in place (not replaced via rename), so file
//! mode, ownership and symlinks are left alone. There is no protection against
//! a crash halfway through the write.
//!
//! When install has to touch anything outside the block, it says so with a
//! tag on the start marker line, so uninstall can undo exactly that:
//!
//! - `(new-file)`: the file did not exist before install
//! - `(added-lf)` / `(added-crlf)`: the file did not end with a line break,
//!   and one was added before the block

use super::template::{Bindings, render};
use super::{BlockDefect, ShellError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Marker line opening the managed block
pub const BLOCK_START_MARKER: &str = "# BEGIN_AWSCRED";

/// Marker line closing the managed block
pub const BLOCK_END_MARKER: &str = "# END_AWSCRED";

const NEW_FILE_TAG: &str = "(new-file)";
const ADDED_LF_TAG: &str = "(added-lf)";
const ADDED_CRLF_TAG: &str = "(added-crlf)";

/// Start and end marker lines for a managed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMarkers {
    pub start: String,
    pub end: String,
}

impl Default for BlockMarkers {
    fn default() -> Self {
        Self {
            start: BLOCK_START_MARKER.to_string(),
            end: BLOCK_END_MARKER.to_string(),
        }
    }
}

/// Result of [`BlockEditor::install`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The file did not exist and was created with the block
    Created,
    /// The block was appended to an existing file
    Appended,
    /// An existing block was replaced
    Updated,
    /// The file already contained this exact block; nothing was written
    Unchanged,
}

/// Result of [`BlockEditor::uninstall`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    Removed,
    NotInstalled,
    FileMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Convention of the first line break in `content`, LF if there is none
    fn detect(content: &str) -> Self {
        match content.find('\n') {
            Some(idx) if idx > 0 && content.as_bytes()[idx - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// What install changed outside the block, kept on the start marker line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InstallRecord {
    created_file: bool,
    added_terminator: Option<LineEnding>,
}

impl InstallRecord {
    /// Parse the tags following the start marker; None if any tag is unknown
    fn parse(tags: &str) -> Option<Self> {
        let mut record = Self::default();
        for tag in tags.split_whitespace() {
            match tag {
                NEW_FILE_TAG if !record.created_file => record.created_file = true,
                ADDED_LF_TAG if record.added_terminator.is_none() => {
                    record.added_terminator = Some(LineEnding::Lf);
                }
                ADDED_CRLF_TAG if record.added_terminator.is_none() => {
                    record.added_terminator = Some(LineEnding::CrLf);
                }
                _ => return None,
            }
        }
        Some(record)
    }

    fn tags(self) -> impl Iterator<Item = &'static str> {
        let created = self.created_file.then_some(NEW_FILE_TAG);
        let terminator = self.added_terminator.map(|eol| match eol {
            LineEnding::Lf => ADDED_LF_TAG,
            LineEnding::CrLf => ADDED_CRLF_TAG,
        });
        created.into_iter().chain(terminator)
    }
}

/// Byte offsets of a managed block within file content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockSpan {
    /// First byte of the start marker line
    start: usize,
    /// First byte after the end marker line, terminator included
    end: usize,
    /// First byte after the start marker line
    interior_start: usize,
    /// First byte of the end marker line
    interior_end: usize,
    record: InstallRecord,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    OutsideBlock,
    InsideBlock {
        line: usize,
        start: usize,
        interior_start: usize,
        record: InstallRecord,
    },
}

enum LineKind {
    Start(InstallRecord),
    End,
    Other,
}

/// Locates, inserts, updates and removes the managed block in a file
#[derive(Debug, Clone, Default)]
pub struct BlockEditor {
    markers: BlockMarkers,
}

impl BlockEditor {
    pub fn new(markers: BlockMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &BlockMarkers {
        &self.markers
    }

    /// Insert or replace the managed block in `path`
    ///
    /// Parent directories and the file are created when missing. A new block
    /// goes at the end of the file, after a line terminator if the file does
    /// not already end with one. Installing the same text twice leaves the
    /// file untouched the second time.
    pub fn install(&self, path: &Path, rendered: &str) -> Result<InstallOutcome, ShellError> {
        self.check_rendered(rendered)?;

        let existing = read_optional(path)?;
        let current = existing.as_deref().unwrap_or_default();
        let span = self.locate(path, current)?;
        let eol = LineEnding::detect(current);

        let (updated, outcome) = match span {
            Some(span) => {
                let block = self.compose(rendered, eol, span.record);
                let mut out = String::with_capacity(current.len() + block.len());
                out.push_str(&current[..span.start]);
                out.push_str(&block);
                out.push_str(&current[span.end..]);
                (out, InstallOutcome::Updated)
            }
            None => {
                let mut record = InstallRecord {
                    created_file: existing.is_none(),
                    added_terminator: None,
                };
                let mut out = String::with_capacity(current.len() + rendered.len() + 64);
                out.push_str(current);
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push_str(eol.as_str());
                    record.added_terminator = Some(eol);
                }
                out.push_str(&self.compose(rendered, eol, record));
                let outcome = if existing.is_some() {
                    InstallOutcome::Appended
                } else {
                    InstallOutcome::Created
                };
                (out, outcome)
            }
        };

        if existing.as_deref() == Some(updated.as_str()) {
            debug!("managed block in {} already up to date", path.display());
            return Ok(InstallOutcome::Unchanged);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ShellError::io(parent, e))?;
        }
        fs::write(path, updated).map_err(|e| ShellError::io(path, e))?;

        debug!("managed block in {}: {:?}", path.display(), outcome);
        Ok(outcome)
    }

    /// Remove the managed block from `path`
    ///
    /// A missing file or a file without a block is left alone. Whatever
    /// install recorded on the start marker is undone: the line terminator it
    /// added is dropped when the block is the last thing in the file, and a
    /// file install created is deleted when nothing else was added to it.
    pub fn uninstall(&self, path: &Path) -> Result<UninstallOutcome, ShellError> {
        let Some(current) = read_optional(path)? else {
            debug!("{} does not exist; nothing to uninstall", path.display());
            return Ok(UninstallOutcome::FileMissing);
        };
        let Some(span) = self.locate(path, &current)? else {
            debug!("no managed block in {}", path.display());
            return Ok(UninstallOutcome::NotInstalled);
        };

        let mut prefix = &current[..span.start];
        let suffix = &current[span.end..];
        if let Some(eol) = span.record.added_terminator
            && suffix.is_empty()
        {
            prefix = prefix.strip_suffix(eol.as_str()).unwrap_or(prefix);
        }

        let mut remaining = String::with_capacity(prefix.len() + suffix.len());
        remaining.push_str(prefix);
        remaining.push_str(suffix);

        if remaining.is_empty() && span.record.created_file {
            fs::remove_file(path).map_err(|e| ShellError::io(path, e))?;
            debug!("removed {}, which install had created", path.display());
        } else {
            fs::write(path, remaining).map_err(|e| ShellError::io(path, e))?;
        }

        debug!("removed managed block from {}", path.display());
        Ok(UninstallOutcome::Removed)
    }

    /// Text between the markers of an installed block, if any
    pub fn inspect(&self, path: &Path) -> Result<Option<String>, ShellError> {
        let Some(current) = read_optional(path)? else {
            return Ok(None);
        };
        let span = self.locate(path, &current)?;
        Ok(span.map(|span| current[span.interior_start..span.interior_end].to_string()))
    }

    /// Render `template` and stream the result to `writer` without markers
    pub fn write_to<W: Write>(
        &self,
        template: &str,
        bindings: &Bindings,
        mut writer: W,
    ) -> Result<(), ShellError> {
        let rendered = render(template, bindings)?;
        writer
            .write_all(rendered.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(ShellError::Output)
    }

    /// A rendered line that reads as a marker would corrupt the file
    fn check_rendered(&self, rendered: &str) -> Result<(), ShellError> {
        for (idx, line) in rendered.lines().enumerate() {
            if !matches!(self.classify(line), LineKind::Other) {
                return Err(ShellError::MarkerInContent { line: idx + 1 });
            }
        }
        Ok(())
    }

    fn compose(&self, rendered: &str, eol: LineEnding, record: InstallRecord) -> String {
        let eol = eol.as_str();
        let mut out = String::with_capacity(rendered.len() + 64);
        out.push_str(&self.markers.start);
        for tag in record.tags() {
            out.push(' ');
            out.push_str(tag);
        }
        out.push_str(eol);
        for line in rendered.lines() {
            out.push_str(line);
            out.push_str(eol);
        }
        out.push_str(&self.markers.end);
        out.push_str(eol);
        out
    }

    fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed == self.markers.end {
            return LineKind::End;
        }
        if let Some(tags) = trimmed.strip_prefix(self.markers.start.as_str())
            && (tags.is_empty() || tags.starts_with(char::is_whitespace))
            && let Some(record) = InstallRecord::parse(tags)
        {
            return LineKind::Start(record);
        }
        LineKind::Other
    }

    /// Single pass over the lines of `content` tracking whether we are inside
    /// the block. Any marker that does not pair up is a corrupted block.
    fn locate(&self, path: &Path, content: &str) -> Result<Option<BlockSpan>, ShellError> {
        let corrupted = |line: usize, defect: BlockDefect| ShellError::CorruptedBlock {
            path: path.to_path_buf(),
            line,
            defect,
        };

        let mut state = ScanState::OutsideBlock;
        let mut found: Option<BlockSpan> = None;
        let mut offset = 0;

        for (idx, raw) in content.split_inclusive('\n').enumerate() {
            let line = idx + 1;
            let line_start = offset;
            offset += raw.len();

            state = match (state, self.classify(raw)) {
                (ScanState::OutsideBlock, LineKind::Start(record)) => {
                    if found.is_some() {
                        return Err(corrupted(line, BlockDefect::Duplicate));
                    }
                    ScanState::InsideBlock {
                        line,
                        start: line_start,
                        interior_start: offset,
                        record,
                    }
                }
                (ScanState::OutsideBlock, LineKind::End) => {
                    return Err(corrupted(line, BlockDefect::UnexpectedEnd));
                }
                (ScanState::InsideBlock { .. }, LineKind::Start(_)) => {
                    return Err(corrupted(line, BlockDefect::NestedStart));
                }
                (
                    ScanState::InsideBlock {
                        start,
                        interior_start,
                        record,
                        ..
                    },
                    LineKind::End,
                ) => {
                    found = Some(BlockSpan {
                        start,
                        end: offset,
                        interior_start,
                        interior_end: line_start,
                        record,
                    });
                    ScanState::OutsideBlock
                }
                (state, LineKind::Other) => state,
            };
        }

        if let ScanState::InsideBlock { line, .. } = state {
            return Err(corrupted(line, BlockDefect::Unterminated));
        }

        Ok(found)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ShellError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ShellError::io(path, e)),
    }
}
