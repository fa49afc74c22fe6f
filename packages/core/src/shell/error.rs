//! Shell integration error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// How the managed block markers in a file are malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDefect {
    /// A start marker was found with no end marker before end of file
    Unterminated,
    /// An end marker appeared outside of a block
    UnexpectedEnd,
    /// A start marker appeared inside an open block
    NestedStart,
    /// A second complete block follows the first one
    Duplicate,
}

impl fmt::Display for BlockDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BlockDefect::Unterminated => "start marker has no matching end marker",
            BlockDefect::UnexpectedEnd => "end marker without a preceding start marker",
            BlockDefect::NestedStart => "start marker inside an already open block",
            BlockDefect::Duplicate => "more than one managed block",
        };
        f.write_str(text)
    }
}

/// Errors from rendering templates and editing shell startup files
#[derive(Debug, Error)]
pub enum ShellError {
    /// Template references a placeholder that has no binding
    #[error("template placeholder '{name}' has no value")]
    MissingBinding { name: String },

    /// Start/end markers in the target file do not pair up
    #[error("managed block in {} is corrupted at line {line}: {defect}", path.display())]
    CorruptedBlock {
        path: PathBuf,
        line: usize,
        defect: BlockDefect,
    },

    /// A rendered script line would be read back as a block marker
    #[error("line {line} of the rendered script is a managed block marker")]
    MarkerInContent { line: usize },

    /// Creating, reading or writing the target file failed
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Streaming a rendered script to its output failed
    #[error("failed to write rendered script: {0}")]
    Output(#[source] std::io::Error),

    /// No template is registered for this shell
    #[error("unsupported shell: {0}")]
    UnsupportedShell(String),
}

impl ShellError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShellError::Io {
            path: path.into(),
            source,
        }
    }
}
