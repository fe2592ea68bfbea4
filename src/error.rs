//! Error types for VM translation.
//!
//! Translation errors carry the module name and the 1-based source line so
//! messages point straight at the offending instruction.

use thiserror::Error;

use crate::memory::SegmentIndexError;

/// VM translation error with module/line context.
#[derive(Error, Debug)]
pub enum VMError {
    // Instruction shape errors
    #[error("{module}:{line}: malformed index: {value}")]
    MalformedIndex {
        line: usize,
        module: String,
        value: String,
    },

    #[error("{module}:{line}: unknown segment: {segment}")]
    UnknownSegment {
        line: usize,
        module: String,
        segment: String,
    },

    #[error("{module}:{line}: {source}")]
    IndexOutOfRange {
        line: usize,
        module: String,
        #[source]
        source: SegmentIndexError,
    },

    #[error("{module}:{line}: cannot pop to constant segment")]
    PopToConstant { line: usize, module: String },

    #[error("{module}:{line}: missing argument for {command}")]
    MissingArgument {
        line: usize,
        module: String,
        command: String,
    },

    #[error("{module}:{line}: unexpected argument '{argument}' for {command}")]
    UnexpectedArgument {
        line: usize,
        module: String,
        command: String,
        argument: String,
    },

    #[error("{module}:{line}: invalid symbol name: {name}")]
    InvalidSymbol {
        line: usize,
        module: String,
        name: String,
    },

    #[error("{module}:{line}: reserved symbol name: {name}")]
    ReservedSymbol {
        line: usize,
        module: String,
        name: String,
    },

    #[error("{module}:{line}: unknown instruction [{instruction}]")]
    UnknownInstruction {
        line: usize,
        module: String,
        instruction: String,
    },

    // Orchestration errors
    #[error("invalid module name '{name}': must be a non-empty assembly symbol without '.' or '$'")]
    InvalidModuleName { name: String },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files found in directory: {path}")]
    NoVmFiles { path: String },

    #[error("path is not a .vm file or directory: {path}")]
    InvalidPath { path: String },
}

impl VMError {
    /// Source line of a translation error, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            VMError::MalformedIndex { line, .. }
            | VMError::UnknownSegment { line, .. }
            | VMError::IndexOutOfRange { line, .. }
            | VMError::PopToConstant { line, .. }
            | VMError::MissingArgument { line, .. }
            | VMError::UnexpectedArgument { line, .. }
            | VMError::InvalidSymbol { line, .. }
            | VMError::ReservedSymbol { line, .. }
            | VMError::UnknownInstruction { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias for VM operations.
pub type Result<T> = std::result::Result<T, VMError>;
