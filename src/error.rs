//! Parse errors
//!
//! Every error is fatal: parsing stops at the first one found in scan order.

/// The failure category of a [`ParseError`], without position information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnknownCommand,
    MalformedRepeatCount,
    UnterminatedRepeat,
    UnmatchedEndRepeat,
    NestingTooDeep,
}

/// Error produced when a command sequence cannot be turned into an action tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command \"{token}\" at {line}:{column}")]
    UnknownCommand {
        token: String,
        line: usize,
        column: usize,
    },
    #[error("invalid repeat count in \"{token}\" at {line}:{column} (expected a non-negative integer)")]
    MalformedRepeatCount {
        token: String,
        line: usize,
        column: usize,
    },
    #[error("missing END REPEAT for \"{token}\" at {line}:{column}")]
    UnterminatedRepeat {
        token: String,
        line: usize,
        column: usize,
    },
    #[error("END REPEAT at {line}:{column} has no matching REPEAT")]
    UnmatchedEndRepeat { line: usize, column: usize },
    #[error("\"{token}\" at {line}:{column} exceeds the maximum nesting depth of {limit}")]
    NestingTooDeep {
        token: String,
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::UnknownCommand { .. } => ParseErrorKind::UnknownCommand,
            ParseError::MalformedRepeatCount { .. } => ParseErrorKind::MalformedRepeatCount,
            ParseError::UnterminatedRepeat { .. } => ParseErrorKind::UnterminatedRepeat,
            ParseError::UnmatchedEndRepeat { .. } => ParseErrorKind::UnmatchedEndRepeat,
            ParseError::NestingTooDeep { .. } => ParseErrorKind::NestingTooDeep,
        }
    }

    /// 1-based `(line, column)` of the offending token
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::UnknownCommand { line, column, .. }
            | ParseError::MalformedRepeatCount { line, column, .. }
            | ParseError::UnterminatedRepeat { line, column, .. }
            | ParseError::UnmatchedEndRepeat { line, column }
            | ParseError::NestingTooDeep { line, column, .. } => (*line, *column),
        }
    }
}
