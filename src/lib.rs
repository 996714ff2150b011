//! Robot Commands
//!
//! Parses textual robot commands (`FORWARD`, `LEFT`, `RIGHT` and nestable
//! `REPEAT <N>` ... `END REPEAT` blocks) into an action tree that can be
//! replayed against any [`Robot`].
//!
//! This library provides:
//! - Command lexing and block-structured parsing
//! - The immutable action tree and its execution
//! - Bookkeeping robots for tracing and counting
//! - Configuration and output rendering for the `robot-cmd` binary

pub mod action;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod robot;

pub use action::Action;
pub use config::Config;
pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse_commands, parse_program, parse_program_with, ParseOptions, Parser};
pub use robot::{CallCounter, CallRecorder, Robot, RobotCall};
