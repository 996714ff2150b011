//! Command Parser
//!
//! Turns a flat token sequence into an [`Action`] tree. Each `REPEAT` block
//! is located by a balanced scan for its `END REPEAT`, then its body is
//! parsed as a sub-range of its own. Open blocks live on an explicit stack
//! rather than the call stack, so nesting depth is bounded by memory only.

pub mod lexer;

use crate::action::Action;
use crate::error::ParseError;

pub use lexer::{tokenize_line, tokenize_text, Token, TokenKind};

/// Parser limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open `REPEAT` blocks; `None` means
    /// unbounded
    ///
    /// Parsing, [`Action::apply`], `Display` and drop do not recurse, but the
    /// derived `Clone`, `Debug`, `PartialEq` and `Serialize` impls on
    /// [`Action`] use one stack frame per level. Set a limit when those are
    /// used on untrusted input.
    pub max_depth: Option<usize>,
}

/// A sub-range being parsed: the whole input, or the body of one `REPEAT`
#[derive(Debug)]
struct Block {
    actions: Vec<Action>,
    /// Exclusive end of the range: the block's `END REPEAT`, or the input end
    end: usize,
    count: u32,
}

/// Block-structured parser over a borrowed token slice
#[derive(Debug, Clone)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    options: ParseOptions,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: &'t [Token<'a>], options: ParseOptions) -> Self {
        Self { tokens, options }
    }

    /// Parse every token into a root [`Action::Sequence`]
    pub fn parse(&self) -> Result<Action, ParseError> {
        log::debug!("parsing {} tokens", self.tokens.len());

        // The bottom block is the whole input; every block above it is the
        // body of a REPEAT and holds no unmatched END REPEAT
        let mut blocks = vec![Block {
            actions: Vec::new(),
            end: self.tokens.len(),
            count: 0,
        }];
        let mut pos = 0;

        // The index of the innermost block is the number of open REPEATs
        while let Some(depth) = blocks.len().checked_sub(1) {
            let block = &mut blocks[depth];

            if pos == block.end {
                let body = Action::sequence(std::mem::take(&mut block.actions));
                let (count, end) = (block.count, block.end);
                blocks.truncate(depth);

                match blocks.last_mut() {
                    Some(parent) => {
                        parent.actions.push(Action::repeat(count, body));
                        // Skip the terminator
                        pos = end + 1;
                        continue;
                    }
                    None => return Ok(body),
                }
            }

            let token = &self.tokens[pos];
            match token.kind {
                TokenKind::Forward => block.actions.push(Action::MoveForward),
                TokenKind::Left => block.actions.push(Action::TurnLeft),
                TokenKind::Right => block.actions.push(Action::TurnRight),
                TokenKind::Repeat { count } => {
                    let count = count.ok_or_else(|| ParseError::MalformedRepeatCount {
                        token: token.text.to_string(),
                        line: token.line,
                        column: token.column,
                    })?;

                    if let Some(limit) = self.options.max_depth.filter(|&limit| depth >= limit) {
                        return Err(ParseError::NestingTooDeep {
                            token: token.text.to_string(),
                            limit,
                            line: token.line,
                            column: token.column,
                        });
                    }

                    let close = self.find_matching_end(pos + 1, block.end).ok_or_else(|| {
                        ParseError::UnterminatedRepeat {
                            token: token.text.to_string(),
                            line: token.line,
                            column: token.column,
                        }
                    })?;

                    log::trace!(
                        "repeat x{} at {}:{} spans tokens {}..{}",
                        count,
                        token.line,
                        token.column,
                        pos + 1,
                        close
                    );

                    blocks.push(Block {
                        actions: Vec::new(),
                        end: close,
                        count,
                    });
                }
                // The block scan always consumes the terminator of an
                // enclosing REPEAT, so any END REPEAT seen here is spurious
                TokenKind::EndRepeat => {
                    return Err(ParseError::UnmatchedEndRepeat {
                        line: token.line,
                        column: token.column,
                    });
                }
                TokenKind::Unknown => {
                    return Err(ParseError::UnknownCommand {
                        token: token.text.to_string(),
                        line: token.line,
                        column: token.column,
                    });
                }
            }
            pos += 1;
        }

        // The bottom block is only popped by the return above
        Ok(Action::default())
    }

    /// Index of the `END REPEAT` closing a block whose body starts at
    /// `start`, searching no further than `end`
    fn find_matching_end(&self, start: usize, end: usize) -> Option<usize> {
        let mut depth = 1usize;

        for (idx, token) in self.tokens[start..end].iter().enumerate() {
            if token.kind.opens_block() {
                depth += 1;
            } else if token.kind == TokenKind::EndRepeat {
                depth -= 1;
                if depth == 0 {
                    return Some(start + idx);
                }
            }
        }

        None
    }
}

/// Parse commands given one string per element
///
/// Each element is trimmed and may hold several whitespace-separated
/// commands; empty elements are skipped. Positions in errors use the
/// element index (1-based) as the line number.
pub fn parse_commands<S: AsRef<str>>(commands: &[S]) -> Result<Action, ParseError> {
    let tokens: Vec<Token<'_>> = commands
        .iter()
        .enumerate()
        .flat_map(|(idx, command)| tokenize_line(command.as_ref(), idx + 1))
        .collect();
    Parser::new(&tokens).parse()
}

/// Parse a program text
pub fn parse_program(text: &str) -> Result<Action, ParseError> {
    parse_program_with(text, ParseOptions::default())
}

/// Parse a program text with explicit [`ParseOptions`]
pub fn parse_program_with(text: &str, options: ParseOptions) -> Result<Action, ParseError> {
    let tokens = tokenize_text(text);
    Parser::with_options(&tokens, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_parse_flat_sequence() {
        let tree = parse_program("FORWARD LEFT RIGHT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![Action::MoveForward, Action::TurnLeft, Action::TurnRight])
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_program("").unwrap(), Action::default());
        assert_eq!(parse_commands::<&str>(&[]).unwrap(), Action::default());
    }

    #[test]
    fn test_parse_repeat_block() {
        let tree = parse_program("REPEAT 3 FORWARD RIGHT END REPEAT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![Action::repeat(
                3,
                Action::sequence(vec![Action::MoveForward, Action::TurnRight])
            )])
        );
    }

    #[test]
    fn test_parse_sibling_blocks() {
        let tree = parse_program("REPEAT 2 LEFT END REPEAT REPEAT 4 RIGHT END REPEAT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![
                Action::repeat(2, Action::sequence(vec![Action::TurnLeft])),
                Action::repeat(4, Action::sequence(vec![Action::TurnRight])),
            ])
        );
    }

    #[test]
    fn test_nested_block_closes_at_matching_terminator() {
        let tree =
            parse_program("REPEAT 2 REPEAT 3 FORWARD END REPEAT LEFT END REPEAT RIGHT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![
                Action::repeat(
                    2,
                    Action::sequence(vec![
                        Action::repeat(3, Action::sequence(vec![Action::MoveForward])),
                        Action::TurnLeft,
                    ])
                ),
                Action::TurnRight,
            ])
        );
    }

    #[test]
    fn test_empty_repeat_body() {
        let tree = parse_program("REPEAT 5 END REPEAT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![Action::repeat(5, Action::default())])
        );
    }

    #[test]
    fn test_parse_commands_skips_empty_elements() {
        let tree = parse_commands(&["FORWARD", "", "   ", "REPEAT 2", "LEFT", "END REPEAT"]).unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![
                Action::MoveForward,
                Action::repeat(2, Action::sequence(vec![Action::TurnLeft])),
            ])
        );
    }

    #[test]
    fn test_unterminated_repeat_points_at_opener() {
        let err = parse_commands(&["FORWARD", "REPEAT 2", "FORWARD"]).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnterminatedRepeat);
        assert_eq!(err.position(), (2, 1));
    }

    #[test]
    fn test_inner_unterminated_repeat() {
        // The only END REPEAT closes the inner block, leaving the outer open
        let err = parse_program("REPEAT 2 REPEAT 3 FORWARD END REPEAT").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnterminatedRepeat);
        assert_eq!(err.position(), (1, 1));
    }

    #[test]
    fn test_end_repeat_after_closed_block_is_unmatched() {
        let err = parse_program("REPEAT 2 FORWARD END REPEAT END REPEAT").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnmatchedEndRepeat);
        assert_eq!(err.position(), (1, 29));
    }

    #[test]
    fn test_first_error_in_scan_order_wins() {
        let err = parse_program("JUMP END REPEAT").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnknownCommand);

        let err = parse_program("END REPEAT JUMP").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnmatchedEndRepeat);
    }

    #[test]
    fn test_malformed_nested_repeat_still_balances() {
        let err = parse_program("REPEAT 2 REPEAT x LEFT END REPEAT END REPEAT").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MalformedRepeatCount);
        assert_eq!(err.position(), (1, 10));
    }

    #[test]
    fn test_count_range_ends_at_u32_max() {
        let tree = parse_program("REPEAT 4294967295 END REPEAT").unwrap();
        assert_eq!(
            tree,
            Action::sequence(vec![Action::repeat(u32::MAX, Action::default())])
        );

        let err = parse_program("REPEAT 4294967296 FORWARD END REPEAT").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedRepeatCount {
                token: "REPEAT 4294967296".to_string(),
                line: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn test_unknown_command_inside_block() {
        let err = parse_program("REPEAT 2\n  FORWARD\n  BACK\nEND REPEAT").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownCommand {
                token: "BACK".to_string(),
                line: 3,
                column: 3,
            }
        );
    }

    #[test]
    fn test_max_depth_limit() {
        let options = ParseOptions { max_depth: Some(1) };
        assert!(parse_program_with("REPEAT 2 FORWARD END REPEAT", options).is_ok());

        let err = parse_program_with(
            "REPEAT 2 REPEAT 2 FORWARD END REPEAT END REPEAT",
            options,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                token: "REPEAT 2".to_string(),
                limit: 1,
                line: 1,
                column: 10,
            }
        );
    }

    #[test]
    fn test_zero_max_depth_rejects_any_repeat() {
        let options = ParseOptions { max_depth: Some(0) };
        let err = parse_program_with("REPEAT 1 END REPEAT", options).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::NestingTooDeep);
        assert!(parse_program_with("FORWARD", options).is_ok());
    }
}
