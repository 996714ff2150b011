//! Command Lexer
//!
//! Splits a line into whitespace-delimited words and classifies them.
//! `REPEAT <N>` and `END REPEAT` are fused into single tokens.
//!
//! Classification never fails. Words that are not commands become
//! [`TokenKind::Unknown`] and the parser reports them when its scan reaches
//! them, so errors surface in input order.

use std::sync::LazyLock;

use regex::Regex;

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("count pattern is valid"));

/// Token types in a robot command sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Forward,
    Left,
    Right,
    /// `REPEAT <N>`; `count` is `None` when N is missing or not a valid
    /// non-negative integer
    Repeat { count: Option<u32> },
    EndRepeat,
    Unknown,
}

impl TokenKind {
    /// Any `REPEAT` opens a block for nesting purposes, even with a bad count
    pub fn opens_block(&self) -> bool {
        matches!(self, TokenKind::Repeat { .. })
    }
}

/// A classified token borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

/// A whitespace-delimited word of a line
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    /// Byte offset into the line
    start: usize,
    /// 1-based character column
    column: usize,
    text: &'a str,
}

impl Word<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Tokenize one line of commands
///
/// `line_no` is the 1-based line number recorded on each token.
pub fn tokenize_line(line: &str, line_no: usize) -> Vec<Token<'_>> {
    let words = split_words(line);
    let mut tokens = Vec::with_capacity(words.len());
    let mut idx = 0;

    while idx < words.len() {
        let word = words[idx];

        // Two-word forms consume the following word on the same line
        let (kind, end) = match word.text {
            "FORWARD" => (TokenKind::Forward, word.end()),
            "LEFT" => (TokenKind::Left, word.end()),
            "RIGHT" => (TokenKind::Right, word.end()),
            "REPEAT" => match words.get(idx + 1) {
                Some(arg) => {
                    idx += 1;
                    (
                        TokenKind::Repeat {
                            count: parse_count(arg.text),
                        },
                        arg.end(),
                    )
                }
                None => (TokenKind::Repeat { count: None }, word.end()),
            },
            "END" => match words.get(idx + 1) {
                Some(arg) if arg.text == "REPEAT" => {
                    idx += 1;
                    (TokenKind::EndRepeat, arg.end())
                }
                _ => (TokenKind::Unknown, word.end()),
            },
            _ => (TokenKind::Unknown, word.end()),
        };

        tokens.push(Token {
            kind,
            text: &line[word.start..end],
            line: line_no,
            column: word.column,
        });
        idx += 1;
    }

    tokens
}

/// Tokenize a whole program, line by line
pub fn tokenize_text(text: &str) -> Vec<Token<'_>> {
    text.lines()
        .enumerate()
        .flat_map(|(idx, line)| tokenize_line(line, idx + 1))
        .collect()
}

/// Parse a repeat count, rejecting signs, decimals and values that overflow
fn parse_count(word: &str) -> Option<u32> {
    if !COUNT_RE.is_match(word) {
        return None;
    }
    word.parse().ok()
}

/// Words of a line, located in a single pass
fn split_words(line: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    // (byte offset, column) of the word being read
    let mut current: Option<(usize, usize)> = None;

    for (column, (idx, ch)) in (1..).zip(line.char_indices()) {
        match (ch.is_whitespace(), current) {
            (true, Some((start, col))) => {
                words.push(Word {
                    start,
                    column: col,
                    text: &line[start..idx],
                });
                current = None;
            }
            (false, None) => current = Some((idx, column)),
            _ => {}
        }
    }
    if let Some((start, col)) = current {
        words.push(Word {
            start,
            column: col,
            text: &line[start..],
        });
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize_line(line, 1).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_simple_commands() {
        assert_eq!(
            kinds("FORWARD LEFT RIGHT"),
            vec![TokenKind::Forward, TokenKind::Left, TokenKind::Right]
        );
    }

    #[test]
    fn test_repeat_and_end_repeat_are_fused() {
        let tokens = tokenize_line("REPEAT 3 FORWARD END REPEAT", 4);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Repeat { count: Some(3) });
        assert_eq!(tokens[0].text, "REPEAT 3");
        assert_eq!(tokens[2].kind, TokenKind::EndRepeat);
        assert_eq!(tokens[2].text, "END REPEAT");
        assert_eq!((tokens[2].line, tokens[2].column), (4, 18));
    }

    #[test]
    fn test_repeat_count_preserves_inner_spacing() {
        let tokens = tokenize_line("  REPEAT   12", 1);
        assert_eq!(tokens[0].text, "REPEAT   12");
        assert_eq!(tokens[0].column, 3);
    }

    #[test]
    fn test_malformed_counts() {
        for line in ["REPEAT abc", "REPEAT -1", "REPEAT +2", "REPEAT 1.5", "REPEAT"] {
            assert_eq!(
                kinds(line),
                vec![TokenKind::Repeat { count: None }],
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_count_overflow_is_malformed() {
        assert_eq!(
            kinds("REPEAT 99999999999"),
            vec![TokenKind::Repeat { count: None }]
        );
    }

    #[test]
    fn test_count_accepts_u32_max_exactly() {
        assert_eq!(
            kinds("REPEAT 4294967295"),
            vec![TokenKind::Repeat {
                count: Some(u32::MAX)
            }]
        );
        assert_eq!(
            kinds("REPEAT 4294967296"),
            vec![TokenKind::Repeat { count: None }]
        );
    }

    #[test]
    fn test_long_single_line_columns() {
        let words = 100_000;
        let line = "FORWARD ".repeat(words);
        let tokens = tokenize_line(&line, 1);

        assert_eq!(tokens.len(), words);
        assert_eq!(tokens[1].column, 9);
        assert_eq!(tokens[words - 1].column, (words - 1) * 8 + 1);
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        let tokens = tokenize_line("é\u{3000}LEFT", 1);
        // U+3000 is whitespace, so "é" and "LEFT" are separate words
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "LEFT");
        assert_eq!(tokens[1].column, 3);
    }

    #[test]
    fn test_zero_count() {
        assert_eq!(kinds("REPEAT 0"), vec![TokenKind::Repeat { count: Some(0) }]);
    }

    #[test]
    fn test_lone_end_is_unknown() {
        assert_eq!(kinds("END"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("END FORWARD"), vec![TokenKind::Unknown, TokenKind::Forward]);
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(kinds("forward"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize_line("   \t ", 1).is_empty());
    }

    #[test]
    fn test_tokenize_text_tracks_lines() {
        let tokens = tokenize_text("FORWARD\n\n  LEFT\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[1].line, tokens[1].column), (3, 3));
    }

    #[test]
    fn test_repeat_count_must_share_the_line() {
        let tokens = tokenize_text("REPEAT\n2");
        assert_eq!(tokens[0].kind, TokenKind::Repeat { count: None });
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
    }
}
