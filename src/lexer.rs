//! Lexical analysis of a single command invocation into argument tokens.
//!
//! The input has already had `;`, `|`, backtick spans and redirection clauses
//! removed by the parser; what is left is a command name followed by its
//! arguments, possibly quoted and possibly containing glob patterns.

use crate::error::ShellError;
use glob::MatchOptions;
use std::path::Path;

/// A token before glob expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawToken {
    text: String,
    /// Set as soon as any part of the token came from a quoted span.
    quoted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    current: Option<RawToken>,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            current: None,
        }
    }

    /// Runs the machine over the whole input.
    ///
    /// Whitespace outside quotes separates tokens; a quoted span contributes its
    /// exact contents to the token it touches, so `a"b"c` is the single token `abc`.
    fn make_tokens(&mut self) -> Result<Vec<RawToken>, ShellError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingSingleQuote => self.handle_quoted(ch, '\''),
                LexingState::ReadingDoubleQuote => self.handle_quoted(ch, '"'),
            }
        }

        match self.state {
            LexingState::ReadingSingleQuote | LexingState::ReadingDoubleQuote => {
                return Err(ShellError::Syntax("unterminated quote".to_string()));
            }
            _ => {}
        }

        out.extend(self.current.take());
        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn token(&mut self) -> &mut RawToken {
        self.current.get_or_insert_with(|| RawToken {
            text: String::new(),
            quoted: false,
        })
    }

    fn open_quote(&mut self, ch: char) {
        self.token().quoted = true;
        self.state = if ch == '\'' {
            LexingState::ReadingSingleQuote
        } else {
            LexingState::ReadingDoubleQuote
        };
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '\'' | '"' => self.open_quote(ch),
            c => {
                self.token().text.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<RawToken>) {
        match ch {
            c if c.is_whitespace() => {
                out.extend(self.current.take());
                self.state = LexingState::Start;
            }
            '\'' | '"' => self.open_quote(ch),
            c => self.token().text.push(c),
        }
    }

    fn handle_quoted(&mut self, ch: char, closing: char) {
        if ch == closing {
            self.state = LexingState::ReadingWord;
        } else {
            self.token().text.push(ch);
        }
    }
}

/// Splits `line` into words, resolving quotes but without glob expansion.
pub fn split_words(line: &str) -> Result<Vec<String>, ShellError> {
    let tokens = LexingFSM::new(line).make_tokens()?;
    Ok(tokens.into_iter().map(|t| t.text).collect())
}

/// Splits `line` into the argument vector of one invocation.
///
/// Unquoted tokens that look like glob patterns are matched against the
/// filesystem relative to `cwd`; each match becomes its own token. A pattern
/// without matches is kept literally.
pub fn split_into_tokens(line: &str, cwd: &Path) -> Result<Vec<String>, ShellError> {
    let tokens = LexingFSM::new(line).make_tokens()?;
    let mut args = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.quoted {
            args.push(token.text);
        } else {
            args.extend(expand_glob(&token.text, cwd));
        }
    }
    Ok(args)
}

/// Expands a glob pattern relative to `cwd`.
///
/// Relative patterns yield relative paths, absolute patterns absolute ones.
/// Hidden entries only match a pattern that spells out the leading dot.
pub fn expand_glob(pattern: &str, cwd: &Path) -> Vec<String> {
    if !pattern.contains(|c| matches!(c, '*' | '?' | '[')) {
        return vec![pattern.to_string()];
    }

    let absolute = Path::new(pattern).is_absolute();
    let full_pattern = if absolute {
        pattern.to_string()
    } else {
        let base = glob::Pattern::escape(&cwd.to_string_lossy());
        format!("{}/{}", base.trim_end_matches('/'), pattern)
    };

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let paths = match glob::glob_with(&full_pattern, options) {
        Ok(paths) => paths,
        Err(_) => return vec![pattern.to_string()],
    };

    let matches: Vec<String> = paths
        .filter_map(Result::ok)
        .map(|p| {
            let shown = if absolute {
                p.as_path()
            } else {
                p.strip_prefix(cwd).unwrap_or(&p)
            };
            shown.to_string_lossy().into_owned()
        })
        .collect();

    if matches.is_empty() {
        vec![pattern.to_string()]
    } else {
        matches
    }
}
