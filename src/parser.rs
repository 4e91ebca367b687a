//! Structural parsing of a command line.
//!
//! Everything here works on raw text: the line is cut into `;` statements,
//! `|` stages, backtick substitution spans and `<`/`>` redirection clauses.
//! All cuts go through one scanner that knows about quoting, so an operator
//! character inside quotes or inside a backtick span is ordinary text.
//! Tokenizing the remaining command text is left to the [`lexer`](crate::lexer)
//! at execution time, because glob results depend on the working directory
//! at the moment the invocation runs.

use crate::error::ShellError;
use crate::lexer;
use std::ops::Range;

/// AST node for one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// `;`-separated statements, executed in order. Blank statements are dropped.
    Sequence(Vec<AstNode>),

    /// `|`-separated stages; each stage's output is the next one's input data.
    Pipeline(Vec<AstNode>),

    /// A stage containing backtick spans. It is re-parsed after the spans
    /// have been evaluated and spliced into its text.
    Substitution(Substitution),

    /// A single invocation with its redirections stripped out.
    Command(CommandNode),
}

/// Stage text together with the pre-parsed bodies of its backtick spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Outermost spans, left to right, non-overlapping.
    pub spans: Vec<SubstitutionSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionSpan {
    /// Byte range in [`Substitution::text`], backticks included.
    pub range: Range<usize>,
    pub body: AstNode,
}

/// Command text without its redirection clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandNode {
    pub text: String,
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
    Backtick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Plain,
    Open(Quote),
    Close(Quote),
}

/// Advances the quote stack by one character.
///
/// Single quotes are opaque. Double quotes may contain backtick spans, and a
/// backtick span may contain quotes of either kind.
fn step(stack: &mut Vec<Quote>, ch: char) -> Step {
    let opened = match (stack.last().copied(), ch) {
        (Some(q @ Quote::Single), '\'')
        | (Some(q @ Quote::Double), '"')
        | (Some(q @ Quote::Backtick), '`') => {
            stack.pop();
            return Step::Close(q);
        }
        (Some(Quote::Single), _) => return Step::Plain,
        (Some(Quote::Double), '`') => Quote::Backtick,
        (Some(Quote::Double), _) => return Step::Plain,
        (_, '\'') => Quote::Single,
        (_, '"') => Quote::Double,
        (None, '`') => Quote::Backtick,
        _ => return Step::Plain,
    };
    stack.push(opened);
    Step::Open(opened)
}

#[derive(Debug, Clone, Copy)]
struct Event {
    index: usize,
    ch: char,
    /// No quote or span was open before this character.
    top_level: bool,
    step: Step,
    /// A backtick span is still open after this character.
    in_backtick: bool,
}

fn scan(line: &str) -> Result<Vec<Event>, ShellError> {
    let mut stack = Vec::new();
    let mut events = Vec::with_capacity(line.len());
    for (index, ch) in line.char_indices() {
        let top_level = stack.is_empty();
        let step = step(&mut stack, ch);
        events.push(Event {
            index,
            ch,
            top_level,
            step,
            in_backtick: stack.contains(&Quote::Backtick),
        });
    }
    match stack.last() {
        None => Ok(events),
        Some(Quote::Backtick) => Err(ShellError::Syntax(
            "unterminated command substitution".to_string(),
        )),
        Some(_) => Err(ShellError::Syntax("unterminated quote".to_string())),
    }
}

fn is_operator(event: &Event, ops: &[char]) -> bool {
    event.top_level && event.step == Step::Plain && ops.contains(&event.ch)
}

/// Splits `line` on every top-level occurrence of `sep`.
fn split_top_level(line: &str, sep: char) -> Result<Vec<&str>, ShellError> {
    let mut parts = Vec::new();
    let mut start = 0;
    for event in scan(line)? {
        if is_operator(&event, &[sep]) {
            parts.push(&line[start..event.index]);
            start = event.index + event.ch.len_utf8();
        }
    }
    parts.push(&line[start..]);
    Ok(parts)
}

/// Splits a line into its `;`-separated statements.
pub fn split_statements(line: &str) -> Result<Vec<&str>, ShellError> {
    split_top_level(line, ';')
}

/// Byte ranges of the outermost backtick spans in `line`, backticks included.
pub fn substitution_spans(line: &str) -> Result<Vec<Range<usize>>, ShellError> {
    let mut spans = Vec::new();
    let mut start = None;
    for event in scan(line)? {
        match event.step {
            Step::Open(Quote::Backtick) if start.is_none() => start = Some(event.index),
            Step::Close(Quote::Backtick) if !event.in_backtick => {
                if let Some(s) = start.take() {
                    spans.push(s..event.index + 1);
                }
            }
            _ => {}
        }
    }
    Ok(spans)
}

/// Parse a whole command line.
///
/// The entire line is checked before anything is returned, so a syntax error
/// anywhere means nothing from the line runs.
pub fn parse_line(line: &str) -> Result<AstNode, ShellError> {
    let statements = split_statements(line)?
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(parse_statement)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AstNode::Sequence(statements))
}

fn parse_statement(text: &str) -> Result<AstNode, ShellError> {
    let stages = split_top_level(text, '|')?;
    if stages.len() == 1 {
        return parse_stage(text);
    }
    if stages.iter().any(|s| s.trim().is_empty()) {
        return Err(ShellError::Syntax("empty command in pipeline".to_string()));
    }
    let stages = stages
        .into_iter()
        .map(parse_stage)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AstNode::Pipeline(stages))
}

fn parse_stage(text: &str) -> Result<AstNode, ShellError> {
    let ranges = substitution_spans(text)?;
    if ranges.is_empty() {
        return parse_redirections(text).map(AstNode::Command);
    }

    // Check the text around the spans now, with each span standing in as one word.
    let mut template = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(ranges.len());
    let mut cursor = 0;
    for range in ranges {
        template.push_str(&text[cursor..range.start]);
        template.push('x');
        let body = parse_line(&text[range.start + 1..range.end - 1])?;
        cursor = range.end;
        spans.push(SubstitutionSpan { range, body });
    }
    template.push_str(&text[cursor..]);
    parse_redirections(&template)?;

    Ok(AstNode::Substitution(Substitution {
        text: text.to_string(),
        spans,
    }))
}

/// Extracts `<PATH` and `>PATH` clauses from a single invocation.
///
/// The first word after a symbol is its target; anything after that word
/// stays part of the command, so `< in.txt cat` and `cat < in.txt` are the
/// same invocation. At most one clause of each kind is allowed.
pub fn parse_redirections(text: &str) -> Result<CommandNode, ShellError> {
    let marks: Vec<(usize, char)> = scan(text)?
        .into_iter()
        .filter(|e| is_operator(e, &['<', '>']))
        .map(|e| (e.index, e.ch))
        .collect();

    let Some(&(first, _)) = marks.first() else {
        return Ok(CommandNode {
            text: text.trim().to_string(),
            ..CommandNode::default()
        });
    };

    let mut node = CommandNode {
        text: text[..first].trim().to_string(),
        ..CommandNode::default()
    };

    for (i, &(index, symbol)) in marks.iter().enumerate() {
        let end = marks.get(i + 1).map_or(text.len(), |&(next, _)| next);
        let (word, rest) = split_first_word(&text[index + 1..end])?;
        let target = lexer::split_words(word)?.concat();
        if target.is_empty() {
            return Err(ShellError::Syntax(format!(
                "missing file name after '{symbol}'"
            )));
        }

        let (slot, kind) = if symbol == '<' {
            (&mut node.input, "input")
        } else {
            (&mut node.output, "output")
        };
        if slot.is_some() {
            return Err(ShellError::Syntax(format!(
                "more than one {kind} redirection"
            )));
        }
        *slot = Some(target);

        let rest = rest.trim();
        if !rest.is_empty() {
            if !node.text.is_empty() {
                node.text.push(' ');
            }
            node.text.push_str(rest);
        }
    }
    Ok(node)
}

fn split_first_word(s: &str) -> Result<(&str, &str), ShellError> {
    let s = s.trim_start();
    let end = scan(s)?
        .into_iter()
        .find(|e| e.top_level && e.ch.is_whitespace())
        .map_or(s.len(), |e| e.index);
    Ok((&s[..end], &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(text: &str) -> AstNode {
        AstNode::Command(CommandNode {
            text: text.to_string(),
            ..CommandNode::default()
        })
    }

    fn syntax_error(line: &str) -> String {
        match parse_line(line) {
            Err(ShellError::Syntax(msg)) => msg,
            other => panic!("expected syntax error for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_statements_split_on_semicolon_outside_quotes() {
        assert_eq!(
            split_statements("echo a; echo ';' ; echo \"b;c\"").unwrap(),
            ["echo a", " echo ';' ", " echo \"b;c\""]
        );
    }

    #[test]
    fn test_blank_statements_are_dropped() {
        assert_eq!(
            parse_line("echo a;  ; echo b;").unwrap(),
            AstNode::Sequence(vec![cmd("echo a"), cmd("echo b")])
        );
        assert_eq!(parse_line("").unwrap(), AstNode::Sequence(vec![]));
    }

    #[test]
    fn test_pipeline_stages() {
        assert_eq!(
            parse_line("cat f1 f2 | sort | uniq").unwrap(),
            AstNode::Sequence(vec![AstNode::Pipeline(vec![
                cmd("cat f1 f2"),
                cmd("sort"),
                cmd("uniq"),
            ])])
        );
    }

    #[test]
    fn test_quoted_pipe_is_not_an_operator() {
        assert_eq!(
            parse_line("echo 'a|b'").unwrap(),
            AstNode::Sequence(vec![cmd("echo 'a|b'")])
        );
    }

    #[test]
    fn test_empty_pipeline_stage_is_rejected() {
        assert_eq!(syntax_error("echo a |"), "empty command in pipeline");
        assert_eq!(syntax_error("| cat"), "empty command in pipeline");
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_eq!(syntax_error("echo \"Hello, World!"), "unterminated quote");
        assert_eq!(syntax_error("echo ok; echo 'x"), "unterminated quote");
        assert_eq!(syntax_error("echo `echo a"), "unterminated command substitution");
    }

    #[test]
    fn test_semicolon_inside_substitution_stays_in_span() {
        let ast = parse_line("echo `echo foo; echo bar`").unwrap();
        let AstNode::Sequence(statements) = ast else {
            panic!("expected sequence");
        };
        assert_eq!(statements.len(), 1);
        let AstNode::Substitution(sub) = &statements[0] else {
            panic!("expected substitution, got {:?}", statements[0]);
        };
        assert_eq!(sub.spans.len(), 1);
        assert_eq!(&sub.text[sub.spans[0].range.clone()], "`echo foo; echo bar`");
        assert_eq!(
            sub.spans[0].body,
            AstNode::Sequence(vec![cmd("echo foo"), cmd("echo bar")])
        );
    }

    #[test]
    fn test_backticks_inside_double_quotes_are_spans() {
        let line = r#"echo "a `echo "b"`""#;
        assert_eq!(
            substitution_spans(line).unwrap(),
            vec![8..18]
        );
        assert_eq!(&line[8..18], r#"`echo "b"`"#);
    }

    #[test]
    fn test_backticks_inside_single_quotes_are_literal() {
        assert!(substitution_spans("echo '`date`'").unwrap().is_empty());
    }

    #[test]
    fn test_multiple_spans_in_order() {
        let line = "echo `echo a` and `echo b`";
        let spans = substitution_spans(line).unwrap();
        let texts: Vec<&str> = spans.iter().map(|r| &line[r.clone()]).collect();
        assert_eq!(texts, ["`echo a`", "`echo b`"]);
    }

    #[test]
    fn test_nested_span_belongs_to_outer_one() {
        let line = r#"echo `echo "`echo x`"`"#;
        let spans = substitution_spans(line).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(&line[spans[0].clone()], r#"`echo "`echo x`"`"#);
    }

    #[test]
    fn test_redirections_are_extracted() {
        assert_eq!(
            parse_redirections("sort -r < in.txt > out.txt").unwrap(),
            CommandNode {
                text: "sort -r".to_string(),
                input: Some("in.txt".to_string()),
                output: Some("out.txt".to_string()),
            }
        );
    }

    #[test]
    fn test_leading_input_redirection() {
        assert_eq!(
            parse_redirections("< in.txt cat -n").unwrap(),
            CommandNode {
                text: "cat -n".to_string(),
                input: Some("in.txt".to_string()),
                output: None,
            }
        );
    }

    #[test]
    fn test_redirection_without_spaces_and_quoted_target() {
        let node = parse_redirections("echo hi >'my file.txt'").unwrap();
        assert_eq!(node.text, "echo hi");
        assert_eq!(node.output.as_deref(), Some("my file.txt"));

        let node = parse_redirections("cat <in.txt").unwrap();
        assert_eq!(node.input.as_deref(), Some("in.txt"));
    }

    #[test]
    fn test_quoted_redirection_symbols_are_literal() {
        assert_eq!(
            parse_redirections("echo \"a > b\" '<'").unwrap(),
            CommandNode {
                text: "echo \"a > b\" '<'".to_string(),
                ..CommandNode::default()
            }
        );
    }

    #[test]
    fn test_redirection_cardinality() {
        assert_eq!(
            syntax_error("< input1.txt < input2.txt"),
            "more than one input redirection"
        );
        assert_eq!(
            syntax_error("> output1.txt > output2.txt"),
            "more than one output redirection"
        );
        assert_eq!(syntax_error("echo a >> log"), "missing file name after '>'");
    }

    #[test]
    fn test_missing_redirection_target() {
        assert_eq!(syntax_error("cat <"), "missing file name after '<'");
    }

    #[test]
    fn test_malformed_line_fails_before_any_statement() {
        // The broken redirection is in the last statement; the whole line is rejected.
        assert!(parse_line("echo a; echo b; cat < x < y").is_err());
        // Same for a broken clause next to a substitution.
        assert!(parse_line("echo `echo a` > o1 > o2").is_err());
    }
}
