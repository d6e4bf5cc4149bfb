// Bracket-aware scanning for the parts of the source kept as text

use nom::{
    error::{Error, ErrorKind},
    IResult,
};

use crate::syntax::{CodeBlock, Stmt};

/// Byte length of the string literal at the start of `input`
fn string_literal_len(input: &str) -> usize {
    if let Some(body) = input.strip_prefix("\"\"\"") {
        return match body.find("\"\"\"") {
            Some(end) => end + 6,
            None => input.len(),
        };
    }

    let mut escaped = false;
    for (i, c) in input.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return i + 1,
            '\n' => return i,
            _ => {}
        }
    }
    input.len()
}

/// Walk `input` until `stop` accepts a character at bracket depth zero.
/// String literals and comments are skipped whole. Returns `(rest, taken)`.
pub(super) fn scan_until<'a>(
    input: &'a str,
    mut stop: impl FnMut(char, &'a str) -> bool,
) -> (&'a str, &'a str) {
    let mut depth = 0usize;
    let mut i = 0;

    while let Some(c) = input[i..].chars().next() {
        let rest = &input[i..];
        if depth == 0 && stop(c, rest) {
            return (rest, &input[..i]);
        }
        match c {
            '"' => {
                i += string_literal_len(rest);
                continue;
            }
            '/' if rest.starts_with("//") => {
                i += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            '/' if rest.starts_with("/*") => {
                i += rest.find("*/").map(|end| end + 2).unwrap_or(rest.len());
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += c.len_utf8();
    }

    (&input[input.len()..], input)
}

/// `open ... close` with nesting; yields the text between the delimiters
pub(super) fn delimited_group<'a>(
    open: char,
    close: char,
) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let Some(inside) = input.strip_prefix(open) else {
            return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
        };
        let (rest, inner) = scan_until(inside, |c, _| c == close);
        match rest.strip_prefix(close) {
            Some(after) => Ok((after, inner)),
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Char))),
        }
    }
}

/// Generic parameter clause `<...>`; `->` inside does not close it
pub(super) fn angle_group(input: &str) -> IResult<&str, &str> {
    let Some(inside) = input.strip_prefix('<') else {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    };

    let mut depth = 0usize;
    for (i, c) in inside.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if inside[..i].ends_with('-') => {}
            '>' if depth == 0 => return Ok((&inside[i + 1..], &inside[..i])),
            '>' => depth -= 1,
            '{' | '\n' => break,
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

pub(super) fn starts_with_word(input: &str, word: &str) -> bool {
    input.strip_prefix(word).is_some_and(|rest| {
        !rest
            .chars()
            .next()
            .is_some_and(|c| c == '_' || c.is_alphanumeric())
    })
}

fn leading_indent(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Drop up to `width` spaces or tabs from the start of `line`
pub(super) fn strip_indent(line: &str, width: usize) -> &str {
    &line[leading_indent(line).min(width)..]
}

/// Turn the text between braces into one raw statement per line, with
/// indentation made relative to the least indented line.
pub(super) fn block_lines(body: &str) -> CodeBlock {
    let mut lines = body.lines();
    let head = lines.next().unwrap_or("").trim();
    let tail: Vec<&str> = lines.collect();
    let indent = tail
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_indent(line))
        .min()
        .unwrap_or(0);

    let mut statements = Vec::new();
    if !head.is_empty() {
        statements.push(Stmt::Raw(head.to_string()));
    }
    for line in tail {
        let text = if line.trim().is_empty() {
            ""
        } else {
            line[indent..].trim_end()
        };
        statements.push(Stmt::Raw(text.to_string()));
    }

    while matches!(statements.last(), Some(Stmt::Raw(text)) if text.is_empty()) {
        statements.pop();
    }
    while matches!(statements.first(), Some(Stmt::Raw(text)) if text.is_empty()) {
        statements.remove(0);
    }
    CodeBlock::new(statements)
}
