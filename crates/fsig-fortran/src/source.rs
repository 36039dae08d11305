//! Physical lines to statements.
//!
//! Comments are dropped, continuation lines are joined, `;`-separated
//! statements are split, and everything is lowercased.

use std::borrow::Cow;
use std::path::Path;

/// Fortran source form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceForm {
    /// Column-oriented FORTRAN 77 layout.
    Fixed,
    /// Fortran 90 free layout.
    Free,
}

impl SourceForm {
    /// Picks the form from a file extension; anything unknown is fixed form.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("f90" | "f95" | "f03" | "f08") => SourceForm::Free,
            _ => SourceForm::Fixed,
        }
    }
}

/// One statement and the physical line it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub text: String,
}

/// Splits source text into lowercased statements.
pub fn statements(source: &str, form: SourceForm) -> Vec<Statement> {
    let joined = match form {
        SourceForm::Fixed => fixed_form(source),
        SourceForm::Free => free_form(source),
    };
    split_statements(joined)
}

/// Last column read in fixed form.
const FIXED_FORM_WIDTH: usize = 72;

fn fixed_form(source: &str) -> Vec<Statement> {
    let mut out: Vec<Statement> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let raw = expand_tab_format(raw);
        if matches!(raw.chars().next(), None | Some('c' | 'C' | '*' | '!')) {
            continue;
        }

        let columns: Vec<char> = raw.chars().take(FIXED_FORM_WIDTH).collect();
        if columns.iter().all(|c| c.is_whitespace()) {
            continue;
        }

        let is_continuation = columns.len() > 5
            && !matches!(columns[5], ' ' | '0')
            && columns[..5].iter().all(|c| *c == ' ');
        let body: String = columns.iter().skip(6).collect();
        let body = strip_comment(&body);

        if is_continuation {
            if let Some(last) = out.last_mut() {
                last.text.push_str(body);
                continue;
            }
        }
        if body.trim().is_empty() {
            continue;
        }
        out.push(Statement {
            line: index + 1,
            text: body.to_string(),
        });
    }
    out
}

/// Rewrites DEC tab-format lines to column layout.
fn expand_tab_format(raw: &str) -> Cow<'_, str> {
    match raw.strip_prefix('\t') {
        Some(rest) if rest.starts_with(|c: char| ('1'..='9').contains(&c)) => {
            Cow::Owned(format!("     {}", rest))
        }
        Some(rest) => Cow::Owned(format!("      {}", rest)),
        None => Cow::Borrowed(raw),
    }
}

fn free_form(source: &str) -> Vec<Statement> {
    let mut out: Vec<Statement> = Vec::new();
    let mut pending = false;

    for (index, raw) in source.lines().enumerate() {
        let body = strip_comment(raw).trim();
        if body.is_empty() {
            continue;
        }
        let (body, continues) = match body.strip_suffix('&') {
            Some(head) => (head.trim_end(), true),
            None => (body, false),
        };

        let was_pending = std::mem::replace(&mut pending, continues);
        if was_pending {
            if let Some(last) = out.last_mut() {
                match body.strip_prefix('&') {
                    Some(tail) => last.text.push_str(tail),
                    None => {
                        last.text.push(' ');
                        last.text.push_str(body);
                    }
                }
                continue;
            }
        }
        out.push(Statement {
            line: index + 1,
            text: body.to_string(),
        });
    }
    out
}

/// Drops a trailing `!` comment, ignoring `!` inside string literals.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '!') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn split_statements(joined: Vec<Statement>) -> Vec<Statement> {
    let mut out = Vec::new();
    for stmt in joined {
        let mut quote: Option<char> = None;
        let mut current = String::new();
        for c in stmt.text.chars() {
            match (quote, c) {
                (None, '\'' | '"') => quote = Some(c),
                (Some(q), _) if c == q => quote = None,
                (None, ';') => {
                    push_statement(&mut out, stmt.line, &current);
                    current.clear();
                    continue;
                }
                _ => {}
            }
            current.push(c);
        }
        push_statement(&mut out, stmt.line, &current);
    }
    out
}

fn push_statement(out: &mut Vec<Statement>, line: usize, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(Statement {
            line,
            text: text.to_lowercase(),
        });
    }
}
