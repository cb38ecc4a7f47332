//! Single left-to-right scan of an expression into operator hits,
//! parentheses, `?` markers and plain text segments.
//!
//! At every position the longest operator symbol wins. `+`/`-` are
//! negation/identity where an operand is expected (at the start, after
//! `(` and after another prefix or infix operator) and binary otherwise.

use hypercalc_core::literal::is_exponent_sign;
use hypercalc_core::CalcError;

use crate::operator::{Fixity, Operator};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'t> {
    Op(&'t Operator),
    Open,
    Close,
    Marker,
    Text,
}

/// A token with its byte range and parenthesis depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'t> {
    pub kind: TokenKind<'t>,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
}

impl<'t> Token<'t> {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn operator(&self) -> Option<&'t Operator> {
        match self.kind {
            TokenKind::Op(op) => Some(op),
            _ => None,
        }
    }
}

/// Fails with [`CalcError::Unbalanced`] unless every `)` closes an earlier `(`
/// and none stay open.
pub fn check_balance(text: &str) -> Result<(), CalcError> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CalcError::Unbalanced(text.to_string()))?
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(CalcError::Unbalanced(text.to_string()))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Does the text before a token leave an operand expected?
fn expects_operand(previous: Option<&Token<'_>>) -> bool {
    match previous.map(|t| t.kind) {
        None | Some(TokenKind::Open) => true,
        Some(TokenKind::Op(op)) => op.fixity != Fixity::Suffix,
        Some(_) => false,
    }
}

/// The operator spelled at byte `i`, if any.
fn match_operator<'t>(
    text: &str,
    i: usize,
    table: &'t [Operator],
    operand_expected: bool,
) -> Option<&'t Operator> {
    let rest = &text[i..];
    let before = text[..i].chars().next_back();
    let bytes = text.as_bytes();
    let candidates = table.iter().filter(|op| {
        if !rest.starts_with(op.symbol) {
            return false;
        }
        if op.is_word() {
            let after = rest[op.symbol.len()..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(|c| c.is_ascii_alphabetic()) {
                return false;
            }
        }
        if matches!(op.symbol, "+" | "-") && is_exponent_sign(bytes, i) {
            return false;
        }
        true
    });
    let longest = candidates.clone().map(|op| op.symbol.len()).max()?;
    let mut same = candidates.filter(|op| op.symbol.len() == longest);
    let first = same.next()?;
    // Symbols shared between fixities (`-`, `+`) resolve by context.
    let wanted = |op: &Operator| (op.fixity == Fixity::Prefix) == operand_expected;
    if wanted(first) {
        return Some(first);
    }
    Some(same.find(|op| wanted(op)).unwrap_or(first))
}

/// Scans all of `text`. Positions are byte offsets into `text`.
pub fn scan<'t>(text: &str, table: &'t [Operator]) -> Vec<Token<'t>> {
    let mut tokens: Vec<Token<'t>> = Vec::new();
    let mut depth = 0usize;
    let mut segment: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    let close_segment = |tokens: &mut Vec<Token<'t>>,
                         segment: &mut Option<usize>,
                         end: usize,
                         depth: usize| {
        if let Some(start) = segment.take() {
            tokens.push(Token {
                kind: TokenKind::Text,
                start,
                end,
                depth,
            });
        }
    };

    while let Some((i, c)) = chars.next() {
        let single = |kind, depth| Token {
            kind,
            start: i,
            end: i + c.len_utf8(),
            depth,
        };
        match c {
            '(' => {
                close_segment(&mut tokens, &mut segment, i, depth);
                tokens.push(single(TokenKind::Open, depth));
                depth += 1;
                continue;
            }
            ')' => {
                close_segment(&mut tokens, &mut segment, i, depth);
                depth = depth.saturating_sub(1);
                tokens.push(single(TokenKind::Close, depth));
                continue;
            }
            '?' => {
                close_segment(&mut tokens, &mut segment, i, depth);
                tokens.push(single(TokenKind::Marker, depth));
                continue;
            }
            c if c.is_whitespace() => {
                close_segment(&mut tokens, &mut segment, i, depth);
                continue;
            }
            _ => {}
        }

        let operand_expected = segment.is_none() && expects_operand(tokens.last());
        if let Some(op) = match_operator(text, i, table, operand_expected) {
            close_segment(&mut tokens, &mut segment, i, depth);
            let end = i + op.symbol.len();
            tokens.push(Token {
                kind: TokenKind::Op(op),
                start: i,
                end,
                depth,
            });
            while chars.peek().is_some_and(|&(j, _)| j < end) {
                chars.next();
            }
            continue;
        }
        segment.get_or_insert(i);
    }
    close_segment(&mut tokens, &mut segment, text.len(), depth);
    tokens
}
