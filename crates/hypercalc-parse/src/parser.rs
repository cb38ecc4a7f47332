//! Recursive scan-and-pick parser.
//!
//! Each substring is scanned once; among the operator hits at parenthesis
//! depth 0 that fit their fixity, the loosest-binding one becomes the node
//! and its operand substrings are parsed the same way.

use serde::{Deserialize, Serialize};
use tracing::trace;

use hypercalc_core::{parse_real, CalcError, CalcResult};

use crate::ast::Ast;
use crate::domain::EvalDomain;
use crate::operator::{Fixity, Operator};
use crate::scanner::{check_balance, scan, Token, TokenKind};

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Deepest operand nesting accepted before [`CalcError::TooDeep`].
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Parser {
    operators: &'static [Operator],
    options: ParserOptions,
}

impl Parser {
    pub fn new(operators: &'static [Operator]) -> Self {
        Self {
            operators,
            options: ParserOptions::default(),
        }
    }

    pub fn for_domain<D: EvalDomain>(domain: &D) -> Self {
        Self::new(domain.operators())
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn operators(&self) -> &'static [Operator] {
        self.operators
    }

    pub fn parse<V: Clone>(&self, text: &str) -> CalcResult<Ast<V>> {
        if text.trim().is_empty() {
            return Err(CalcError::syntax(text, 0, "empty expression"));
        }
        check_balance(text)?;
        Ok(self.parse_range(text, 0, text.len(), 0)?.normalize())
    }

    fn parse_range<V: Clone>(
        &self,
        source: &str,
        lo: usize,
        hi: usize,
        depth: usize,
    ) -> CalcResult<Ast<V>> {
        if depth > self.options.max_depth {
            return Err(CalcError::TooDeep {
                limit: self.options.max_depth,
            });
        }
        let (lo, hi) = trim_range(source, lo, hi);
        let text = &source[lo..hi];
        if text.is_empty() {
            return Err(CalcError::syntax(source, lo, "missing operand"));
        }

        let tokens = scan(text, self.operators);
        if let Some((token, op)) = split_point(text, &tokens) {
            trace!(expression = text, operator = op.symbol, offset = lo + token.start, "split");
            let start = lo + token.start;
            let end = lo + token.end;
            let children = match op.fixity {
                Fixity::Prefix => vec![self.parse_range(source, end, hi, depth + 1)?],
                Fixity::Suffix if source[lo..start].trim().is_empty() => Vec::new(),
                Fixity::Suffix => vec![self.parse_range(source, lo, start, depth + 1)?],
                Fixity::Infix if !op.right_assoc => {
                    return self.parse_chain(source, lo, hi, &tokens, op.rank, depth);
                }
                Fixity::Infix => vec![
                    self.parse_range(source, lo, start, depth + 1)?,
                    self.parse_range(source, end, hi, depth + 1)?,
                ],
            };
            return Ok(Ast::apply(op, children));
        }

        if is_wrapped(&tokens) {
            return Ok(Ast::bracket(self.parse_range(
                source,
                lo + 1,
                hi - 1,
                depth + 1,
            )?));
        }
        if tokens.iter().any(|t| t.kind == TokenKind::Marker) {
            return Err(CalcError::syntax(text, lo, "unbound `?` placeholder"));
        }
        if text.contains(['(', ')']) {
            return Err(CalcError::syntax(text, lo, "cannot split expression"));
        }
        let value = parse_real(text)?;
        Ok(Ast::leaf(value, text))
    }
}

impl Parser {
    /// Folds every depth-0 hit of a left-associative rank from the left, so
    /// a long flat sum costs one nesting level instead of one per term.
    fn parse_chain<V: Clone>(
        &self,
        source: &str,
        lo: usize,
        hi: usize,
        tokens: &[Token<'static>],
        rank: u8,
        depth: usize,
    ) -> CalcResult<Ast<V>> {
        let text = &source[lo..hi];
        let hits: Vec<(Token<'static>, &'static Operator)> = tokens
            .iter()
            .filter(|t| t.depth == 0)
            .filter_map(|t| t.operator().map(|op| (*t, op)))
            .filter(|(t, op)| {
                op.fixity == Fixity::Infix && op.rank == rank && fits(text, t, op)
            })
            .collect();
        let Some((first, _)) = hits.first() else {
            return Err(CalcError::syntax(text, lo, "cannot split expression"));
        };
        let mut tree = self.parse_range(source, lo, lo + first.start, depth + 1)?;
        for (i, &(token, op)) in hits.iter().enumerate() {
            let end = hits.get(i + 1).map_or(hi, |(next, _)| lo + next.start);
            let right = self.parse_range(source, lo + token.end, end, depth + 1)?;
            tree = Ast::apply(op, vec![tree, right]);
        }
        Ok(tree)
    }
}

fn trim_range(source: &str, lo: usize, hi: usize) -> (usize, usize) {
    let slice = &source[lo..hi];
    let start = lo + (slice.len() - slice.trim_start().len());
    let end = hi - (slice.len() - slice.trim_end().len());
    (start, end.max(start))
}

/// The depth-0 operator hit that becomes the node for `text`, if any.
fn split_point<'t>(text: &str, tokens: &[Token<'t>]) -> Option<(Token<'t>, &'t Operator)> {
    let mut best: Option<(Token<'t>, &'t Operator)> = None;
    for token in tokens.iter().filter(|t| t.depth == 0) {
        let Some(op) = token.operator() else {
            continue;
        };
        if !fits(text, token, op) {
            continue;
        }
        best = match best {
            Some((_, current)) if op.rank < current.rank => best,
            Some((_, current)) if op.rank == current.rank && op.right_assoc => best,
            _ => Some((*token, op)),
        };
    }
    best
}

/// Whether an operator hit sits where its fixity allows inside `text`.
fn fits(text: &str, token: &Token<'_>, op: &Operator) -> bool {
    let before = text[..token.start].trim();
    let after = text[token.end..].trim();
    match op.fixity {
        Fixity::Prefix => token.start == 0 && !after.is_empty(),
        Fixity::Suffix => token.end == text.len() && (!before.is_empty() || op.allows_empty_operand()),
        Fixity::Infix => !before.is_empty() && !after.is_empty(),
    }
}

/// True when the first `(` closes at the very end.
fn is_wrapped(tokens: &[Token<'_>]) -> bool {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last))
            if first.kind == TokenKind::Open && last.kind == TokenKind::Close =>
        {
            tokens[..tokens.len() - 1]
                .iter()
                .all(|t| !(t.kind == TokenKind::Close && t.depth == 0))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScalarDomain, UltraDomain};
    use crate::operator::{OpCode, ULTRA_OPERATORS};
    use hypercalc_core::{Kind, Ultra};

    fn parse(text: &str) -> CalcResult<Ast<Ultra>> {
        Parser::new(&ULTRA_OPERATORS).parse(text)
    }

    fn root(text: &str) -> OpCode {
        parse(text).unwrap().root_operator().unwrap().code
    }

    #[test]
    fn test_loosest_operator_is_root() {
        assert_eq!(root("2 + 2 * 2 ^ 2"), OpCode::Add);
        assert_eq!(root("2 * 2 ^ 2"), OpCode::Mul);
        assert_eq!(root("-2 ^ 2"), OpCode::Neg);
        assert_eq!(root("2 ^ -2"), OpCode::Pow);
        assert_eq!(root("sin 2²"), OpCode::Function(hypercalc_core::Elementary::Sin));
        assert_eq!(root("3ⅈ²"), OpCode::Square);
    }

    #[test]
    fn test_associativity() {
        let tree = parse("8 - 4 - 2").unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(2.0));
        let tree = parse("2 ^ 3 ^ 2").unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(512.0));
        let tree = parse("2_log(8) _log 9").unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(2.0));
    }

    #[test]
    fn test_bare_unit() {
        let tree = parse("ⅈ").unwrap();
        assert_eq!(tree.root_operator().unwrap().code, OpCode::Unit(Kind::Complex));
        assert_eq!(tree.to_string(), "ⅈ");
    }

    #[test]
    fn test_brackets_and_normalize() {
        let tree = parse("((1 + 2))").unwrap();
        assert_eq!(tree.to_string(), "(1 + 2)");
        assert_eq!(tree, parse("(1+2)").unwrap());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse(""), Err(CalcError::Syntax { .. })));
        assert!(matches!(parse("   "), Err(CalcError::Syntax { .. })));
        assert!(matches!(parse("(1 + 2"), Err(CalcError::Unbalanced(_))));
        assert!(matches!(parse("1 +"), Err(CalcError::Literal { .. })));
        assert!(matches!(parse("2 abc"), Err(CalcError::Literal { .. })));
        assert!(matches!(parse("(1)(2)"), Err(CalcError::Syntax { .. })));
        assert!(matches!(parse("? + 1"), Err(CalcError::Syntax { .. })));
        match parse("1 + foo") {
            Err(CalcError::Literal { text, .. }) => assert_eq!(text, "foo"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let parser = Parser::new(&ULTRA_OPERATORS).with_options(ParserOptions { max_depth: 10 });
        assert!(matches!(
            parser.parse::<Ultra>(&deep),
            Err(CalcError::TooDeep { limit: 10 })
        ));
        assert!(parse(&deep).is_ok());
    }

    #[test]
    fn test_long_flat_chain_within_depth_limit() {
        let sum = vec!["1"; 1000].join(" + ");
        let tree = parse(&sum).unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(1000.0));

        let mixed = format!("{} - 4 * 2 - 1", vec!["3"; 400].join(" - "));
        let tree = parse(&mixed).unwrap();
        assert_eq!(tree.root_operator().unwrap().code, OpCode::Sub);
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(3.0 - 3.0 * 399.0 - 9.0));
    }

    #[test]
    fn test_chain_folds_from_the_left() {
        let tree = parse("1 - 2 + 3").unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(2.0));
        assert_eq!(tree.to_string(), "1 - 2 + 3");
        let tree = parse("8 / 2 * 4 / 2").unwrap();
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(8.0));
    }

    #[test]
    fn test_direct_table_for_scalar_domain() {
        let parser = Parser::for_domain(&ScalarDomain);
        let tree = parser.parse::<hypercalc_core::Scalar>("3 dot 4").unwrap();
        assert_eq!(tree.root_operator().unwrap().code, OpCode::Dot);
    }
}
