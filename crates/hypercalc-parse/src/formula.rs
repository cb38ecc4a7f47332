//! Formula templates with positional and named parameters.
//!
//! A template is normalized so every parameter occurrence is a `?` slot.
//! Rendering substitutes the current bindings and evaluation re-parses the
//! rendered text, so rebinding needs no invalidation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hypercalc_core::literal::is_real_literal;
use hypercalc_core::{CalcError, CalcResult, Ultra};

use crate::domain::UltraDomain;
use crate::operator::ULTRA_OPERATORS;
use crate::parser::ParserOptions;
use crate::scanner::{check_balance, scan, TokenKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaOptions {
    /// Fail evaluation while a named parameter has never been bound.
    pub strict_identifiers: bool,
    pub parser: ParserOptions,
}

#[derive(Debug, Clone)]
pub enum Binding {
    Literal(Ultra),
    Formula(Box<Formula>),
}

impl Binding {
    /// Text substituted into a slot.
    fn render(&self) -> String {
        match self {
            Binding::Literal(v) if v.is_real() && v.real_part() >= 0.0 => v.to_string(),
            Binding::Literal(v) => format!("({v})"),
            Binding::Formula(f) => format!("({})", f.render()),
        }
    }
}

impl Default for Binding {
    fn default() -> Self {
        Binding::Literal(Ultra::ZERO)
    }
}

impl From<Ultra> for Binding {
    fn from(v: Ultra) -> Self {
        Binding::Literal(v)
    }
}

impl From<Formula> for Binding {
    fn from(f: Formula) -> Self {
        Binding::Formula(Box::new(f))
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Literal(v) => write!(f, "{v}"),
            Binding::Formula(formula) => write!(f, "{formula}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parameter {
    name: Option<String>,
    binding: Binding,
    bound: bool,
}

impl Parameter {
    /// `None` for `?` placeholders.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub(crate) fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }
}

#[derive(Debug, Clone)]
pub struct Formula {
    template: String,
    /// Parameter index of each `?` in `template`, in order.
    slots: Vec<usize>,
    parameters: Vec<Parameter>,
    options: FormulaOptions,
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl Formula {
    pub fn new(template: &str) -> CalcResult<Self> {
        Self::with_options(template, FormulaOptions::default())
    }

    pub fn with_options(template: &str, options: FormulaOptions) -> CalcResult<Self> {
        check_balance(template)?;
        let mut formula = Formula {
            template: String::with_capacity(template.len()),
            slots: Vec::new(),
            parameters: Vec::new(),
            options,
        };
        let mut cursor = 0;
        for token in scan(template, &ULTRA_OPERATORS) {
            formula.template.push_str(&template[cursor..token.start]);
            cursor = token.end;
            let text = token.text(template);
            match token.kind {
                TokenKind::Marker => {
                    formula.parameters.push(Parameter::default());
                    formula.push_slot(formula.parameters.len() - 1);
                }
                TokenKind::Text if is_real_literal(text) => formula.template.push_str(text),
                TokenKind::Text if is_identifier(text) => {
                    let index = match formula.position(text) {
                        Some(index) => index,
                        None => {
                            debug!(template, parameter = text, "detected named parameter");
                            formula.parameters.push(Parameter {
                                name: Some(text.to_string()),
                                ..Parameter::default()
                            });
                            formula.parameters.len() - 1
                        }
                    };
                    formula.push_slot(index);
                }
                TokenKind::Text => {
                    return Err(CalcError::literal(text, "neither a number nor an identifier"))
                }
                _ => formula.template.push_str(text),
            }
        }
        formula.template.push_str(&template[cursor..]);
        Ok(formula)
    }

    fn push_slot(&mut self, index: usize) {
        self.template.push('?');
        self.slots.push(index);
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name() == Some(name))
    }

    /// Template with every parameter occurrence written as `?`.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|i| &self.parameters[i])
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.parameters
    }

    pub fn options(&self) -> FormulaOptions {
        self.options
    }

    /// Names of the named parameters, in order of first appearance.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(Parameter::name)
    }

    pub fn bind(&mut self, index: usize, binding: impl Into<Binding>) -> CalcResult<()> {
        let count = self.parameters.len();
        let parameter = self.parameters.get_mut(index).ok_or_else(|| {
            CalcError::Binding(format!("parameter {index} out of range ({count} parameters)"))
        })?;
        parameter.binding = binding.into();
        parameter.bound = true;
        Ok(())
    }

    pub fn bind_named(&mut self, name: &str, binding: impl Into<Binding>) -> CalcResult<()> {
        let index = self
            .position(name)
            .ok_or_else(|| CalcError::UnknownIdentifier(name.to_string()))?;
        self.bind(index, binding)
    }

    /// Expression text with every slot replaced by its binding.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut slots = self.slots.iter().peekable();
        for c in self.template.chars() {
            match slots.next_if(|_| c == '?') {
                Some(&index) => out.push_str(&self.parameters[index].binding.render()),
                None => out.push(c),
            }
        }
        out
    }

    /// First named parameter, here or in a nested formula, never bound.
    fn unbound_identifier(&self) -> Option<&str> {
        self.parameters.iter().find_map(|p| match (&p.binding, p.bound) {
            (_, false) => p.name(),
            (Binding::Formula(f), true) => f.unbound_identifier(),
            (Binding::Literal(_), true) => None,
        })
    }

    /// Renders and evaluates in the Ultra algebra.
    pub fn result(&self) -> CalcResult<Ultra> {
        if self.options.strict_identifiers {
            if let Some(name) = self.unbound_identifier() {
                return Err(CalcError::UnknownIdentifier(name.to_string()));
            }
        }
        crate::evaluate(&self.render(), &UltraDomain, self.options.parser)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypercalc_core::Dim;

    #[test]
    fn test_markers_and_identifiers() {
        let f = Formula::new("? * rate + rate / base").unwrap();
        assert_eq!(f.template(), "? * ? + ? / ?");
        assert_eq!(f.slots(), &[0, 1, 1, 2]);
        assert_eq!(f.parameters().len(), 3);
        assert_eq!(f.identifiers().collect::<Vec<_>>(), vec!["rate", "base"]);
        assert!(f.parameters()[0].name().is_none());
    }

    #[test]
    fn test_literals_and_constants_stay() {
        let f = Formula::new("2 * pi + 1e-3 - sin(x)").unwrap();
        assert_eq!(f.template(), "2 * pi + 1e-3 - sin(?)");
        assert_eq!(f.identifiers().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_unbound_parameters_are_zero() {
        let f = Formula::new("x + 2").unwrap();
        assert_eq!(f.render(), "0 + 2");
        assert_eq!(f.result().unwrap(), Ultra::real(2.0));
    }

    #[test]
    fn test_rebinding_changes_result() {
        let mut f = Formula::new("? * rate").unwrap();
        f.bind(0, Ultra::real(2.0)).unwrap();
        f.bind_named("rate", Ultra::real(3.0)).unwrap();
        assert_eq!(f.result().unwrap(), Ultra::real(6.0));
        f.bind_named("rate", Ultra::real(4.0)).unwrap();
        assert_eq!(f.result().unwrap(), Ultra::real(8.0));
    }

    #[test]
    fn test_render_parenthesizes() {
        let mut f = Formula::new("x * y * z").unwrap();
        f.bind_named("x", Ultra::real(-1.0)).unwrap();
        f.bind_named("y", Ultra::component(Dim::I, 2.0)).unwrap();
        f.bind_named("z", Formula::new("1 + 1").unwrap()).unwrap();
        assert_eq!(f.render(), "(-1) * (2ⅈ) * (1 + 1)");
        assert_eq!(f.result().unwrap(), Ultra::component(Dim::I, -4.0));
    }

    #[test]
    fn test_binding_errors() {
        let mut f = Formula::new("? + a").unwrap();
        assert!(matches!(f.bind(2, Ultra::ONE), Err(CalcError::Binding(_))));
        assert!(matches!(
            f.bind_named("b", Ultra::ONE),
            Err(CalcError::UnknownIdentifier(name)) if name == "b"
        ));
        assert!(matches!(Formula::new("2x + 1"), Err(CalcError::Literal { .. })));
        assert!(matches!(Formula::new("(x"), Err(CalcError::Unbalanced(_))));
    }

    #[test]
    fn test_strict_identifiers() {
        let options = FormulaOptions {
            strict_identifiers: true,
            ..FormulaOptions::default()
        };
        let mut f = Formula::with_options("a + ?", options).unwrap();
        assert!(matches!(f.result(), Err(CalcError::UnknownIdentifier(name)) if name == "a"));
        f.bind_named("a", Formula::new("b * 2").unwrap()).unwrap();
        assert!(matches!(f.result(), Err(CalcError::UnknownIdentifier(name)) if name == "b"));
        f.bind_named("a", Ultra::real(5.0)).unwrap();
        assert_eq!(f.result().unwrap(), Ultra::real(5.0));
    }

    #[test]
    fn test_no_result() {
        let mut f = Formula::new("1 / d").unwrap();
        assert!(matches!(f.result(), Err(CalcError::NoResult { .. })));
        f.bind_named("d", Ultra::real(4.0)).unwrap();
        assert_eq!(f.result().unwrap(), Ultra::real(0.25));
    }
}
