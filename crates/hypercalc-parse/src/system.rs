//! A named formula whose parameters can be rebound by identifier, with
//! sub-formulas introducing further identifiers.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use hypercalc_core::{CalcError, CalcResult, Ultra};

use crate::formula::{Binding, Formula, FormulaOptions};

/// Parameter indices leading from the root: every index but the last
/// selects a formula binding, the last names the owned parameter.
type Path = Vec<usize>;

#[derive(Debug, Clone)]
pub struct FormulaSystem {
    name: String,
    root: Formula,
    index: BTreeMap<String, Vec<Path>>,
}

impl FormulaSystem {
    pub fn new(name: &str, template: &str) -> CalcResult<Self> {
        Self::with_options(name, template, FormulaOptions::default())
    }

    pub fn with_options(name: &str, template: &str, options: FormulaOptions) -> CalcResult<Self> {
        let mut system = Self {
            name: name.to_string(),
            root: Formula::with_options(template, options)?,
            index: BTreeMap::new(),
        };
        system.rebuild_index();
        Ok(system)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Formula {
        &self.root
    }

    fn rebuild_index(&mut self) {
        fn walk(formula: &Formula, prefix: &mut Path, index: &mut BTreeMap<String, Vec<Path>>) {
            for (i, parameter) in formula.parameters().iter().enumerate() {
                prefix.push(i);
                if let Some(name) = parameter.name() {
                    index.entry(name.to_string()).or_default().push(prefix.clone());
                }
                if let Binding::Formula(sub) = parameter.binding() {
                    walk(sub, prefix, index);
                }
                prefix.pop();
            }
        }
        self.index.clear();
        walk(&self.root, &mut Vec::new(), &mut self.index);
    }

    fn formula_at(&self, path: &[usize]) -> Option<&Formula> {
        let mut formula = &self.root;
        for &i in path {
            match formula.parameters().get(i)?.binding() {
                Binding::Formula(sub) => formula = &**sub,
                Binding::Literal(_) => return None,
            }
        }
        Some(formula)
    }

    fn formula_at_mut(&mut self, path: &[usize]) -> Option<&mut Formula> {
        let mut formula = &mut self.root;
        for &i in path {
            match formula.parameters_mut().get_mut(i)?.binding_mut() {
                Binding::Formula(sub) => formula = &mut **sub,
                Binding::Literal(_) => return None,
            }
        }
        Some(formula)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Identifiers owned by live formulas, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The formula holding the first parameter named `name`.
    pub fn owner(&self, name: &str) -> Option<&Formula> {
        let path = self.index.get(name)?.first()?;
        self.formula_at(&path[..path.len() - 1])
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.owner(name)?.parameter(name).map(|p| p.binding())
    }

    /// Binds `name` wherever it occurs. Literal text binds a value, any
    /// other text a sub-formula whose identifiers join the system.
    pub fn set(&mut self, name: &str, text: &str) -> CalcResult<()> {
        let paths = self
            .index
            .get(name)
            .cloned()
            .ok_or_else(|| CalcError::UnknownIdentifier(name.to_string()))?;
        let binding = match text.trim().parse::<Ultra>() {
            Ok(value) => Binding::Literal(value),
            Err(_) => Binding::Formula(Box::new(Formula::with_options(text, self.root.options())?)),
        };
        debug!(system = %self.name, identifier = name, binding = %binding, "set");
        for path in &paths {
            let (last, parent) = path
                .split_last()
                .ok_or_else(|| CalcError::Binding(format!("no parameter path for {name}")))?;
            self.formula_at_mut(parent)
                .ok_or_else(|| CalcError::Binding(format!("stale parameter path for {name}")))?
                .bind(*last, binding.clone())?;
        }
        self.rebuild_index();
        Ok(())
    }

    /// Applies assignments such as `a = 1, b := x + 2; c = 3`. Either every
    /// assignment takes effect or, on the first failure, none does.
    pub fn apply(&mut self, commands: &str) -> CalcResult<()> {
        let mut staged = self.clone();
        for command in commands.split([',', ';']) {
            if command.trim().is_empty() {
                continue;
            }
            let (name, text) = command
                .split_once(":=")
                .or_else(|| command.split_once('='))
                .ok_or_else(|| malformed(command))?;
            let (name, text) = (name.trim(), text.trim());
            if name.is_empty() || text.is_empty() {
                return Err(malformed(command));
            }
            staged.set(name, text)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.root.render()
    }

    pub fn result(&self) -> CalcResult<Ultra> {
        self.root.result()
    }
}

fn malformed(command: &str) -> CalcError {
    CalcError::Binding(format!("expected `name = value` in `{}`", command.trim()))
}

impl fmt::Display for FormulaSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_literal_and_formula() {
        let mut system = FormulaSystem::new("f", "a * b").unwrap();
        system.set("a", "3").unwrap();
        assert!(matches!(system.binding("a"), Some(Binding::Literal(v)) if *v == Ultra::real(3.0)));
        system.set("b", "c + 1").unwrap();
        assert!(matches!(system.binding("b"), Some(Binding::Formula(_))));
        assert_eq!(system.identifiers().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        system.set("c", "4").unwrap();
        assert_eq!(system.render(), "3 * (4 + 1)");
        assert_eq!(system.result().unwrap(), Ultra::real(15.0));
        assert_eq!(system.owner("c").unwrap().template(), "? + 1");
    }

    #[test]
    fn test_orphans_disappear() {
        let mut system = FormulaSystem::new("f", "a + 1").unwrap();
        system.set("a", "x * y").unwrap();
        assert!(system.contains("x") && system.contains("y"));
        system.set("a", "2").unwrap();
        assert!(!system.contains("x"));
        assert!(!system.contains("y"));
        assert!(matches!(system.set("x", "1"), Err(CalcError::UnknownIdentifier(_))));
        assert_eq!(system.result().unwrap(), Ultra::real(3.0));
    }

    #[test]
    fn test_shared_identifier_binds_everywhere() {
        let mut system = FormulaSystem::new("f", "a + b").unwrap();
        system.apply("a := k * 2; b = k + 1").unwrap();
        system.set("k", "5").unwrap();
        assert_eq!(system.result().unwrap(), Ultra::real(16.0));
    }

    #[test]
    fn test_apply_errors() {
        let mut system = FormulaSystem::new("f", "a").unwrap();
        assert!(matches!(system.apply("a 1"), Err(CalcError::Binding(_))));
        assert!(matches!(system.apply("= 1"), Err(CalcError::Binding(_))));
        assert!(matches!(system.apply("z = 1"), Err(CalcError::UnknownIdentifier(_))));
        system.apply("a = 1ⅈ,").unwrap();
        assert_eq!(system.to_string(), "f = (ⅈ)");
    }

    #[test]
    fn test_failed_batch_changes_nothing() {
        let mut system = FormulaSystem::new("f", "a + b").unwrap();
        assert!(matches!(system.apply("a = 5, zz = 1"), Err(CalcError::UnknownIdentifier(_))));
        assert_eq!(system.result().unwrap(), Ultra::ZERO);
        assert_eq!(system.render(), "0 + 0");

        assert!(system.apply("a := c * 2; c = 3; zz = 1").is_err());
        assert!(!system.contains("c"));
        assert_eq!(system.result().unwrap(), Ultra::ZERO);

        system.apply("a := c * 2; c = 3; b = 1").unwrap();
        assert_eq!(system.result().unwrap(), Ultra::real(7.0));
    }
}
