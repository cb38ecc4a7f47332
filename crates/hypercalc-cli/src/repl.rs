//! Line-oriented interactive session.
//!
//! Plain lines are evaluated; lines starting with `:` are commands:
//! `:mode ultra|direct`, `:formula <template>`, `:set <bindings>`,
//! `:result`, `:show`, `:quit`.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use hypercalc_core::{CalcError, CalcResult};
use hypercalc_parse::{eval_formatted, format_value, EvalMode, FormulaSystem};

use crate::config::Config;

const PROMPT: &str = "> ";

struct Repl<'c> {
    config: &'c Config,
    mode: EvalMode,
    system: Option<FormulaSystem>,
}

enum Step {
    Print(String),
    Quiet,
    Quit,
}

impl Repl<'_> {
    fn system(&mut self) -> CalcResult<&mut FormulaSystem> {
        self.system
            .as_mut()
            .ok_or_else(|| CalcError::Binding("no formula; start one with :formula".into()))
    }

    fn step(&mut self, line: &str) -> CalcResult<Step> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Quiet);
        }
        let digits = self.config.output.digits;
        let Some(command) = line.strip_prefix(':') else {
            return eval_formatted(line, self.mode, self.config.parser, digits).map(Step::Print);
        };
        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let rest = rest.trim();
        debug!(command = name, "repl command");
        match name {
            "q" | "quit" | "exit" => Ok(Step::Quit),
            "mode" => {
                self.mode = rest.parse()?;
                Ok(Step::Print(format!("mode: {}", self.mode)))
            }
            "formula" => {
                let system =
                    FormulaSystem::with_options("f", rest, self.config.formula_options())?;
                let text = system.to_string();
                self.system = Some(system);
                Ok(Step::Print(text))
            }
            "set" => {
                let system = self.system()?;
                system.apply(rest)?;
                Ok(Step::Print(system.to_string()))
            }
            "result" => {
                let value = self.system()?.result()?;
                Ok(Step::Print(format_value(&value, digits)))
            }
            "show" => {
                let system = self.system()?;
                let names: Vec<&str> = system.identifiers().collect();
                Ok(Step::Print(format!("{system}\n  identifiers: {}", names.join(", "))))
            }
            other => Err(CalcError::Binding(format!("unknown command :{other}"))),
        }
    }
}

/// Reads lines from `input` until it ends or `:quit`. Failures are
/// reported inline and the session continues.
pub fn run_repl<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: &Config,
    mode: EvalMode,
) -> Result<()> {
    let mut repl = Repl {
        config,
        mode,
        system: None,
    };
    write!(output, "{PROMPT}")?;
    output.flush()?;
    for line in input.lines() {
        match repl.step(&line?) {
            Ok(Step::Print(text)) => writeln!(output, "{text}")?,
            Ok(Step::Quiet) => {}
            Ok(Step::Quit) => break,
            Err(e) => writeln!(output, "error: {e}")?,
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(input: &str) -> String {
        let mut output = Vec::new();
        run_repl(input.as_bytes(), &mut output, &Config::default(), EvalMode::Ultra).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_evaluates_lines() {
        let out = session("2 + 2 * 2 ^ 2\n\nⅈ²\n");
        assert!(out.contains("> 10\n"), "{out}");
        assert!(out.contains("> -1\n"), "{out}");
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let out = session("1 / 0\n(1\n3\n");
        assert!(out.contains("error: no result for `1 / 0`"), "{out}");
        assert!(out.contains("error: unbalanced parentheses"), "{out}");
        assert!(out.contains("> 3\n"), "{out}");
    }

    #[test]
    fn test_mode_switch() {
        let out = session(":mode direct\nⅈ + ⅉ\n:mode ultra\nⅈ + ⅉ\n");
        assert!(out.contains("mode: direct"), "{out}");
        assert!(out.contains("error: no result"), "{out}");
        assert!(out.contains("ⅈ+ⅉ"), "{out}");
    }

    #[test]
    fn test_formula_commands() {
        let out = session(":result\n:formula a * b\n:set a = 2, b := c + 1\n:set c = 4\n:result\n:show\n");
        assert!(out.contains("error: invalid binding: no formula"), "{out}");
        assert!(out.contains("f = 2 * (4 + 1)"), "{out}");
        assert!(out.contains("> 10\n"), "{out}");
        assert!(out.contains("identifiers: a, b, c"), "{out}");
    }

    #[test]
    fn test_quit_stops_reading() {
        let out = session("1\n:quit\n2\n");
        assert!(out.contains("> 1\n"));
        assert!(!out.contains("> 2\n"));
    }
}
