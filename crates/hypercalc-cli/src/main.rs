mod config;
mod repl;

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hypercalc_core::MAX_ROOT_DEGREE;
use hypercalc_parse::{eval_formatted, format_value, roots_formatted, EvalMode, FormulaSystem};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "hcalc",
    version,
    about = "Calculator for complex, binary, dual and Ultra numbers"
)]
struct Cli {
    /// Decimals to round results to (overrides the config)
    #[arg(short, long, global = true)]
    digits: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        /// Expression, e.g. "(1 + 2ⅈ) * exp(ε)"
        expression: String,

        /// Stay inside one complex, binary or dual algebra
        #[arg(long)]
        direct: bool,
    },

    /// List every n-th root of a value
    Roots {
        /// Expression whose roots are wanted
        value: String,

        /// Root degree
        #[arg(value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_ROOT_DEGREE)))]
        n: u32,

        /// Stay inside one complex, binary or dual algebra
        #[arg(long)]
        direct: bool,
    },

    /// Evaluate a formula template after binding its identifiers
    Formula {
        /// Template, e.g. "rate * ? + base"
        template: String,

        /// Formula name
        #[arg(short, long, default_value = "f")]
        name: String,

        /// Bindings such as "rate = 0.5, base := x + 1" (repeatable)
        #[arg(short, long = "set")]
        set: Vec<String>,

        /// Fail while a named parameter is unbound
        #[arg(long)]
        strict: bool,
    },

    /// Interactive session reading expressions from stdin
    Repl {
        /// Start in direct mode
        #[arg(long)]
        direct: bool,
    },

    /// Start the JSON-RPC tool server on stdio
    Serve,

    /// Show the active configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config()?;
    if cli.digits.is_some() {
        cfg.output.digits = cli.digits;
    }

    match cli.command {
        Commands::Eval { expression, direct } => {
            cmd_eval(&cfg, &expression, eval_mode(&cfg, direct))
        }
        Commands::Roots { value, n, direct } => {
            cmd_roots(&cfg, &value, n, eval_mode(&cfg, direct))
        }
        Commands::Formula {
            template,
            name,
            set,
            strict,
        } => {
            if strict {
                cfg.formula.strict_identifiers = true;
            }
            cmd_formula(&cfg, &name, &template, &set)
        }
        Commands::Repl { direct } => {
            let mode = eval_mode(&cfg, direct);
            repl::run_repl(io::stdin().lock(), io::stdout().lock(), &cfg, mode)
        }
        Commands::Serve => hypercalc_mcp::run_server(cfg.session_options()),
        Commands::Config => cmd_config(&cfg),
    }
}

fn eval_mode(cfg: &Config, direct: bool) -> EvalMode {
    if direct {
        EvalMode::Direct
    } else {
        cfg.eval.mode
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_eval(cfg: &Config, expression: &str, mode: EvalMode) -> Result<()> {
    let value = eval_formatted(expression, mode, cfg.parser, cfg.output.digits)
        .with_context(|| format!("evaluating `{expression}`"))?;
    println!("{value}");
    Ok(())
}

fn cmd_roots(cfg: &Config, value: &str, n: u32, mode: EvalMode) -> Result<()> {
    let roots = roots_formatted(value, n, mode, cfg.parser, cfg.output.digits)
        .with_context(|| format!("taking {n}-th roots of `{value}`"))?;
    for root in roots {
        println!("{root}");
    }
    Ok(())
}

fn cmd_formula(cfg: &Config, name: &str, template: &str, bindings: &[String]) -> Result<()> {
    let mut system = FormulaSystem::with_options(name, template, cfg.formula_options())
        .with_context(|| format!("reading template `{template}`"))?;
    for binding in bindings {
        system
            .apply(binding)
            .with_context(|| format!("applying `{binding}`"))?;
    }
    let value = system
        .result()
        .with_context(|| format!("evaluating {system}"))?;
    println!("{system}");
    println!("  = {}", format_value(&value, cfg.output.digits));
    Ok(())
}

fn cmd_config(cfg: &Config) -> Result<()> {
    println!("Config: {}", config::show_config_path());
    println!();
    println!("[parser]");
    println!("  max_depth = {}", cfg.parser.max_depth);
    println!();
    println!("[output]");
    match cfg.output.digits {
        Some(d) => println!("  digits = {d}"),
        None => println!("  digits = (shortest exact form)"),
    }
    println!();
    println!("[eval]");
    println!("  mode = {}", cfg.eval.mode);
    println!();
    println!("[formula]");
    println!("  strict_identifiers = {}", cfg.formula.strict_identifiers);
    Ok(())
}
