//! Command-line query runner

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Parser};
use sldlog::parser::parse_query;
use sldlog::{Config, RuleSet, TraceLevel};

#[derive(Parser, Debug)]
#[command(
    name = "sldlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Answer queries against a clause program",
    long_about = "Loads a clause program and answers one query, or reads queries from \
                  standard input one per line until end of input or `:quit`."
)]
struct Cli {
    /// Program file with facts and rules
    program: PathBuf,

    /// Query to answer; without it queries are read from standard input
    query: Option<String>,

    /// silent, answers, steps, search or 0..=3 (overrides SLDLOG_TRACE)
    #[arg(long, value_name = "LEVEL", value_parser = value_parser!(TraceLevel))]
    trace: Option<TraceLevel>,

    /// Stop after this many answers per query
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

fn run_query(rules: &RuleSet, text: &str, limit: Option<usize>, out: &mut impl Write) -> anyhow::Result<()> {
    let goal = parse_query(text)?;
    let mut found = 0;
    for answer in rules.query(&goal).take(limit.unwrap_or(usize::MAX)) {
        writeln!(out, "{answer}")?;
        found += 1;
    }
    if found == 0 {
        writeln!(out, "no.")?;
    }
    log::debug!("{found} answers for {goal}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(level) = cli.trace {
        config = config.with_trace(level);
    }

    let source = fs::read_to_string(&cli.program)
        .with_context(|| format!("failed to read {}", cli.program.display()))?;
    let mut rules: RuleSet = source
        .parse()
        .with_context(|| format!("failed to load {}", cli.program.display()))?;
    rules.configure(config);
    log::info!("loaded {} rules from {}", rules.len(), cli.program.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(query) = &cli.query {
        return run_query(&rules, query, cli.limit, &mut out);
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('%') {
            continue;
        }
        if text == ":quit" || text == ":q" {
            break;
        }
        if let Err(e) = run_query(&rules, text, cli.limit, &mut out) {
            writeln!(out, "error: {e}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_positionals_and_options() {
        let cli = Cli::try_parse_from([
            "sldlog",
            "family.pl",
            "grandfather(X, Y)",
            "--trace",
            "steps",
            "--limit",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.program, PathBuf::from("family.pl"));
        assert_eq!(cli.query.as_deref(), Some("grandfather(X, Y)"));
        assert_eq!(cli.trace, Some(TraceLevel::Steps));
        assert_eq!(cli.limit, Some(2));

        let cli = Cli::try_parse_from(["sldlog", "--trace=3", "family.pl"]).unwrap();
        assert_eq!(cli.trace, Some(TraceLevel::Search));
        assert!(cli.query.is_none());
        assert!(cli.limit.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_input() {
        assert!(Cli::try_parse_from(["sldlog"]).is_err());
        assert!(Cli::try_parse_from(["sldlog", "p.pl", "--trace", "loud"]).is_err());
        assert!(Cli::try_parse_from(["sldlog", "p.pl", "--limit", "many"]).is_err());
        assert!(Cli::try_parse_from(["sldlog", "p.pl", "--verbose"]).is_err());
    }

    #[test]
    fn test_run_query_prints_answers_or_no() {
        let rules: RuleSet = "parent(a, b). parent(a, c).".parse().unwrap();

        let mut out = Vec::new();
        run_query(&rules, "parent(a, X)", Some(1), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);

        let mut out = Vec::new();
        run_query(&rules, "parent(b, X)", None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "no.\n");
    }
}
