//! Command-line interface for the `sq` query parser.
//!
//! A thin harness over [`sq_query`]: it parses queries given as arguments or
//! read line-by-line from stdin, prints the AST and canonical form (or JSON),
//! and reports positioned errors on stderr.

use std::{
    io::{self, BufRead},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use sq_query::{QueryExpr, stringify};

#[derive(Parser)]
#[command(name = "sq")]
#[command(about = "Parse boolean search queries and print their structure")]
/// Top-level CLI options.
struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    command: Commands,
}

#[derive(Subcommand)]
/// Supported `sq` subcommands.
enum Commands {
    /// Parse queries and print the AST and canonical form
    Parse {
        /// Queries to parse (reads stdin lines when omitted)
        queries: Vec<String>,

        /// Emit one JSON object per query instead of text
        #[arg(long)]
        json: bool,

        /// Print only the canonical form
        #[arg(long, conflicts_with = "json")]
        canonical: bool,
    },

    /// Validate queries, reporting only errors
    Check {
        /// Queries to check (reads stdin lines when omitted)
        queries: Vec<String>,
    },
}

/// JSON form of a query expression.
#[derive(Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum JsonExpr {
    /// A leaf term.
    Term {
        /// The term value.
        value: String,
    },
    /// A field qualifier.
    Field {
        /// Field name.
        key: String,
        /// Field value.
        value: String,
    },
    /// A conjunction.
    And {
        /// Left operand.
        left: Box<JsonExpr>,
        /// Right operand.
        right: Box<JsonExpr>,
    },
    /// A disjunction.
    Or {
        /// Left operand.
        left: Box<JsonExpr>,
        /// Right operand.
        right: Box<JsonExpr>,
    },
}

impl From<&QueryExpr> for JsonExpr {
    fn from(expr: &QueryExpr) -> Self {
        match expr {
            QueryExpr::Term(value) => Self::Term {
                value: value.clone(),
            },
            QueryExpr::Field { key, value } => Self::Field {
                key: key.clone(),
                value: value.clone(),
            },
            QueryExpr::And(left, right) => Self::And {
                left: Box::new(Self::from(left.as_ref())),
                right: Box::new(Self::from(right.as_ref())),
            },
            QueryExpr::Or(left, right) => Self::Or {
                left: Box::new(Self::from(left.as_ref())),
                right: Box::new(Self::from(right.as_ref())),
            },
        }
    }
}

/// JSON output for a single parsed query.
#[derive(Serialize)]
struct JsonParseOutput {
    /// The original query string.
    query: String,
    /// The parsed expression, or null for an empty query.
    ast: Option<JsonExpr>,
    /// Canonical text form, or null for an empty query.
    canonical: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            queries,
            json,
            canonical,
        } => match gather_queries(queries) {
            Ok(queries) => cmd_parse(&queries, json, canonical),
            Err(code) => code,
        },
        Commands::Check { queries } => match gather_queries(queries) {
            Ok(queries) => cmd_check(&queries),
            Err(code) => code,
        },
    }
}

/// Returns the given queries, or reads one query per stdin line when none
/// were given.
fn gather_queries(queries: Vec<String>) -> Result<Vec<String>, ExitCode> {
    if !queries.is_empty() {
        return Ok(queries);
    }

    match io::stdin().lock().lines().collect() {
        Ok(lines) => Ok(lines),
        Err(e) => {
            eprintln!("error: failed to read stdin: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Implements `sq parse`.
fn cmd_parse(queries: &[String], json: bool, canonical_only: bool) -> ExitCode {
    let mut failed = false;

    for query in queries {
        match sq_query::parse(query) {
            Ok(parsed) => {
                if json {
                    print_json(query, parsed.expression.as_ref());
                } else if canonical_only {
                    match &parsed.expression {
                        Some(expr) => println!("{}", stringify(expr)),
                        None => println!(),
                    }
                } else {
                    print_tree(query, parsed.expression.as_ref());
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Prints one query's parse as JSON on a single line.
fn print_json(query: &str, expression: Option<&QueryExpr>) {
    let output = JsonParseOutput {
        query: query.to_string(),
        ast: expression.map(JsonExpr::from),
        canonical: expression.map(stringify),
    };
    match serde_json::to_string(&output) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("error: failed to serialize output: {e}"),
    }
}

/// Prints one query's parse as an indented tree plus the canonical form.
fn print_tree(query: &str, expression: Option<&QueryExpr>) {
    println!("query: {query}");
    match expression {
        Some(expr) => {
            for line in expr.to_string().lines() {
                println!("  {line}");
            }
            println!("canonical: {}", stringify(expr));
        }
        None => println!("  (empty query)"),
    }
}

/// Implements `sq check`: silent on success, diagnostics on stderr.
fn cmd_check(queries: &[String]) -> ExitCode {
    let mut failed = false;

    for query in queries {
        if let Err(e) = sq_query::parse(query) {
            eprintln!("error: {e}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
