//! qlimits - check query strings against layered query limits
//!
//! # Usage
//!
//! ```bash
//! # Collection root of Customer
//! qlimits -c limits.yaml check --type Customer --query '$top=50&$skip=10'
//!
//! # Navigation property Customer.orders, JSON output
//! qlimits -c limits.yaml check --type Customer --property orders --query '$top=20' --json
//!
//! # Effective configuration after file and QLIMITS__* overrides
//! qlimits -c limits.yaml print-config
//! ```
//!
//! Exit status: 0 accepted, 1 rejected with a client error, 2 anything else.

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qlimits::{
    EvaluationContext, LimitsConfig, PropertyRef, QueryRequest, QueryValidator, TypeRef,
};
use qlimits_errors::Problem;

/// Check query strings against layered query limits
#[derive(Parser)]
#[command(name = "qlimits")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML limits configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query string against the configured limits
    Check {
        /// Entity or declaring type the query targets
        #[arg(long = "type", value_name = "TYPE")]
        type_name: String,

        /// Navigation property of TYPE being queried
        #[arg(long)]
        property: Option<String>,

        /// URL query string, e.g. '$top=10&$skip=5'
        #[arg(long)]
        query: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as JSON and exit
    PrintConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "qlimits failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = LimitsConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            type_name,
            property,
            query,
            json,
        } => {
            let outcome = check(&config, &type_name, property.as_deref(), &query)?;
            report(&outcome, json)
        }
    }
}

/// Validate `query` at the position described by `type_name` / `property`.
fn check(
    config: &LimitsConfig,
    type_name: &str,
    property: Option<&str>,
    query: &str,
) -> Result<Result<(), Problem>> {
    let model = config
        .build_model()
        .context("invalid model annotations")?;
    let declaring_type = TypeRef::new(type_name);
    let property = property.map(|name| PropertyRef::new(type_name, name));

    let mut context =
        EvaluationContext::new(&model, &config.defaults).with_declaring_type(&declaring_type);
    if let Some(property) = property.as_ref() {
        context = context.with_property(property);
    }

    let outcome = QueryRequest::from_query_str(query)
        .and_then(|request| QueryValidator::new().validate(&request, context, &config.settings));

    Ok(outcome.map_err(|err| {
        tracing::info!(error = %err, query, "query rejected");
        qlimits_errors::finalize(Problem::from(err), query, None)
    }))
}

fn report(outcome: &Result<(), Problem>, json: bool) -> Result<ExitCode> {
    match outcome {
        Ok(()) => {
            if json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("OK");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(problem) => {
            println!("{}", serde_json::to_string_pretty(problem)?);
            if problem.is_client_error() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::from(2))
            }
        }
    }
}
