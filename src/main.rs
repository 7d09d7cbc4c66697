// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use the_proofreader::checker::TextChecker;
use the_proofreader::config::load_and_validate_config;
use the_proofreader::model::CheckOptions;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <config1.yaml|toml> [config2 ...] <input_text>", args[0]);
        eprintln!("Example: {} configs/demo.yaml \"This are wierd .\"", args[0]);
        eprintln!("Set RUST_LOG=debug to watch dispatch and cache decisions.");
        std::process::exit(1);
    }

    // The last argument is the input text, everything between is a config file
    let input_text = &args[args.len() - 1];
    let config_files = &args[1..args.len() - 1];

    let mut failures = 0;
    for config_file in config_files {
        if let Err(e) = run_single_config(config_file, input_text).await {
            eprintln!("Failed to check with {}: {:#}", config_file, e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} of {} configurations failed", failures, config_files.len());
    }
    Ok(())
}

async fn run_single_config(config_file: &str, input_text: &str) -> Result<()> {
    let start_time = Instant::now();

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let checker = TextChecker::from_config(&config)
        .await
        .context("starting engines")?;

    let result = checker
        .check(input_text, &CheckOptions::default())
        .await
        .context("checking text")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    for issue in &result.issues {
        let suggestion = issue.suggestions.first().map(|s| s.text.as_str()).unwrap_or("-");
        eprintln!(
            "{}:{} [{}] {} -> {}",
            issue.line,
            issue.column,
            issue.category.as_str(),
            issue.message,
            suggestion
        );
    }
    eprintln!(
        "{} issue(s) from {:?} in {:?}",
        result.issues.len(),
        result.metadata.engines_used,
        start_time.elapsed()
    );

    checker.shutdown().await;
    Ok(())
}
