// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use tasktronaut::backends::memory::InMemoryBackend;
use tasktronaut::config::{load_config, Config};
use tasktronaut::demo::{self, Onboarding};
use tasktronaut::observability::init_tracing;
use tasktronaut::process::{BuildArgs, Options};
use tasktronaut::traits::ProcessDefinition;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        eprintln!("Usage: {} [config.yaml|config.toml] [name] [seats]", args[0]);
        eprintln!("Example: {} configs/demo.yaml Ada 3", args[0]);
        return Ok(());
    }

    let config = match args.get(1) {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    init_tracing(&config.logging)?;

    let name = args.get(2).map(String::as_str).unwrap_or("Ada");
    let seats: u64 = match args.get(3) {
        Some(seats) => seats.parse()?,
        None => 2,
    };

    println!("Tasktronaut Onboarding Demo");
    println!("═══════════════════════════");

    let process = match Onboarding::build(
        BuildArgs::new()
            .options(config.build_options(Options::new()))
            .arg("name", name)
            .arg("seats", seats),
    ) {
        Ok(process) => process,
        Err(error) if error.is_validation() => {
            eprintln!("Invalid arguments: {}", error);
            eprintln!("Usage: {} [config.yaml|config.toml] [name] [seats]", args[0]);
            std::process::exit(2);
        }
        Err(error) => return Err(error.into()),
    };
    println!("Built {}", process);
    for step in process.steps() {
        println!("  {} ({})", step, step.description().unwrap_or("-"));
    }

    let backend = InMemoryBackend::new();
    process.enqueue(&backend).await?;

    println!();
    println!("Compiled {} units:", backend.len().await);
    for unit in backend.units().await {
        println!("  {}", unit);
    }

    let registry = demo::registry().with_config(&config.definitions);
    let report = backend.run_pending(&registry).await;

    println!();
    println!("Run report: {}", report);
    for failure in &report.failures {
        eprintln!("  {} failed: {}", failure.id, failure.error);
    }

    Ok(())
}
