//! Contract registry validator.
//!
//! Exit codes: 0 ok, 1 no contracts, 2 validation errors, 3 golden check failed,
//! 4 any other error (unreadable golden file, I/O failure).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ren_core::contracts::{ContractError, ContractIssue, ContractRegistry, GoldenHashes, GOLDEN_FILE};

const EXIT_NO_CONTRACTS: u8 = 1;
const EXIT_VALIDATION: u8 = 2;
const EXIT_GOLDEN: u8 = 3;
const EXIT_ERROR: u8 = 4;

#[derive(Parser)]
#[command(
    name = "ren-contracts",
    about = "Validate versioned contracts, their example fixtures and golden hashes",
    version
)]
struct Cli {
    /// Contracts directory
    #[arg(long, env = "REN_CONTRACTS_DIR", default_value = "contracts")]
    dir: PathBuf,

    /// Fail if any contract is missing from the golden map or its hash differs
    #[arg(long)]
    check_golden: bool,

    /// Pin hashes for contract versions not yet in the golden map
    #[arg(long)]
    update_golden: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let registry = match ContractRegistry::open(&cli.dir) {
        Ok(registry) => registry,
        Err(ContractError::DirectoryNotFound(dir)) => {
            eprintln!("No contracts found: {} does not exist.", dir.display());
            return Ok(ExitCode::from(EXIT_NO_CONTRACTS));
        }
        Err(e) => return Err(e.into()),
    };

    if registry.is_empty() {
        eprintln!("No contracts found in {}.", cli.dir.display());
        return Ok(ExitCode::from(EXIT_NO_CONTRACTS));
    }

    let issues = registry.validate();
    if !issues.is_empty() {
        report("Validation errors:", &issues);
        return Ok(ExitCode::from(EXIT_VALIDATION));
    }

    let golden_path = cli.dir.join(GOLDEN_FILE);
    let mut golden = GoldenHashes::load(&golden_path)
        .with_context(|| format!("Failed to load {}", golden_path.display()))?;

    if cli.update_golden {
        match golden.update(&registry, Utc::now()) {
            Ok(added) if added.is_empty() => println!("Golden map already up to date."),
            Ok(added) => {
                golden
                    .save(&golden_path)
                    .with_context(|| format!("Failed to write {}", golden_path.display()))?;
                println!(
                    "Golden map updated ({}): {}",
                    golden_path.display(),
                    added.join(", ")
                );
            }
            Err(e @ ContractError::ImmutableVersion { .. }) => {
                println!("Golden check failed:");
                println!(" - [GOLDEN] {}", e);
                return Ok(ExitCode::from(EXIT_GOLDEN));
            }
            Err(e) => return Err(e.into()),
        }
    }

    if cli.check_golden {
        let issues = golden.check(&registry);
        if !issues.is_empty() {
            report("Golden check failed:", &issues);
            return Ok(ExitCode::from(EXIT_GOLDEN));
        }
    }

    println!(
        "OK: {} contracts validated; examples OK; golden {}.",
        registry.contracts().len(),
        if cli.check_golden { "checked" } else { "skipped" }
    );
    Ok(ExitCode::SUCCESS)
}

fn report(header: &str, issues: &[ContractIssue]) {
    println!("{}", header);
    for issue in issues {
        println!(" - {}", issue);
    }
}
