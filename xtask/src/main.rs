use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the clinic simulation workspace",
    long_about = "A unified CLI for running clinic simulations, replication sweeps,\n\
                  benchmarks, and CI checks in this workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reference clinic and print the queue table
    Run {
        /// JSON file with clinic parameters (defaults to the reference clinic)
        #[arg(long, env = "CLINIC_CONFIG")]
        config: Option<String>,
        /// Directory for Parquet exports
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Run the staffing sweep with replications
    Sweep {
        /// Directory for CSV/JSON results
        #[arg(long, default_value = "sweep_results")]
        out_dir: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in clinic_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the examples
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn spawn(program: &str, args: &[&str]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program).args(args).status() {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute {program}: {error}");
            exit(1);
        }
    }
}

fn run_cargo(args: &[&str]) {
    let status = spawn("cargo", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = spawn("git", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "clinic_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test clinic_core");
    run_cargo(&["test", "-p", "clinic_core"]);

    step("Test clinic_experiments");
    run_cargo(&["test", "-p", "clinic_experiments"]);
}

fn ci_examples() {
    step("Run scenario_run (reference clinic)");
    run_cargo(&[
        "run",
        "-p",
        "clinic_core",
        "--example",
        "scenario_run",
        "--release",
    ]);

    step("Run replication_sweep");
    run_cargo(&[
        "run",
        "-p",
        "clinic_experiments",
        "--example",
        "replication_sweep",
        "--release",
        "--",
        "target/ci_sweep_results",
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, out_dir } => {
            let mut args = vec![
                "run",
                "-p",
                "clinic_core",
                "--example",
                "scenario_run",
                "--release",
            ];
            if config.is_some() || out_dir.is_some() {
                args.push("--");
                // Positional: config path, then output directory.
                match (&config, &out_dir) {
                    (Some(config), Some(out_dir)) => {
                        args.push(config);
                        args.push(out_dir);
                    }
                    (Some(config), None) => args.push(config),
                    (None, Some(_)) => {
                        eprintln!("--out-dir requires --config");
                        exit(2);
                    }
                    (None, None) => {}
                }
            }
            run_cargo(&args);
        }
        Commands::Sweep { out_dir } => {
            run_cargo(&[
                "run",
                "-p",
                "clinic_experiments",
                "--example",
                "replication_sweep",
                "--release",
                "--",
                &out_dir,
            ]);
        }
        Commands::Bench => run_bench(&[]),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                if let Err(error) = std::fs::remove_dir_all(baseline_dir) {
                    eprintln!("failed to remove target/criterion: {error}");
                    exit(1);
                }
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_bench(&["--save-baseline", "main"]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_bench(&["--baseline", "main"]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "clinic_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
