use std::path::PathBuf;
use std::process::ExitCode;

use benchmark_selection::{run, FamilyChoice, RulesConfig, RunRequest, SelectionConfig, SelectionError};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "selection", version, about = "Select competition benchmarks from results exports")]
struct Cli {
    /// Results export listing this year's new benchmarks.
    #[arg(long = "new_csv", alias = "new-csv", value_name = "PATH")]
    new_csv: PathBuf,
    /// Results export of the prior year. Omitted or empty means no prior benchmarks.
    #[arg(long = "old_csv", alias = "old-csv", value_name = "PATH")]
    old_csv: Option<PathBuf>,
    /// Seed of the pseudo-random draw.
    #[arg(long)]
    seed: Option<u64>,
    /// File receiving the selected names, one per line.
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
    /// Apply the eligibility filters.
    #[arg(long, value_enum, default_value_t = Toggle::Off)]
    filter: Toggle,
    /// Which directory names a benchmark family.
    #[arg(long, value_enum, default_value_t = FamilyArg::Bot)]
    family: FamilyArg,
    /// Only select from these divisions.
    #[arg(long, value_delimiter = ',', value_name = "DIVISION")]
    divisions: Vec<String>,
    /// JSON file overriding the default rule constants.
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,
    /// Also write a JSON manifest describing the run.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FamilyArg {
    Top,
    Bot,
}

impl From<FamilyArg> for FamilyChoice {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Top => FamilyChoice::Top,
            FamilyArg::Bot => FamilyChoice::Bot,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn request(cli: Cli) -> Result<RunRequest, SelectionError> {
    let rules = match &cli.rules {
        Some(path) => RulesConfig::from_json_file(path)?,
        None => RulesConfig::default(),
    };
    let config = SelectionConfig::new(cli.seed)?
        .with_filter(cli.filter == Toggle::On)
        .with_family(cli.family.into())
        .with_divisions(cli.divisions)
        .with_rules(rules);

    Ok(RunRequest {
        new_csv: cli.new_csv,
        old_csv: cli.old_csv,
        out: cli.out,
        manifest: cli.manifest,
        config,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "parsed arguments");

    match request(cli).and_then(|request| run(&request)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
