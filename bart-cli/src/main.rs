mod prompt;
mod storage;
mod terminal;

use anyhow::{Context, Result};
use bart_task::{SessionController, SessionError, SessionSummary, Stopwatch, TaskConfig};
use clap::Parser;
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use storage::CsvFileSink;
use terminal::TerminalPresentation;

#[derive(Debug, Parser)]
#[command(name = "bart", version)]
#[command(about = "Run a Balloon Analogue Risk Task session in the terminal")]
struct Args {
    /// Participant identifier (prompted when omitted)
    #[arg(long)]
    participant: Option<String>,

    /// Session identifier (prompted when omitted)
    #[arg(long)]
    session: Option<String>,

    /// Seed for the balloon draw; a random one is chosen and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON task configuration; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of balloons
    #[arg(long)]
    balloons: Option<u32>,

    /// Show every balloon in a neutral colour
    #[arg(long)]
    no_type_cue: bool,

    /// Directory the session CSV is written to
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Skip feedback and inter-trial pauses
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let Some(session_info) = prompt::session_info(
        &mut stdin.lock(),
        &mut stdout.lock(),
        args.participant.clone(),
        args.session.clone(),
    )
    .context("reading session details")?
    else {
        println!("{}", "Cancelled, no session started.".yellow());
        return Ok(());
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("using seed {seed}");
    announce_banner(&config, seed);

    let mut session = SessionController::from_user_seed(&config, session_info, seed);
    let mut presentation =
        TerminalPresentation::new(stdin.lock(), stdout.lock(), config.keys.clone(), args.fast);
    let mut sink = CsvFileSink::new(&args.data_dir);

    let outcome = session.run(&mut presentation, &mut Stopwatch::new(), &mut sink);
    drop(presentation);

    let summary = match outcome {
        Ok(summary) => summary,
        Err(err @ SessionError::Persistence { .. }) => {
            warn!("{err}");
            let recovery = std::env::temp_dir().join("bart-recovery");
            let mut fallback = CsvFileSink::new(&recovery);
            session
                .retry_persist(&mut fallback)
                .with_context(|| format!("saving session log to {}", recovery.display()))?;
            report(&session.summary(), fallback.last_path());
            return Err(err).context("saving session log to the data directory");
        }
        Err(err) => return Err(err).context("running session"),
    };

    report(&summary, sink.last_path());
    Ok(())
}

fn load_config(args: &Args) -> Result<TaskConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TaskConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TaskConfig::default(),
    };
    if let Some(balloons) = args.balloons {
        config.balloons = balloons;
    }
    if args.no_type_cue {
        config.show_type_cue = false;
    }
    config.validate().context("validating task configuration")?;
    Ok(config)
}

fn announce_banner(config: &TaskConfig, seed: u64) {
    println!("{}", "🎈 BART".bright_cyan().bold());
    println!("{}", "=".repeat(30).cyan());
    println!(
        "{} balloons, seed {}, type cue {}",
        config.balloons,
        seed.to_string().bold(),
        if config.show_type_cue { "on" } else { "off" }
    );
}

fn report(summary: &SessionSummary, saved: Option<&Path>) {
    match saved {
        Some(path) => println!("Saved data to: {}", path.display().to_string().green()),
        None => println!("{}", "No trials recorded, nothing saved.".yellow()),
    }
    let total = format!("Total points: {}", summary.total_points);
    if summary.quit_early {
        println!(
            "{} ({} of the balloons completed before quitting)",
            total.bold(),
            summary.balloons_completed
        );
    } else {
        println!("{}", total.bold());
    }
}
