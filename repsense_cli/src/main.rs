use clap::{Parser, Subcommand};
use repsense_core::*;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repsense")]
#[command(about = "Pose-based exercise rep counter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported exercises
    List,

    /// Replay a recorded pose stream through an exercise session
    Run {
        /// Exercise id (pushups, squats, jumpingjacks, plank)
        #[arg(long, short)]
        exercise: String,

        /// JSON-lines recording; stdin when omitted or "-"
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Use the landscape framing region
        #[arg(long)]
        landscape: bool,

        /// Print every metric snapshot as it changes
        #[arg(long)]
        follow: bool,

        /// Print overlay snapshots
        #[arg(long)]
        overlay: bool,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,

        /// Config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

struct RunOptions {
    exercise: String,
    input: Option<PathBuf>,
    landscape: bool,
    follow: bool,
    overlay: bool,
    json: bool,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    repsense_core::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Run {
            exercise,
            input,
            landscape,
            follow,
            overlay,
            json,
            config,
        } => cmd_run(RunOptions {
            exercise,
            input,
            landscape,
            follow,
            overlay,
            json,
            config,
        }),
    }
}

fn cmd_list() -> Result<()> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid catalog".into()));
    }

    for info in catalog.sorted() {
        println!(
            "{:<14}{:<28}{}s",
            info.id.as_str(),
            info.title,
            info.time_limit.as_secs()
        );
        println!("              {}", info.description);
    }
    Ok(())
}

fn cmd_run(opts: RunOptions) -> Result<()> {
    let config = match &opts.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Resolve the exercise before touching the input
    let info = lookup(&opts.exercise)?;

    let mut dispatcher = Dispatcher::new(config)?;
    if opts.landscape {
        dispatcher.set_orientation(Orientation::Landscape);
    }
    let mut metrics = dispatcher.metrics();
    let mut overlays = dispatcher.overlays();
    let final_metric = dispatcher.metrics();
    dispatcher.start_exercise(info.id)?;

    let mut source: Box<dyn PoseSource> = match &opts.input {
        Some(path) if path.as_os_str() != "-" => Box::new(JsonlSource::open(path)?),
        _ => Box::new(JsonlSource::new(io::stdin().lock())),
    };

    let stats = FrameLoop::new().run_with(&mut source, &mut dispatcher, |_| {
        if opts.follow {
            if let Some(metric) = metrics.fresh() {
                print_metric(&metric, opts.json);
            }
        }
        if opts.overlay {
            if let Some(overlay) = overlays.fresh() {
                print_overlay(&overlay, opts.json);
            }
        }
    });

    // A time-limited session has already published its final snapshot
    let metric = dispatcher
        .stop()
        .or_else(|| final_metric.latest())
        .unwrap_or_else(|| Metric::new(info.id, 0));

    let report = SessionReport {
        session_id: uuid::Uuid::new_v4(),
        exercise: info.id,
        title: info.title.clone(),
        metric,
        frames_evaluated: dispatcher.frames_evaluated(),
        source_failures: stats.source_failures,
        finished_at: chrono::Utc::now(),
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report);
    }
    Ok(())
}

fn print_metric(metric: &Metric, json: bool) {
    if json {
        match serde_json::to_string(metric) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to encode metric: {}", e),
        }
    } else {
        println!("  {} {}", metric.value, unit_label(metric.unit));
    }
}

fn print_overlay(overlay: &OverlayState, json: bool) {
    if json {
        match serde_json::to_string(overlay) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to encode overlay: {}", e),
        }
        return;
    }

    let mut line = format!("  [framing: {:?}]", overlay.frame_quality);
    if let Some(hint) = overlay.distance_hint {
        line.push_str(&format!(" {}", hint));
    }
    if let Some(hint) = overlay.posture_hint {
        line.push_str(&format!(" {}", hint));
    }
    println!("{}", line);
}

fn unit_label(unit: MetricUnit) -> &'static str {
    match unit {
        MetricUnit::Reps => "reps",
        MetricUnit::Seconds => "s",
    }
}

fn display_report(report: &SessionReport) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", report.title);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Result: {} {}",
        report.metric.value,
        unit_label(report.metric.unit)
    );
    println!("  Frames evaluated: {}", report.frames_evaluated);
    if report.source_failures > 0 {
        println!("  Failed detections: {}", report.source_failures);
    }
    println!("  Session: {}", report.session_id);
    println!();
}
