use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use candle_core::{DType, Device, Var};
use candle_nn::{Optimizer, SGD};
use clap::{Parser, Subcommand};

use lrsched_common::LrSchedulerConfig;
use lrsched_train::{CandleOptimizer, InverseSqrtSchedule, SchedulerKind, WarmupInitLr};

#[derive(Parser, Debug)]
#[command(name = "lrsched", about = "Inspect inverse-sqrt learning rate schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the learning rate for every K-th update as CSV.
    Curve(CurveArgs),
    /// Show the constants derived from a schedule configuration.
    Inspect(InspectArgs),
    /// Write the default schedule configuration as JSON.
    InitConfig(InitConfigArgs),
}

// ── Shared schedule flags ──────────────────────────────────────────────────────

/// Flags override values from `--config`, which override the built-in defaults
/// (`--lr 5e-4 --warmup-updates 4000 --warmup-init-lr 0 --hidden-layer-size 1024`).
#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// JSON schedule config to start from.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "vaswani")]
    lr_scheduler: String,
    /// Target learning rate; inverse-sqrt accepts exactly one.
    #[arg(long, num_args = 1..)]
    lr: Vec<f64>,
    /// Warmup the learning rate linearly for the first N updates.
    #[arg(long, value_name = "N")]
    warmup_updates: Option<u64>,
    /// Negative means "use --lr".
    #[arg(long, value_name = "LR", allow_negative_numbers = true)]
    warmup_init_lr: Option<f64>,
    #[arg(long, value_name = "HL")]
    hidden_layer_size: Option<u64>,
}

impl ScheduleArgs {
    fn resolve(&self) -> Result<LrSchedulerConfig> {
        let mut config = match &self.config {
            Some(path) => LrSchedulerConfig::load(path)?,
            None => LrSchedulerConfig::default(),
        };
        if !self.lr.is_empty() {
            config.lr = self.lr.clone();
        }
        if let Some(n) = self.warmup_updates {
            config.warmup_updates = n;
        }
        if let Some(lr) = self.warmup_init_lr {
            config.warmup_init_lr = lr;
        }
        if let Some(hl) = self.hidden_layer_size {
            config.hidden_layer_size = hl;
        }
        Ok(config)
    }

    fn kind(&self) -> Result<SchedulerKind> {
        Ok(self.lr_scheduler.parse()?)
    }
}

// ── Curve ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct CurveArgs {
    #[command(flatten)]
    schedule: ScheduleArgs,
    #[arg(long, default_value = "20000")]
    max_updates: u64,
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    every: u64,
    /// CSV destination (stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,
}

// ── Inspect / InitConfig ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    schedule: ScheduleArgs,
}

#[derive(Parser, Debug)]
struct InitConfigArgs {
    #[arg(long, default_value = "schedule.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Curve(args) => run_curve(args),
        Command::Inspect(args) => run_inspect(args),
        Command::InitConfig(args) => run_init_config(args),
    }
}

/// Single-parameter SGD on the CPU; only its learning rate matters here.
fn probe_optimizer() -> Result<CandleOptimizer<SGD>> {
    let var = Var::zeros(1, DType::F32, &Device::Cpu)?;
    Ok(CandleOptimizer::new(SGD::new(vec![var], 0.0)?))
}

fn run_curve(args: CurveArgs) -> Result<()> {
    let config = args.schedule.resolve()?;
    let kind = args.schedule.kind()?;
    let mut scheduler = kind.build(&config, probe_optimizer()?)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    writeln!(out, "num_updates,lr")?;

    let mut rows = 0usize;
    for num_updates in 0..=args.max_updates {
        let lr = scheduler.step_update(num_updates);
        if num_updates % args.every == 0 || num_updates == args.max_updates {
            writeln!(out, "{num_updates},{lr:e}")?;
            rows += 1;
        }
    }
    out.flush()?;

    tracing::info!(
        scheduler = %kind,
        rows,
        final_lr = scheduler.get_lr(),
        "curve written"
    );
    if let Some(path) = &args.output {
        eprintln!("Wrote {rows} rows to {}", path.display());
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let config = args.schedule.resolve()?;
    match args.schedule.kind()? {
        SchedulerKind::Vaswani => {
            let sched = InverseSqrtSchedule::new(&config, probe_optimizer()?)?;
            let (warmup_init_lr, warmup_init_source) = match sched.warmup_init() {
                WarmupInitLr::TargetFallback(lr) => (lr, "lr"),
                WarmupInitLr::Overridden { applied, .. } => (applied, "warmup_updates^-1.5"),
            };
            tracing::info!(
                scheduler = "vaswani",
                warmup_updates = config.warmup_updates,
                hidden_layer_size = config.hidden_layer_size,
                d_model_factor = sched.d_model_factor(),
                warmup_slope = sched.warmup_slope(),
                warmup_init_lr,
                warmup_init_source,
                initial_lr = sched.initial_lr(),
                peak_lr = sched.peak_lr(),
                crossover = sched.crossover(),
                "derived schedule constants"
            );
        }
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    LrSchedulerConfig::default().save(&args.output)?;
    eprintln!("Created default config at {}", args.output.display());
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
