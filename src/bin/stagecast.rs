use anyhow::Context as _;
use clap::{Parser, Subcommand};

use stagecast::{EffectRegistry, Millis, Overlay, RawParams, resolve_builtin};

#[derive(Parser, Debug)]
#[command(name = "stagecast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a query string against the built-in defaults and presets.
    Resolve(ResolveArgs),
    /// Sample declarative overlay frames at fixed timestamps.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Overlay parameters as a URL-style query string.
    #[arg(long)]
    query: String,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Overlay parameters as a URL-style query string.
    #[arg(long)]
    query: String,

    /// Timestamp of the first sample, in milliseconds.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Number of frames to sample.
    #[arg(long, default_value_t = 1)]
    count: u64,

    /// Step between samples, in milliseconds.
    #[arg(long, default_value_t = 100)]
    step_ms: u64,

    /// Seed for the per-instance random palette pick.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let config = resolve_builtin(&RawParams::from_query(&args.query));
    let json = serde_json::to_string_pretty(&config).context("serialize resolved config")?;
    println!("{json}");
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let config = resolve_builtin(&RawParams::from_query(&args.query));
    let registry = EffectRegistry::with_builtins();
    let mut overlay = Overlay::new(config, &registry, args.seed, Millis(args.at_ms));

    for i in 0..args.count {
        let now = Millis(args.at_ms + i * args.step_ms);
        let frame = overlay.sample(now);
        let json = serde_json::to_string(&frame)
            .with_context(|| format!("serialize frame at {}ms", now.0))?;
        println!("{json}");
    }
    Ok(())
}
