use anyhow::Context;
use clap::Parser;
use scenario::ScenarioConfig;
use server::TelemetryServer;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod frames;
mod generator;
mod recorder;
mod scenario;
mod server;

#[derive(Parser)]
#[command(author, version, about = "Synthetic telemetry source for the dashboard")]
struct Args {
    /// Serve live SSE and MJPEG endpoints until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Record a replay session folder instead of serving
    #[arg(long)]
    record: Option<PathBuf>,
    /// Load a scenario config from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 5000)]
    port: u16,
    #[arg(long, default_value_t = 10)]
    fps: u32,
    #[arg(long, default_value_t = 100)]
    frames: u64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::from_args(args.fps, args.frames, args.seed)
    };

    if let Some(output) = args.record {
        recorder::record_session(config.clone(), &output)?;
    } else if !args.serve {
        anyhow::bail!("nothing to do; pass --serve or --record DIR");
    }

    if args.serve {
        let _server = TelemetryServer::start(config, args.port);
        println!("Telemetry server on port {} (Ctrl+C to stop)...", args.port);
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
