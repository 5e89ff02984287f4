//! Pipes stdin through one conversion channel and prints the result.
//!
//! ```bash
//! echo "SOS SOS" | morsed encode
//! echo "... --- ..." | morsed decode --config morse.toml
//! ```
//!
//! Converted data goes to stdout, logs to stderr. `RUST_LOG` overrides the
//! configured log level.

use anyhow::{Context, anyhow, bail};
use morse_config::MorseConfig;
use morse_device::{
    AccessMode, Blocking, DeviceConfig, DeviceError, Direction, Handle, MorseDevice,
};
use morse_ring::RingConfig;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: morsed <encode|decode> [--config <path>]";

struct Args {
    direction: Direction,
    config: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut direction = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "encode" => direction = Some(Direction::Encode),
            "decode" => direction = Some(Direction::Decode),
            "--config" | "-c" => {
                config = Some(args.next().context("--config needs a path")?);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }

    let direction = direction.ok_or_else(|| anyhow!("missing direction\n{USAGE}"))?;
    Ok(Args { direction, config })
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => MorseConfig::load(path.as_str())
            .with_context(|| format!("loading config from {path}"))?,
        None => MorseConfig::default(),
    };
    init_tracing(&config.log_level);

    let device = MorseDevice::new(DeviceConfig {
        max_connections: config.max_connections,
        ring: RingConfig::new(config.buffer_capacity),
        wait_poll: Duration::from_millis(config.wait_poll_ms),
    });
    info!(
        channel = args.direction.name(),
        max_connections = config.max_connections,
        buffer_capacity = config.buffer_capacity,
        "MORSED: starting"
    );

    pump(&device, args.direction)
}

/// Feeds stdin into the channel on this thread while a second thread reads
/// converted chunks and prints them.
fn pump(device: &MorseDevice, direction: Direction) -> anyhow::Result<()> {
    let writer = device
        .attach(direction, AccessMode::Write)
        .context("attaching writer")?;
    let reader = device
        .attach(direction, AccessMode::Read)
        .context("attaching reader")?;
    let stop = reader.canceller();
    let abort_feed = writer.canceller();
    let chunk = device.config().ring.usable();

    std::thread::scope(|s| {
        let consumer = s.spawn(move || {
            let printed = print_converted(&reader, chunk);
            if printed.is_err() {
                // Nobody drains the ring any more; unblock the feeder.
                abort_feed.cancel();
            }
            printed
        });

        let fed = feed_stdin(&writer);
        // The reader drains the ring before it notices the cancellation.
        stop.cancel();

        let printed = consumer
            .join()
            .map_err(|_| anyhow!("reader thread panicked"))?;
        printed.and(fed)
    })
}

fn feed_stdin(writer: &Handle<'_>) -> anyhow::Result<()> {
    let mut stdin = std::io::stdin().lock();
    let mut buf = [0u8; 256];
    let mut total = 0usize;

    loop {
        let n = stdin.read(&mut buf).context("reading stdin")?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        total += n;
    }

    info!(bytes = total, "MORSED: stdin closed");
    Ok(())
}

fn print_converted(reader: &Handle<'_>, chunk: usize) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    loop {
        match reader.read(chunk, Blocking::Wait) {
            Ok(out) => stdout.write_all(&out).context("writing stdout")?,
            Err(DeviceError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        }
    }

    stdout.flush()?;
    Ok(())
}
