//! nodestatd - socket statistics and Ganglia metrics exporter daemon.
//!
//! Polls the enabled collectors on a fixed interval and writes all gauges in
//! the Prometheus text format (or as JSON lines) to stdout or to a textfile
//! that is atomically replaced on every cycle.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use nodestat::collector::{
    Collector, GangliaCollector, GangliaConfig, RealFs, SockStatCollector, SockStatConfig,
};
use nodestat::metrics::{MetricSample, PrometheusRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CollectorKind {
    /// `/proc/net/sockstat`
    Sockstat,
    /// Ganglia gmond XML over TCP
    Gmond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Prometheus text exposition format.
    Prometheus,
    /// One JSON object per sample.
    Json,
}

/// Socket statistics and Ganglia metrics exporter.
#[derive(Parser)]
#[command(name = "nodestatd", about = "Sockstat and Ganglia metrics exporter", version)]
struct Args {
    /// Collection interval in seconds.
    #[arg(short, long, default_value = "15")]
    interval: u64,

    /// Run a single collection cycle and exit.
    #[arg(long)]
    once: bool,

    /// Collectors to enable.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [CollectorKind::Sockstat, CollectorKind::Gmond]
    )]
    collectors: Vec<CollectorKind>,

    /// Path to /proc filesystem.
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Metric namespace for sockstat gauges.
    #[arg(long, default_value = "node")]
    namespace: String,

    /// gmond address (host:port).
    #[arg(long, default_value = "127.0.0.1:8649")]
    gmond_address: String,

    /// gmond connect and read timeout in seconds.
    #[arg(long, default_value = "30")]
    gmond_timeout: u64,

    /// Textfile to replace on every cycle. Writes to stdout when absent.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "prometheus")]
    format: OutputFormat,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["nodestatd", "nodestat"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_collectors(args: &Args, registry: &PrometheusRegistry) -> Vec<Box<dyn Collector>> {
    let mut collectors: Vec<Box<dyn Collector>> = Vec::new();

    for kind in &args.collectors {
        match kind {
            CollectorKind::Sockstat => {
                let config = SockStatConfig {
                    proc_path: args.proc_path.clone(),
                    namespace: args.namespace.clone(),
                };
                let collector = SockStatCollector::new(RealFs::new(), registry.clone(), config);
                if collector.is_available() {
                    info!("Sockstat collector: enabled ({})", collector.path().display());
                } else {
                    warn!(
                        "Sockstat collector: {} not found, polls will fail",
                        collector.path().display()
                    );
                }
                collectors.push(Box::new(collector));
            }
            CollectorKind::Gmond => {
                let config = GangliaConfig {
                    address: args.gmond_address.clone(),
                    timeout: Duration::from_secs(args.gmond_timeout),
                };
                info!(
                    "Gmond collector: enabled ({}, timeout {}s)",
                    config.address, args.gmond_timeout
                );
                collectors.push(Box::new(GangliaCollector::new(config, registry.clone())));
            }
        }
    }

    collectors
}

#[derive(Serialize)]
struct JsonSample<'a> {
    timestamp: i64,
    collector: &'a str,
    #[serde(flatten)]
    sample: &'a MetricSample,
}

/// Renders the samples of one cycle as JSON lines.
fn render_json(timestamp: i64, samples: &[(&str, MetricSample)]) -> io::Result<String> {
    let mut out = String::new();
    for (collector, sample) in samples {
        let line = serde_json::to_string(&JsonSample {
            timestamp,
            collector,
            sample,
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Atomically replaces `path` with `content`.
fn write_textfile(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Polls every collector once. Returns the samples and the number of failures.
fn run_cycle(collectors: &mut [Box<dyn Collector>]) -> (Vec<(&'static str, MetricSample)>, usize) {
    let mut samples = Vec::new();
    let mut failures = 0;

    for collector in collectors.iter_mut() {
        let name = collector.name();
        let started = Instant::now();
        match collector.poll() {
            Ok(polled) => {
                debug!(
                    "Collector {}: {} updates in {:?}",
                    name,
                    polled.len(),
                    started.elapsed()
                );
                samples.extend(polled.into_iter().map(|s| (name, s)));
            }
            Err(e) => {
                failures += 1;
                warn!("Collector {} failed after {:?}: {}", name, started.elapsed(), e);
            }
        }
    }

    (samples, failures)
}

fn emit(args: &Args, registry: &PrometheusRegistry, samples: &[(&str, MetricSample)]) -> io::Result<()> {
    let content = match args.format {
        OutputFormat::Prometheus => registry
            .render()
            .map_err(|e| io::Error::other(e.to_string()))?,
        OutputFormat::Json => render_json(Utc::now().timestamp(), samples)?,
    };

    match &args.output {
        Some(path) => write_textfile(path, &content),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()
        }
    }
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("nodestatd {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, collectors={:?}, output={}",
        args.interval,
        args.collectors,
        args.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );

    let registry = PrometheusRegistry::new();
    let mut collectors = build_collectors(&args, &registry);
    if collectors.is_empty() {
        error!("No collectors enabled");
        std::process::exit(2);
    }

    if args.once {
        let (samples, failures) = run_cycle(&mut collectors);
        if let Err(e) = emit(&args, &registry, &samples) {
            error!("Failed to write metrics: {}", e);
            std::process::exit(1);
        }
        if failures > 0 {
            std::process::exit(1);
        }
        return;
    }

    let interval = Duration::from_secs(args.interval);

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting collection loop");
    let mut cycle: u64 = 0;

    while running.load(Ordering::SeqCst) {
        cycle += 1;
        let (samples, failures) = run_cycle(&mut collectors);
        info!(
            "Cycle #{}: {} samples, {} failed collectors",
            cycle,
            samples.len(),
            failures
        );

        if let Err(e) = emit(&args, &registry, &samples) {
            error!("Failed to write metrics: {}", e);
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutdown complete");
}
