//! tower — command-line driver for the rust_lift dispatch simulator.
//!
//! Runs a fleet of cars in one building against scripted and/or random
//! traffic, logs every dispatch decision, optionally writes CSV output, and
//! prints the final policy comparison.
//!
//! ```text
//! tower --ticks 3000 --rate 0.02 --out output/tower
//! tower --script calls.csv --hold --release-at 600 --json
//! RUST_LOG=debug tower --config building.json
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use lift_core::{Request, SimConfig, SimRng, Tick, UnitId};
use lift_output::{CsvWriter, SimOutputObserver};
use lift_schedule::{
    ChainedTraffic, RandomTraffic, ScheduledCall, TrafficScript, TrafficSource, TrafficSourceExt, load_traffic_csv,
};
use lift_sim::{DispatchRecord, NoopObserver, Sim, SimBuilder, SimError, SimObserver, SimView};
use lift_unit::Completion;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "tower")]
#[command(about = "Elevator dispatch simulation with a side-by-side policy comparison")]
struct Args {
    /// JSON file with a `SimConfig`; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to simulate (overrides the config file).
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for generated traffic (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// CSV traffic script: `tick,origin,destination,party_size`.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Probability of a random call on each tick.
    #[arg(long, default_value = "0")]
    rate: f64,

    /// Start with hold mode on.
    #[arg(long)]
    hold: bool,

    /// Release the hold buffer at this tick.
    #[arg(long)]
    release_at: Option<u64>,

    /// Sleep `tick_duration_ms` after each tick.
    #[arg(long)]
    realtime: bool,

    /// Write CSV output into this directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Snapshot interval for CSV output, in ticks.
    #[arg(long, default_value = "50")]
    snapshot_every: u64,

    /// Print the final view as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ── Console observer ──────────────────────────────────────────────────────────

/// Counts and logs tick-loop activity, then forwards to `inner`.
struct ConsoleObserver<O: SimObserver> {
    inner:      O,
    tick_pause: Option<Duration>,
    dispatched: usize,
    held:       usize,
    rejected:   usize,
    completed:  usize,
    dropped:    usize,
}

impl<O: SimObserver> ConsoleObserver<O> {
    fn new(inner: O, tick_pause: Option<Duration>) -> Self {
        Self { inner, tick_pause, dispatched: 0, held: 0, rejected: 0, completed: 0, dropped: 0 }
    }
}

impl<O: SimObserver> SimObserver for ConsoleObserver<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, handled: usize) {
        self.inner.on_tick_end(tick, handled);
        if let Some(pause) = self.tick_pause {
            thread::sleep(pause);
        }
    }

    fn on_dispatch(&mut self, record: &DispatchRecord) {
        self.dispatched += 1;
        info!("{} request {} → {}", record.at, record.request.id, record.reason());
        self.inner.on_dispatch(record);
    }

    fn on_held(&mut self, tick: Tick, request: &Request, pending: usize) {
        self.held += 1;
        info!("{tick} request {} held ({pending} pending)", request.id);
        self.inner.on_held(tick, request, pending);
    }

    fn on_rejected(&mut self, tick: Tick, call: &ScheduledCall, error: &SimError) {
        self.rejected += 1;
        warn!("{tick} rejected {}→{} x{}: {error}", call.origin, call.destination, call.party_size);
        self.inner.on_rejected(tick, call, error);
    }

    fn on_completion(&mut self, completion: &Completion) {
        self.completed += 1;
        self.inner.on_completion(completion);
    }

    fn on_dropped(&mut self, tick: Tick, unit: UnitId, request: &Request) {
        self.dropped += 1;
        warn!("{tick} {unit} dropped request {}", request.id);
        self.inner.on_dropped(tick, unit, request);
    }

    fn on_snapshot(&mut self, tick: Tick, view: &SimView) {
        self.inner.on_snapshot(tick, view);
    }

    fn on_sim_end(&mut self, final_tick: Tick, view: &SimView) {
        self.inner.on_sim_end(final_tick, view);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig { total_ticks: 3_000, seed: 42, ..SimConfig::default() },
    };
    if let Some(ticks) = args.ticks {
        config.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.out.is_some() {
        config.output_interval_ticks = args.snapshot_every;
    }
    Ok(config)
}

fn build_traffic(args: &Args, config: &SimConfig) -> Result<ChainedTraffic<TrafficScript, RandomTraffic>> {
    let script = match &args.script {
        Some(path) => load_traffic_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => TrafficScript::new(Vec::new()),
    };
    let random = RandomTraffic::new(args.rate, config.building.clone(), SimRng::new(config.seed))?;
    info!("traffic: {} scripted calls, random rate {}", script.len(), args.rate);
    Ok(script.and(random))
}

/// Ticks to run before releasing the hold buffer, or `None` when the release
/// tick is not inside the run.  A release at or past `total_ticks` would
/// schedule its paced dispatches after the loop has stopped.
fn release_lead(release_at: u64, now: u64, total_ticks: u64) -> Option<u64> {
    (release_at < total_ticks).then(|| release_at.saturating_sub(now))
}

fn run<T: TrafficSource, O: SimObserver>(sim: &mut Sim<T>, args: &Args, obs: &mut O) {
    if let Some(at) = args.release_at {
        match release_lead(at, sim.now().0, sim.config().total_ticks) {
            Some(lead) => {
                sim.run_ticks(lead, obs);
                let released = sim.release();
                info!("{} released {released} held requests", sim.now());
            }
            None => warn!(
                "--release-at {at} is not before the end of the run (tick {}); held requests stay pending",
                sim.config().total_ticks
            ),
        }
    }
    sim.run(obs);
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let b = &config.building;
    info!(
        "{} floors, {} units, standby floors {:?}, {} ticks of {} ms",
        b.floors,
        b.units,
        b.standby_floors(),
        config.total_ticks,
        config.timing.tick_duration_ms
    );

    let traffic = build_traffic(&args, &config)?;
    let mut sim = SimBuilder::new(config.clone()).traffic(traffic).hold(args.hold).build()?;

    let pause = args
        .realtime
        .then(|| Duration::from_millis(config.timing.tick_duration_ms as u64));

    let t0 = Instant::now();
    let counts = match &args.out {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let writer = CsvWriter::new(Path::new(dir))?;
            let mut obs = ConsoleObserver::new(SimOutputObserver::new(writer, &config), pause);
            run(&mut sim, &args, &mut obs);
            if let Some(e) = obs.inner.take_error() {
                eprintln!("output error: {e}");
            }
            info!("{} completion rows written to {}", obs.inner.completions(), dir.display());
            [obs.dispatched, obs.held, obs.rejected, obs.completed, obs.dropped]
        }
        None => {
            let mut obs = ConsoleObserver::new(NoopObserver, pause);
            run(&mut sim, &args, &mut obs);
            [obs.dispatched, obs.held, obs.rejected, obs.completed, obs.dropped]
        }
    };
    let elapsed = t0.elapsed();

    let view = sim.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let [dispatched, held, rejected, completed, dropped] = counts;
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock());
    println!(
        "  dispatched {dispatched}  held {held}  rejected {rejected}  completed {completed}  dropped {dropped}"
    );
    println!("  still pending in hold buffer: {}", view.pending);
    println!();

    println!("{:<8} {:<6} {:<22} {:<7} {:<10} {:<10}", "Unit", "Floor", "Phase", "Served", "Avg wait", "Distance");
    println!("{}", "-".repeat(68));
    for u in &view.units {
        println!(
            "{:<8} {:<6} {:<22} {:<7} {:<10.1} {:<10.1}",
            u.id.0,
            u.floor,
            u.phase.to_string(),
            u.served,
            u.avg_wait_secs,
            u.distance_m
        );
    }
    println!();

    println!("{:<16} {:<9} {:<12}", "Policy", "Requests", "Avg wait (s)");
    println!("{}", "-".repeat(38));
    for row in &view.comparison {
        println!("{:<16} {:<9} {:<12.1}", row.policy.name(), row.requests, row.avg_wait_secs);
    }

    Ok(())
}
