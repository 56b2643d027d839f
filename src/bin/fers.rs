//! CLI entry point. Scenario description parsing lives outside this crate;
//! this binary demonstrates the kernel end-to-end against a small built-in
//! `World` so the surface can be exercised without a real parser.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use num_complex::Complex64;

use fers_core::antenna::Antenna;
use fers_core::geometry::{Coord, Path, PathInterp, RotationCoord, RotationPath, RotationPathInterp, Vec3};
use fers_core::io;
use fers_core::signal::{RadarSignal, Signal};
use fers_core::world::{Fluctuation, Platform, Receiver, ReceiverFlags, Target, TargetModel, Transmitter, TransmitterMode, World};
use fers_core::GlobalParams;

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

/// The FERS radar-simulation kernel.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario script to run (unused placeholder: no scenario parser is
    /// bundled with this crate; a built-in demonstration scenario runs
    /// instead).
    scriptfile: PathBuf,

    /// Skip scenario validation before running.
    #[arg(long)]
    no_validate: bool,

    /// Emit a KML track of platform motion alongside the results.
    #[arg(long)]
    kml: bool,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Worker thread count (defaults to CPU count).
    #[arg(short = 'n', long)]
    threads: Option<usize>,

    /// Output directory for CSV/XML exports.
    #[arg(short, long, default_value = ".")]
    outdir: PathBuf,
}

fn main() {
    if let Err(e) = bin_main() {
        eprintln!("fers: error: {e}");
        if let Some(source) = e.source() {
            eprintln!("fers: caused by: {source}");
        }
        std::process::exit(1);
    }
}

fn bin_main() -> BinResult<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    if args.no_validate {
        log::warn!("--no-validate set: skipping scenario validation");
    }
    if args.kml {
        log::warn!("--kml requested but KML export is not implemented by this kernel");
    }
    log::info!("loading scenario from {}", args.scriptfile.display());

    let mut params = GlobalParams::default();
    if let Some(threads) = args.threads {
        let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        if threads > cpus {
            log::warn!("requested {threads} threads, clamping to {cpus} available CPUs");
            params.render_threads = cpus;
        } else {
            params.render_threads = threads;
        }
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(params.render_threads)
        .build_global()
        .ok();

    let world = build_demo_world(&params)?;
    let windows = fers_core::simulate(&world, &params)?;

    std::fs::create_dir_all(&args.outdir)?;
    for receiver in &world.receivers {
        let receiver = receiver.lock().expect("receiver mutex poisoned");
        if receiver.responses().is_empty() {
            log::info!("receiver {} produced no responses, skipping export", receiver.name());
            continue;
        }
        io::write_csv(&args.outdir, receiver.name(), receiver.responses())?;
        io::write_xml(&args.outdir, receiver.name(), receiver.responses(), |tx_name| {
            world.transmitters.iter().find(|t| t.name() == tx_name).map(|t| t.signal().power()).unwrap_or(1.0)
        })?;
    }

    let total_windows: usize = windows.iter().map(|r| r.windows.len()).sum();
    log::info!("simulation complete: {} receivers, {total_windows} windows assembled", windows.len());
    Ok(())
}

fn init_logging(level: &str, log_file: Option<&std::path::Path>) -> BinResult<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.parse().unwrap_or(log::LevelFilter::Info));
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// A minimal bistatic scenario: one CW transmitter, one target, one
/// receiver, all stationary. Stands in for the external scenario parser.
fn build_demo_world(params: &GlobalParams) -> BinResult<World> {
    let mut world = World::new();

    let tx_platform = static_platform("tx-site", Vec3::new(0.0, 0.0, 0.0));
    let rx_platform = static_platform("rx-site", Vec3::new(1000.0, 0.0, 0.0));
    let target_platform = static_platform("target", Vec3::new(500.0, 5000.0, 0.0));

    let p_tx = world.add_platform(tx_platform);
    let p_rx = world.add_platform(rx_platform);
    let p_target = world.add_platform(target_platform);

    let antenna = Arc::new(Antenna::Isotropic { eta: 1.0 });

    let data = vec![Complex64::new(1.0, 0.0); 64];
    let signal = Signal::load(&data, params.cw_sample_rate, params.oversample_ratio, params.render_filter_length)?;
    let radar_signal = Arc::new(RadarSignal::new("demo-pulse", 1000.0, 1e9, signal));

    let tx_timing = fers_core::clock::ClockModelGenerator::new(&[], 1e9, 0.0, 0.0, 1, params.rate, false, params.random_seed)?;
    let transmitter = Transmitter::new("demo-tx", p_tx, antenna.clone(), radar_signal, TransmitterMode::Cw, tx_timing, None);
    world.add_transmitter(transmitter);

    let rx_timing = fers_core::clock::ClockModelGenerator::new(&[], 1e9, 0.0, 0.0, 1, params.rate, false, params.random_seed.wrapping_add(1))?;
    let receiver = Receiver::new(
        "demo-rx",
        p_rx,
        antenna,
        290.0,
        1e-4,
        1e3,
        0.0,
        rx_timing,
        ReceiverFlags::NONE,
        None,
        params.random_seed.wrapping_add(2),
    );
    world.add_receiver(receiver)?;

    world.add_target(Target::new("demo-target", p_target, TargetModel::Iso { rcs: 10.0 }, Fluctuation::constant()));

    Ok(world)
}

fn static_platform(name: &str, pos: Vec3) -> Platform {
    let mut path = Path::new(PathInterp::Static);
    path.add_coord(Coord::new(pos, 0.0));
    path.finalize().expect("single-coord static path always finalises");

    let mut rotation = RotationPath::new(RotationPathInterp::Static);
    rotation.add_coord(RotationCoord::new(0.0, 0.0, 0.0));
    rotation.finalize().expect("single-coord static rotation always finalises");

    Platform::new(name, path, rotation)
}
