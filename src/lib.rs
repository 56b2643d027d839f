//! `fers-core`: the FERS radar-simulation kernel. Given a fully built
//! `World` and `GlobalParams`, runs the simulation scheduler and the
//! reception-window assembler, and exposes the output data contracts
//! (`io`) the results are serialised through.
//!
//! Scenario parsing (XML/JSON) is an external collaborator; this crate
//! starts from an already-built [`world::World`].

pub mod antenna;
pub mod clock;
pub mod error;
pub mod geometry;
pub mod interp;
pub mod io;
pub mod noise;
pub mod params;
pub mod response;
pub mod rng;
pub mod scheduler;
pub mod signal;
pub mod window;
pub mod world;

pub use error::FersError;
pub use interp::DEFAULT_FILTER_BANK;
pub use params::GlobalParams;
pub use window::{ReceiverWindows, Window};
pub use world::World;

/// Runs the full kernel against a built `World`: the scheduler followed by
/// window assembly, against the process-wide default filter bank.
pub fn simulate(world: &World, params: &GlobalParams) -> Result<Vec<ReceiverWindows>, FersError> {
    scheduler::run(world, params)?;
    let filter_bank = interp::FilterBank::build(params.render_filter_length);
    let windows = window::run(world, params, &filter_bank)?;
    Ok(windows)
}
