//! Top-level error type aggregating each subsystem's `thiserror` enum:
//! small per-module enums composed together with `#[from]`.

use thiserror::Error;

use crate::antenna::AntennaError;
use crate::clock::ClockError;
use crate::geometry::{PathError, RotationPathError};
use crate::interp::InterpError;
use crate::io::IoError;
use crate::response::ResponseError;
use crate::scheduler::SchedulerError;
use crate::window::WindowError;
use crate::world::WorldError;

#[derive(Debug, Error)]
pub enum FersError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    RotationPath(#[from] RotationPathError),
    #[error(transparent)]
    Interp(#[from] InterpError),
    #[error(transparent)]
    Antenna(#[from] AntennaError),
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Io(#[from] IoError),
}
