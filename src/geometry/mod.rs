//! 3-D vector algebra and time-indexed motion/rotation paths.

mod coord;
mod path;
mod rotation_path;
mod spline1d;
mod vector;

pub use coord::{Coord, RotationCoord};
pub use path::{Path, PathError, PathInterp};
pub use rotation_path::{RotationPath, RotationPathError, RotationPathInterp};
pub use vector::{angle_between, SVec3, Vec3};
