//! Scenario data model: platforms, targets, transmitters, receivers, and the
//! owning `World` container. Scenario *parsing* (XML/JSON) is an external
//! collaborator — this module only holds the already-built object graph.

mod platform;
mod radar_objects;
mod target;
mod world;

pub use platform::Platform;
pub use radar_objects::{snap_prf, Receiver, ReceiverFlags, Transmitter, TransmitterMode};
pub use target::{Fluctuation, Target, TargetModel};
pub use world::{TimingPrototype, World, WorldError};
