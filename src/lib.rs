pub mod cli;
pub mod coords;
pub mod error;
pub mod flood;
pub mod framing;
pub mod message;
pub mod oracle;
pub mod registry;
pub mod server;
pub mod time;
pub mod topology;

pub use error::{GeofloodError, Result};
pub use registry::{ClientRegistry, LocationRecord, UpdateOutcome};
pub use server::Server;
pub use topology::Topology;
