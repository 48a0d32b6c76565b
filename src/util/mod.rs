pub mod clock;
pub mod partition;
pub mod serde;
pub mod telemetry;

pub use clock::*;
pub use partition::*;
pub use serde::*;
pub use telemetry::*;
