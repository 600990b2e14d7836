pub mod clock;
pub mod errors;
pub mod shutdown;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, InfraError};
pub use shutdown::{listen_for_shutdown_signals, ShutdownSignal};
