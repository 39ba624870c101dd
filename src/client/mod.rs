//! Chat client: session state, relay transport, and the batch load generator

pub mod session;
pub mod stress;
pub mod transport;

pub use session::{ChatSession, SessionEvent, ERROR_REPLY};
pub use stress::{run_batch, run_stress_loop, BatchReport};
pub use transport::RelayClient;
