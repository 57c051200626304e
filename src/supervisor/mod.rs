pub mod driver;
pub mod mask;
pub mod reap;
pub mod spawn;
pub mod wait;

pub use driver::{POLL_INTERVAL, run};
