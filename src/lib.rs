pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod scheduler;
pub mod sinks;
pub mod system;
