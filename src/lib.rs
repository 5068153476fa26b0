#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use details::{PingError, PingResult, ResolutionError};
pub use ping_probe::*;
pub use probe_result::ProbeResult;
pub use resolver::{resolver_for, DnsServerResolver, Resolve, SystemResolver};
pub use session_summary::SessionSummary;

mod details;
mod ping_probe;
mod probe_result;
mod resolver;
mod session_summary;
