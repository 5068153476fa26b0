pub use ping_error::{PingError, ResolutionError};
pub use ping_result::PingResult;
pub(crate) use probe_session::ProbeSession;

pub(crate) mod icmp;
mod ping_error;
mod ping_result;
mod probe_session;
