use crate::details::icmp::v4::{Identifier, RawSocket, TSocket};
use crate::details::ProbeSession;
use crate::resolver::{resolver_for, Resolve};
use crate::{PingError, PingResult, ProbeResult, SessionSummary};
use std::io;
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_DESTINATION: &str = "kntu.ac.ir";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_PACKET_COUNT: u16 = 4;

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct ProbeConfig<'a> {
    /// Host name or IPv4 address.
    pub destination: &'a str,
    /// Longest wait for the reply to each request.
    pub timeout: Duration,
    pub packet_count: u16,
    /// Resolve `destination` with this server instead of the system resolver.
    pub dns_server: Option<IpAddr>,
}

impl Default for ProbeConfig<'static> {
    fn default() -> Self {
        ProbeConfig {
            destination: DEFAULT_DESTINATION,
            timeout: DEFAULT_TIMEOUT,
            packet_count: DEFAULT_PACKET_COUNT,
            dns_server: None,
        }
    }
}

impl ProbeConfig<'_> {
    pub fn validate(&self) -> PingResult<()> {
        if self.timeout.is_zero() || self.packet_count == 0 {
            return Err(PingError::Validation { message: "Please enter valid timeout and packet count.".to_owned() });
        }
        Ok(())
    }
}

/// Pings `config.destination` over a raw ICMP socket (needs root or `CAP_NET_RAW`).
///
/// `on_result` is called after every attempt.
pub fn run<F>(config: &ProbeConfig<'_>, on_result: F) -> PingResult<SessionSummary>
where
    F: FnMut(&ProbeResult),
{
    config.validate()?;
    let resolver = resolver_for(config.dns_server);
    run_with_resolver(config, &*resolver, on_result)
}

/// Like [`run`], resolving the destination with `resolver`.
pub fn run_with_resolver<R, F>(config: &ProbeConfig<'_>, resolver: &R, on_result: F) -> PingResult<SessionSummary>
where
    R: Resolve + ?Sized,
    F: FnMut(&ProbeResult),
{
    run_with_socket(config, resolver, RawSocket::new, on_result)
}

fn run_with_socket<R, S, O, F>(
    config: &ProbeConfig<'_>,
    resolver: &R,
    open_socket: O,
    on_result: F,
) -> PingResult<SessionSummary>
where
    R: Resolve + ?Sized,
    S: TSocket,
    O: FnOnce(Duration) -> io::Result<S>,
    F: FnMut(&ProbeResult),
{
    // (1) Validate before any I/O.
    config.validate()?;

    // (2) Resolve before any packet is built.
    let destination = resolver.resolve(config.destination).map_err(|e| {
        tracing::error!("could not resolve {}: {e}", config.destination);
        e
    })?;
    tracing::debug!("{} resolved to {destination}", config.destination);

    // (3) The session owns the socket until it goes out of scope.
    let socket = open_socket(config.timeout)?;
    let session = ProbeSession::new(socket, Identifier::from_process_id(), destination);
    session.run(config.packet_count, on_result)
}
