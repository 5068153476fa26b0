use crate::ResolutionError;
use dns_lookup::LookupErrorKind;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::Resolver;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DNS_PORT: u16 = 53;

/// Turns a host name into the IPv4 address to probe.
pub trait Resolve {
    fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolutionError>;
}

/// Resolves through the operating system (getaddrinfo).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

/// Resolves by querying one given DNS server.
#[derive(Clone, Copy, Debug)]
pub struct DnsServerResolver {
    dns_server: IpAddr,
}

impl DnsServerResolver {
    pub fn new(dns_server: IpAddr) -> Self {
        DnsServerResolver { dns_server }
    }
}

/// The system resolver unless a DNS server is given.
pub fn resolver_for(dns_server: Option<IpAddr>) -> Box<dyn Resolve> {
    match dns_server {
        Some(dns_server) => {
            tracing::debug!("resolving with DNS server {dns_server}");
            Box::new(DnsServerResolver::new(dns_server))
        }
        None => {
            tracing::debug!("resolving with the system resolver");
            Box::new(SystemResolver)
        }
    }
}

impl Resolve for SystemResolver {
    fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolutionError> {
        if let Ok(ip) = hostname.parse::<Ipv4Addr>() {
            return Ok(ip);
        }
        let addr_infos = dns_lookup::getaddrinfo(Some(hostname), None, None).map_err(|e| match e.kind() {
            LookupErrorKind::NoName => ResolutionError::NonExistentDomain,
            LookupErrorKind::Again => ResolutionError::Timeout,
            LookupErrorKind::Fail => ResolutionError::NoNameservers,
            _ => ResolutionError::Other(io::Error::from(e).to_string()),
        })?;
        addr_infos
            .filter_map(Result::ok)
            .find_map(|addr_info| match addr_info.sockaddr {
                SocketAddr::V4(addr) => Some(*addr.ip()),
                SocketAddr::V6(_) => None,
            })
            .ok_or(ResolutionError::NoAddress)
    }
}

impl Resolve for DnsServerResolver {
    fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolutionError> {
        if let Ok(ip) = hostname.parse::<Ipv4Addr>() {
            return Ok(ip);
        }
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[self.dns_server], DNS_PORT, true),
        );
        let resolver =
            Resolver::new(config, ResolverOpts::default()).map_err(|e| ResolutionError::Other(e.to_string()))?;
        let lookup = resolver.ipv4_lookup(hostname).map_err(|e| resolution_error(&e))?;
        lookup.iter().next().map(|a| a.0).ok_or(ResolutionError::NoAddress)
    }
}

fn resolution_error(error: &ResolveError) -> ResolutionError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } if *response_code == ResponseCode::NXDomain => {
            ResolutionError::NonExistentDomain
        }
        ResolveErrorKind::NoRecordsFound { .. } => ResolutionError::NoAddress,
        ResolveErrorKind::Timeout => ResolutionError::Timeout,
        ResolveErrorKind::NoConnections => ResolutionError::NoNameservers,
        _ => ResolutionError::Other(error.to_string()),
    }
}
