use std::net::IpAddr;
use std::time::Duration;

use ping_probe::{PingError, PingResult, ProbeConfig, DEFAULT_DESTINATION, DEFAULT_PACKET_COUNT, DEFAULT_TIMEOUT};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const MAX_POSITIONALS: usize = 3;

#[derive(argh::FromArgs)]
/// ping-probe - send ICMP ECHO_REQUEST packets to a host
struct Args {
    #[argh(option)]
    /// resolve the destination with this DNS server instead of the system resolver
    dns_server: Option<IpAddr>,

    #[argh(switch, short = 'v')]
    /// log what the prober does
    verbose: bool,

    #[argh(positional)]
    /// positionals [destination] [timeout] [packet_count]: host name or IPv4 address (default: kntu.ac.ir),
    /// seconds to wait for each reply (default: 1), number of echo requests (default: 4)
    positionals: Vec<String>,
}

fn invalid(message: &str) -> PingError {
    PingError::Validation { message: message.to_owned() }
}

fn parse_timeout(arg: &str) -> PingResult<Duration> {
    // Negative, NaN and infinite values are rejected along with non-numbers.
    arg.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| invalid("Please enter valid timeout and packet count."))
}

fn parse_packet_count(arg: &str) -> PingResult<u16> {
    arg.parse::<u16>().map_err(|_| invalid("Please enter valid timeout and packet count."))
}

/// Maps `[destination] [timeout] [packet_count]` onto a validated configuration.
fn probe_config(positionals: &[String], dns_server: Option<IpAddr>) -> PingResult<ProbeConfig<'_>> {
    if positionals.len() > MAX_POSITIONALS {
        return Err(invalid("Invalid number of arguments."));
    }

    let config = ProbeConfig {
        destination: positionals.first().map_or(DEFAULT_DESTINATION, String::as_str),
        timeout: positionals.get(1).map_or(Ok(DEFAULT_TIMEOUT), |arg| parse_timeout(arg))?,
        packet_count: positionals.get(2).map_or(Ok(DEFAULT_PACKET_COUNT), |arg| parse_packet_count(arg))?,
        dns_server,
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    let args: Args = argh::from_env();

    let max_level = if args.verbose { Level::TRACE } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(max_level).with_writer(std::io::stderr).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not set up logging: {e}");
    }

    let config = match probe_config(&args.positionals, args.dns_server) {
        Ok(config) => config,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    println!("Sending ping to \"{}\":", config.destination);
    match ping_probe::run(&config, |result| println!("{result}")) {
        Ok(summary) => println!("{summary}"),
        Err(e) => println!("{e}"),
    }
}
