use std::fmt;
use std::time::Duration;

/// Outcome of a single echo request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeResult {
    RoundTrip(Duration),
    Timeout,
}

impl ProbeResult {
    pub fn round_trip(&self) -> Option<Duration> {
        match self {
            ProbeResult::RoundTrip(duration) => Some(*duration),
            ProbeResult::Timeout => None,
        }
    }
}

/// Milliseconds rounded to two decimal places.
pub(crate) fn rounded_millis(duration: Duration) -> f64 {
    round_2(duration.as_secs_f64() * 1000.0)
}

pub(crate) fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes `<1ms` for values that round to zero.
pub(crate) fn fmt_millis(f: &mut fmt::Formatter<'_>, millis: f64) -> fmt::Result {
    if millis > 0.0 {
        write!(f, "{millis:.2}ms")
    } else {
        write!(f, "<1ms")
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::RoundTrip(duration) => {
                write!(f, "Ping successful: time=")?;
                fmt_millis(f, rounded_millis(*duration))
            }
            ProbeResult::Timeout => write!(f, "Ping Timed out"),
        }
    }
}
