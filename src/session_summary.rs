use crate::probe_result::{fmt_millis, round_2, rounded_millis};
use crate::ProbeResult;
use std::fmt;
use std::time::Duration;

/// Statistics of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    attempts: u16,
    timeouts: u16,
    total_round_trip: Duration,
}

impl SessionSummary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let mut summary = SessionSummary { attempts: 0, timeouts: 0, total_round_trip: Duration::ZERO };
        for result in results {
            summary.attempts = summary.attempts.saturating_add(1);
            match result {
                ProbeResult::RoundTrip(duration) => summary.total_round_trip += *duration,
                ProbeResult::Timeout => summary.timeouts = summary.timeouts.saturating_add(1),
            }
        }
        summary
    }

    pub fn attempts(&self) -> u16 {
        self.attempts
    }

    pub fn timeouts(&self) -> u16 {
        self.timeouts
    }

    pub fn successes(&self) -> u16 {
        self.attempts - self.timeouts
    }

    pub fn total_round_trip(&self) -> Duration {
        self.total_round_trip
    }

    /// Total round-trip time spread over all attempts, lost ones included.
    /// `None` when no attempt succeeded.
    pub fn average_round_trip(&self) -> Option<Duration> {
        if self.successes() == 0 {
            return None;
        }
        Some(self.total_round_trip / u32::from(self.attempts))
    }

    /// Percentage of attempts without a reply, rounded to two decimal places.
    pub fn packet_loss_percentage(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        round_2(f64::from(self.timeouts) / f64::from(self.attempts) * 100.0)
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packet_loss_percentage = self.packet_loss_percentage();
        if let Some(average) = self.average_round_trip().filter(|_| packet_loss_percentage < 100.0) {
            write!(f, "+ Average Ping time: ")?;
            fmt_millis(f, rounded_millis(average))?;
            writeln!(f)?;
        }
        write!(f, "+ Packet Loss Percentage: {packet_loss_percentage:.2}%")
    }
}
