use crate::details::icmp::v4::{IcmpV4, Identifier, Received, SequenceNumber, TSocket};
use crate::details::PingResult;
use crate::{ProbeResult, SessionSummary};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Probes one destination over a socket it owns. The socket is closed when the session is dropped.
pub(crate) struct ProbeSession<S> {
    icmpv4: IcmpV4<S>,
    destination: Ipv4Addr,
}

impl<S> ProbeSession<S>
where
    S: TSocket,
{
    pub(crate) fn new(socket: S, identifier: Identifier, destination: Ipv4Addr) -> Self {
        ProbeSession { icmpv4: IcmpV4::new(socket, identifier), destination }
    }

    /// Sends one echo request and reads exactly one datagram.
    pub(crate) fn probe(&self) -> PingResult<ProbeResult> {
        // (1) Send.
        self.icmpv4.send_to(self.destination, SequenceNumber::fixed())?;
        tracing::trace!("echo request sent to {}", self.destination);

        // (2) Wait for a single datagram.
        let Some(received) = self.icmpv4.try_receive()? else {
            tracing::trace!("no datagram within timeout");
            return Ok(ProbeResult::Timeout);
        };

        // (3) Match it against our request.
        Ok(self.match_reply(&received))
    }

    fn match_reply(&self, received: &Received) -> ProbeResult {
        let Some(echo_reply) = &received.echo_reply else {
            tracing::debug!("datagram from {} too short", received.ip_addr);
            return ProbeResult::Timeout;
        };
        if !echo_reply.is_reply_to(self.icmpv4.identifier()) {
            tracing::debug!(
                "ignoring ICMP type {} code {} identifier {} from {}",
                echo_reply.icmp_type.0,
                echo_reply.icmp_code.0,
                u16::from(echo_reply.identifier),
                received.ip_addr
            );
            return ProbeResult::Timeout;
        }
        let Some(sent_at) = echo_reply.sent_at else {
            tracing::debug!("reply from {} carries no timestamp", received.ip_addr);
            return ProbeResult::Timeout;
        };

        // A clock step between send and receive may yield a negative difference.
        let round_trip = Duration::try_from_secs_f64(received.receive_time - sent_at).unwrap_or(Duration::ZERO);
        tracing::trace!(
            "reply from {}: seq={} checksum={:#06x} rtt={:?}",
            received.ip_addr,
            echo_reply.sequence_number,
            echo_reply.checksum,
            round_trip
        );
        ProbeResult::RoundTrip(round_trip)
    }

    /// Runs `packet_count` probes one after another and reports each result to `on_result`.
    pub(crate) fn run<F>(&self, packet_count: u16, mut on_result: F) -> PingResult<SessionSummary>
    where
        F: FnMut(&ProbeResult),
    {
        let mut results = Vec::with_capacity(usize::from(packet_count));
        for _ in 0..packet_count {
            let result = self.probe()?;
            on_result(&result);
            results.push(result);
        }
        Ok(SessionSummary::from_results(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::icmp::v4::tests::OnReceive;
    use crate::details::icmp::v4::tests::OnSend;
    use crate::details::icmp::v4::tests::SocketMock;
    use crate::PingError;
    use more_asserts as ma;
    use std::net::IpAddr;

    const IDENTIFIER: u16 = 0x4242;

    fn session(socket: SocketMock) -> ProbeSession<SocketMock> {
        ProbeSession::new(socket, Identifier::from(IDENTIFIER), Ipv4Addr::LOCALHOST)
    }

    fn reply_after(ms: u64) -> OnReceive {
        OnReceive::ReturnEchoReply { rtt: Duration::from_millis(ms) }
    }

    #[test]
    fn matched_reply_yields_round_trip() {
        let socket = SocketMock::new(OnSend::ReturnDefault, reply_after(7));

        let result = session(socket.clone()).probe().unwrap();

        let round_trip = result.round_trip().unwrap();
        ma::assert_ge!(round_trip, Duration::from_micros(6_900));
        ma::assert_lt!(round_trip, Duration::from_millis(500));
        socket.should_send_number_of_messages(1).should_receive_number_of_messages(1);
    }

    #[test]
    fn nothing_received_is_a_timeout() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);

        assert_eq!(ProbeResult::Timeout, session(socket).probe().unwrap());
    }

    #[test]
    fn own_echo_request_is_a_timeout() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnEchoRequest);

        assert_eq!(ProbeResult::Timeout, session(socket).probe().unwrap());
    }

    #[test]
    fn foreign_reply_is_a_timeout() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnForeignReply);

        assert_eq!(ProbeResult::Timeout, session(socket).probe().unwrap());
    }

    #[test]
    fn truncated_reply_is_a_timeout() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnTruncated);

        assert_eq!(ProbeResult::Timeout, session(socket).probe().unwrap());
    }

    #[test]
    fn one_datagram_is_read_per_attempt() {
        // The real reply is queued behind our own request but is not read in the same attempt.
        let socket =
            SocketMock::new_scripted(OnSend::ReturnDefault, vec![OnReceive::ReturnEchoRequest, reply_after(1)]);

        let result = session(socket.clone()).probe().unwrap();

        assert_eq!(ProbeResult::Timeout, result);
        socket.should_receive_number_of_messages(1);
    }

    #[test]
    fn all_attempts_time_out() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);

        let summary = session(socket.clone()).run(4, |_| {}).unwrap();

        assert_eq!(4, summary.attempts());
        assert_eq!(4, summary.timeouts());
        assert_eq!(0, summary.successes());
        assert!(summary.average_round_trip().is_none());
        assert!((summary.packet_loss_percentage() - 100.0).abs() < f64::EPSILON);
        socket.should_send_number_of_messages(4);
    }

    #[test]
    fn all_attempts_succeed() {
        let socket = SocketMock::new_scripted(
            OnSend::ReturnDefault,
            vec![reply_after(1), reply_after(2), reply_after(1), reply_after(2)],
        );

        let summary = session(socket).run(4, |_| {}).unwrap();

        assert_eq!(0, summary.timeouts());
        assert!(summary.packet_loss_percentage().abs() < f64::EPSILON);
        let average = summary.average_round_trip().unwrap();
        ma::assert_ge!(average, Duration::from_micros(1_490));
        ma::assert_lt!(average, Duration::from_millis(100));
    }

    #[test]
    fn mixed_results() {
        let socket = SocketMock::new_scripted(
            OnSend::ReturnDefault,
            vec![reply_after(1), OnReceive::ReturnWouldBlock, OnReceive::ReturnForeignReply, reply_after(1)],
        );
        let mut reported = vec![];

        let summary = session(socket).run(4, |result| reported.push(*result)).unwrap();

        assert_eq!(4, reported.len());
        assert!(matches!(reported[0], ProbeResult::RoundTrip(_)));
        assert_eq!(ProbeResult::Timeout, reported[1]);
        assert_eq!(ProbeResult::Timeout, reported[2]);
        assert!(matches!(reported[3], ProbeResult::RoundTrip(_)));
        assert!((summary.packet_loss_percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_request_carries_the_same_identifier_and_sequence_number() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);

        session(socket.clone()).run(3, |_| {}).unwrap();

        let sent = socket.sent_packets();
        assert_eq!(3, sent.len());
        for packet in sent {
            assert_eq!(IDENTIFIER.to_be_bytes(), packet[4..6]);
            assert_eq!([0x00, 0x01], packet[6..8]);
        }
        socket.should_send_to_address(&IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn send_error_aborts_the_run() {
        let socket = SocketMock::new(OnSend::ReturnErr, OnReceive::ReturnWouldBlock);
        let mut reported = 0;

        let result = session(socket.clone()).run(4, |_| reported += 1);

        assert!(matches!(result, Err(PingError::Socket(_))));
        assert_eq!(0, reported);
        socket.should_receive_number_of_messages(0);
    }

    #[test]
    fn receive_error_aborts_the_run() {
        let socket = SocketMock::new_scripted(OnSend::ReturnDefault, vec![reply_after(1), OnReceive::ReturnErr]);
        let mut reported = 0;

        let result = session(socket.clone()).run(4, |_| reported += 1);

        assert!(matches!(result, Err(PingError::Socket(_))));
        assert_eq!(1, reported);
        socket.should_send_number_of_messages(2);
    }
}
