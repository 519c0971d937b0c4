// ImpactWatch — SSE Streaming Session
//
// Cooperative push loop over one open connection: sample, filter, and send
// one `data: <json>\n\n` frame per cycle that has threshold events. Quiet
// cycles send nothing — silence costs no radio bandwidth, empty frames do.
// The session ends only when a write fails (peer gone, broken pipe).

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::readings::ThresholdEvent;

const SSE_HANDSHAKE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/event-stream\r\n\
Cache-Control: no-cache\r\n\
Connection: keep-alive\r\n\r\n";

/// Run a streaming session until the peer disconnects. `sample` produces
/// one cycle's threshold events; `frame_interval` paces the loop (1 s in
/// production). Returns the number of frames successfully sent.
pub fn run_session<W: Write>(
    conn: &mut W,
    mut sample: impl FnMut() -> Vec<ThresholdEvent>,
    frame_interval: Duration,
) -> usize {
    if let Err(e) = conn.write_all(SSE_HANDSHAKE) {
        log::warn!("Error sending SSE handshake: {}", e);
        return 0;
    }

    let mut frames_sent = 0;

    loop {
        let events = sample();

        if !events.is_empty() {
            let json = match serde_json::to_string(&events) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Event serialization failed: {}", e);
                    continue;
                }
            };

            let frame = format!("data: {}\n\n", json);
            if let Err(e) = conn.write_all(frame.as_bytes()) {
                log::warn!("Error sending data: {}", e);
                break;
            }
            frames_sent += 1;
            log::info!("Data sent: {}", json);
        }

        thread::sleep(frame_interval);
    }

    frames_sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Writer that accepts a fixed number of writes, then fails every
    /// subsequent one (simulated peer disconnect).
    struct FlakyConn {
        written: Vec<u8>,
        writes_left: usize,
    }

    impl FlakyConn {
        fn new(writes_left: usize) -> Self {
            Self { written: Vec::new(), writes_left }
        }
    }

    impl Write for FlakyConn {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.writes_left == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            self.writes_left -= 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn event() -> ThresholdEvent {
        ThresholdEvent { sensor: 1, total_acceleration_g: 2.5 }
    }

    #[test]
    fn write_failure_on_third_frame_ends_session_after_two() {
        // 1 handshake write + 2 frame writes succeed, the 3rd frame fails.
        let mut conn = FlakyConn::new(3);
        let frames = run_session(&mut conn, || vec![event()], Duration::ZERO);
        assert_eq!(frames, 2);

        let sent = String::from_utf8(conn.written).unwrap();
        assert_eq!(sent.matches("data: ").count(), 2);
    }

    #[test]
    fn handshake_failure_ends_session_immediately() {
        let mut conn = FlakyConn::new(0);
        let mut sampled = false;
        let frames = run_session(
            &mut conn,
            || {
                sampled = true;
                vec![event()]
            },
            Duration::ZERO,
        );
        assert_eq!(frames, 0);
        assert!(!sampled);
    }

    #[test]
    fn quiet_cycles_send_no_frame() {
        // Two empty cycles, then one event whose frame write fails.
        let mut conn = FlakyConn::new(1);
        let mut cycle = 0;
        let frames = run_session(
            &mut conn,
            || {
                cycle += 1;
                if cycle <= 2 { Vec::new() } else { vec![event()] }
            },
            Duration::ZERO,
        );

        assert_eq!(frames, 0);
        // Only the handshake ever hit the wire.
        let sent = String::from_utf8(conn.written).unwrap();
        assert!(sent.starts_with("HTTP/1.1 200 OK"));
        assert!(!sent.contains("data: "));
    }

    #[test]
    fn frame_carries_the_json_array() {
        // Handshake + 1 frame, then fail to end the loop.
        let mut conn = FlakyConn::new(2);
        let frames = run_session(&mut conn, || vec![event()], Duration::ZERO);
        assert_eq!(frames, 1);

        let sent = String::from_utf8(conn.written).unwrap();
        assert!(sent.contains("data: [{\"sensor\":1,\"total_acceleration_g\":2.5}]\n\n"));
    }
}
