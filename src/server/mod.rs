// ImpactWatch — HTTP Server & Connection Handler
//
// One blocking accept loop, one client at a time. Each accepted connection
// is read once, classified by request-line substring, served by one of
// three behaviors (static page, one-shot JSON, SSE stream), and closed.
// Transport errors end the current connection only; the loop continues.

pub mod stream;

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::readings::ThresholdEvent;
use crate::sensors::SensorArray;
use crate::threshold;

const INDEX_PAGE: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
    <title>ImpactWatch Server</title>\n\
</head>\n\
<body>\n\
    <h1>ImpactWatch SSE Server</h1>\n\
    <p>Visit <a href='/events'>/events</a> for real-time sensor data via Server-Sent Events (SSE).</p>\n\
</body>\n\
</html>\n";

// ---------------------------------------------------------------------------
// Request classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /events` — long-lived SSE stream.
    Events,
    /// `GET /sensor_data` — one-shot JSON poll.
    SensorData,
    /// `GET / ` — static landing page.
    Index,
    /// Anything else — closed without a response.
    Unrecognized,
}

/// Classify by scanning for literal request-line substrings, in priority
/// order. Deliberately permissive: a match anywhere in the request text
/// counts. The index match keeps its trailing space, so `GET /favicon.ico`
/// falls through to [`Route::Unrecognized`].
pub fn classify(request: &str) -> Route {
    if request.contains("GET /events") {
        Route::Events
    } else if request.contains("GET /sensor_data") {
        Route::SensorData
    } else if request.contains("GET / ") {
        Route::Index
    } else {
        Route::Unrecognized
    }
}

// ---------------------------------------------------------------------------
// Response writers
// ---------------------------------------------------------------------------

fn serve_index(conn: &mut impl Write) -> io::Result<()> {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n{}",
        INDEX_PAGE
    );
    conn.write_all(response.as_bytes())
}

/// One-shot poll response: 200 with the JSON event array when any sensor
/// exceeded threshold this cycle, 204 with an empty body otherwise.
fn serve_sensor_data(conn: &mut impl Write, events: &[ThresholdEvent]) -> io::Result<()> {
    if events.is_empty() {
        return conn.write_all(b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n");
    }

    let body = serde_json::to_string(events).map_err(io::Error::other)?;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
        body
    );
    conn.write_all(response.as_bytes())
}

// ---------------------------------------------------------------------------
// Connection lifecycle
// ---------------------------------------------------------------------------

fn handle_client(mut stream: TcpStream, sensors: &mut SensorArray) -> io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_millis(CLIENT_READ_TIMEOUT_MS)))?;

    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    match classify(&request) {
        Route::Events => {
            log::info!("Valid SSE request received. Streaming data...");
            let frames = stream::run_session(
                &mut stream,
                || threshold::evaluate(&sensors.sample_all()),
                Duration::from_millis(STREAM_INTERVAL_MS),
            );
            log::info!("Closing client connection after {} frames", frames);
        }
        Route::SensorData => {
            log::info!("Serving sensor data as JSON...");
            let events = threshold::evaluate(&sensors.sample_all());
            serve_sensor_data(&mut stream, &events)?;
        }
        Route::Index => {
            log::info!("Serving HTML page...");
            serve_index(&mut stream)?;
        }
        Route::Unrecognized => {
            // Abrupt close, no response. Matches the original device
            // behavior; see DESIGN.md.
            log::warn!("Invalid request: {:?}. Closing connection.", request.lines().next().unwrap_or(""));
        }
    }

    Ok(())
    // `stream` drops here — the one and only close for this connection.
}

/// Accept-side socket timeout, set with a raw lwIP sockopt (std's
/// `TcpListener` has no timeout API). On expiry, `accept` fails with
/// `WouldBlock`/`TimedOut` and the loop simply retries.
pub fn set_accept_timeout(listener: &TcpListener, timeout: Duration) {
    use std::os::fd::AsRawFd;

    let tv = esp_idf_sys::timeval {
        tv_sec: timeout.as_secs() as _,
        tv_usec: 0,
    };
    let ret = unsafe {
        esp_idf_sys::lwip_setsockopt(
            listener.as_raw_fd(),
            esp_idf_sys::SOL_SOCKET as _,
            esp_idf_sys::SO_RCVTIMEO as _,
            &tv as *const esp_idf_sys::timeval as *const core::ffi::c_void,
            core::mem::size_of::<esp_idf_sys::timeval>() as _,
        )
    };
    if ret != 0 {
        log::warn!("Failed to set accept timeout ({})", ret);
    }
}

/// Top-level accept loop. Never returns; every connection, however it
/// ends, is followed by a fixed pacing sleep before the next accept.
pub fn run(listener: TcpListener, sensors: &mut SensorArray) -> ! {
    loop {
        log::info!("Waiting for a client connection...");
        match listener.accept() {
            Ok((stream, peer)) => {
                log::info!("Client connected from {}", peer);
                if let Err(e) = handle_client(stream, sensors) {
                    log::warn!("Error during communication: {}", e);
                }
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                // Accept timeout — not a failure, go around again.
            }
            Err(e) => {
                log::warn!("Accept failed: {}", e);
            }
        }

        thread::sleep(Duration::from_millis(ACCEPT_PACING_MS));
    }
}
