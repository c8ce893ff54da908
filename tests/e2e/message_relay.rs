//! E2E tests for MESSAGE delivery through the HTTP relay

use crate::common::harness::{HarnessOptions, RecordingRelay, TermfolioTestHarness};
use crate::common::tracing::init_tracing_from_env;
use std::io::Read;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use termfolio::services::relay::HttpRelay;
use termfolio::session::{MESSAGE_EXAMPLE, MESSAGE_USAGE, SEND_FAILED};

/// Start a local relay that answers every POST with `status`.
/// Returns (stop_sender, request_bodies, url).
fn start_mock_relay(status: u16) -> (mpsc::Sender<()>, mpsc::Receiver<String>, String) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
    let port = server.server_addr().to_ip().unwrap().port();
    let url = format!("http://127.0.0.1:{}/submit", port);

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let (body_tx, body_rx) = mpsc::channel::<String>();

    thread::spawn(move || loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match server.recv_timeout(Duration::from_millis(100)) {
            Ok(Some(mut request)) => {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let _ = body_tx.send(body);
                let response = tiny_http::Response::from_string(r#"{"success": true}"#)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"application/json"[..],
                        )
                        .unwrap(),
                    );
                let _ = request.respond(response);
            }
            Ok(None) => {}
            Err(_) => break,
        }
    });

    (stop_tx, body_rx, url)
}

fn harness_with_relay(url: &str) -> TermfolioTestHarness {
    let options = HarnessOptions {
        relay: Arc::new(HttpRelay::new(
            url,
            "New message from your website",
            Duration::from_secs(5),
        )),
        ..HarnessOptions::default()
    };
    let mut harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();
    harness.finish_intro();
    harness
}

#[test]
fn test_message_is_posted_and_acknowledged() {
    init_tracing_from_env();
    let (stop_tx, bodies, url) = start_mock_relay(200);
    let mut harness = harness_with_relay(&url);

    harness.submit("MESSAGE -name John -message Hello Jake!");

    assert_eq!(
        harness.last_output().as_deref(),
        Some("Message sent successfully! Thanks John!")
    );

    let body = bodies
        .recv_timeout(Duration::from_secs(5))
        .expect("relay should have received a request");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["name"], "John");
    assert_eq!(json["message"], "Hello Jake!");
    assert_eq!(json["subject"], "New message from your website");

    let _ = stop_tx.send(());
}

#[test]
fn test_relay_error_status_reports_failure() {
    init_tracing_from_env();
    let (stop_tx, _bodies, url) = start_mock_relay(500);
    let mut harness = harness_with_relay(&url);

    harness.submit("message -name Ann -message hi");
    assert_eq!(harness.last_output().as_deref(), Some(SEND_FAILED));

    let _ = stop_tx.send(());
}

#[test]
fn test_unreachable_relay_reports_failure() {
    // Bind and drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let mut harness = harness_with_relay(&format!("http://127.0.0.1:{}/submit", port));

    harness.submit("MESSAGE -name Ann -message hi");
    assert_eq!(harness.last_output().as_deref(), Some(SEND_FAILED));
}

#[test]
fn test_name_stops_at_first_hyphen() {
    let relay = RecordingRelay::new(true);
    let options = HarnessOptions {
        relay: Arc::new(relay.clone()),
        ..HarnessOptions::default()
    };
    let mut harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();
    harness.finish_intro();

    harness.submit("MESSAGE -name Mary-Jane -message Hi there");

    let sent = relay.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Mary");
    assert_eq!(sent[0].message, "Hi there");
    assert_eq!(
        harness.last_output().as_deref(),
        Some("Message sent successfully! Thanks Mary!")
    );
}

#[test]
fn test_missing_flags_show_usage_without_sending() {
    let relay = RecordingRelay::new(true);
    let options = HarnessOptions {
        relay: Arc::new(relay.clone()),
        ..HarnessOptions::default()
    };
    let mut harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();
    harness.finish_intro();

    harness.submit("MESSAGE -name Bob");

    let texts = harness.transcript_texts();
    assert_eq!(texts[texts.len() - 2], MESSAGE_USAGE);
    assert_eq!(texts[texts.len() - 1], MESSAGE_EXAMPLE);
    assert!(relay.sent.lock().unwrap().is_empty());
    assert_eq!(harness.app().pending_async(), 0);
}

#[test]
fn test_message_does_not_change_user_name() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("MESSAGE -name John -message Hello");
    assert_eq!(harness.app().session().user_name(), "guest");
}
