//! Tests for the client and server halves of the session protocol

use cookie_session::config::SessionConfig;
use cookie_session::http::message::Message;
use cookie_session::http::parser::{ParseError, ParseMode, decode_request};
use cookie_session::http::writer::{encode_request, encode_response};
use cookie_session::session::client::{ClientSession, SessionState};
use cookie_session::session::server::{FIRST_VISIT_BODY, SessionIssuer, bad_request};

fn client() -> ClientSession {
    ClientSession::new("127.0.0.1:8080", "session_id")
}

#[test]
fn test_client_request_without_cookie() {
    let session = client();
    let req = session.build_request();

    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/");
    assert_eq!(req.version, "HTTP/1.1");
    assert_eq!(req.header("Host"), Some("127.0.0.1:8080"));
    assert_eq!(req.header("Cookie"), None);

    let wire = String::from_utf8(encode_request(&req)).unwrap();
    assert!(!wire.contains("Cookie"));
}

#[test]
fn test_client_replays_stored_cookie() {
    let mut session = client();
    let resp = b"HTTP/1.1 200 OK\r\nSet-Cookie: session_id=abc123; Max-Age=3600; Path=/\r\n\r\n";
    session.absorb_response(resp, ParseMode::Lenient).unwrap();

    let wire = String::from_utf8(encode_request(&session.build_request())).unwrap();

    assert!(wire.contains("Cookie: session_id=abc123\r\n"));
}

#[test]
fn test_client_state_transitions_once() {
    let mut session = client();
    assert_eq!(session.state(), SessionState::NoCookie);

    let first = b"HTTP/1.1 200 OK\r\nSet-Cookie: session_id=one; Path=/\r\n\r\n";
    session.absorb_response(first, ParseMode::Lenient).unwrap();
    assert_eq!(session.state(), SessionState::HasCookie);
    assert_eq!(session.session_id(), Some("one"));

    // A response without Set-Cookie leaves the cookie in place
    let plain = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";
    session.absorb_response(plain, ParseMode::Lenient).unwrap();
    assert_eq!(session.state(), SessionState::HasCookie);
    assert_eq!(session.session_id(), Some("one"));

    let refresh = b"HTTP/1.1 200 OK\r\nSet-Cookie: session_id=two; Path=/\r\n\r\n";
    session.absorb_response(refresh, ParseMode::Lenient).unwrap();
    assert_eq!(session.session_id(), Some("two"));
}

#[test]
fn test_client_cookie_changed_only_on_new_value() {
    let mut session = client();

    let first = b"HTTP/1.1 200 OK\r\nSet-Cookie: session_id=one; Path=/\r\n\r\n";
    session.absorb_response(first, ParseMode::Lenient).unwrap();
    assert!(session.cookie_changed());

    let plain = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";
    session.absorb_response(plain, ParseMode::Lenient).unwrap();
    assert!(!session.cookie_changed());

    // Same value again is not a change
    session.absorb_response(first, ParseMode::Lenient).unwrap();
    assert!(!session.cookie_changed());

    let refresh = b"HTTP/1.1 200 OK\r\nSet-Cookie: session_id=two; Path=/\r\n\r\n";
    session.absorb_response(refresh, ParseMode::Lenient).unwrap();
    assert!(session.cookie_changed());
}

#[test]
fn test_client_strict_mode_surfaces_bad_cookie() {
    let mut session = client();
    let resp = b"HTTP/1.1 200 OK\r\nSet-Cookie: nonsense\r\n\r\n";

    let result = session.absorb_response(resp, ParseMode::Strict);

    assert!(matches!(result, Err(ParseError::MalformedCookie(_))));
    assert_eq!(session.state(), SessionState::NoCookie);
}

#[test]
fn test_server_first_visit_greeting() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 42);
    let req = Message::request("GET", "/").with_header("Host", "127.0.0.1:8080");

    let resp = issuer.respond(&req);

    assert_eq!(resp.status_code, "200");
    assert_eq!(resp.status_message, "OK");
    assert_eq!(resp.body, "Hello! This is your first visit.\n");
    assert_eq!(resp.body, FIRST_VISIT_BODY);
}

#[test]
fn test_server_returning_visit_greeting() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 42);
    let req = Message::request("GET", "/").with_header("Cookie", "session_id=xyz");

    let resp = issuer.respond(&req);

    assert_eq!(resp.body, "Welcome back! Your cookie: session_id=xyz\n");
}

#[test]
fn test_server_echoes_raw_cookie_header() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 42);
    let req = Message::request("GET", "/").with_header("Cookie", "whatever-the-client-sent");

    let resp = issuer.respond(&req);

    assert_eq!(
        resp.body,
        "Welcome back! Your cookie: whatever-the-client-sent\n"
    );
}

#[test]
fn test_server_always_sets_fresh_cookie() {
    let mut expected = SessionIssuer::seeded(SessionConfig::default(), 9);
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 9);

    let first = issuer.respond(&Message::request("GET", "/"));
    let returning = issuer.respond(&Message::request("GET", "/").with_header("Cookie", "session_id=old"));

    let id1 = expected.issue();
    let id2 = expected.issue();
    assert_eq!(
        first.header("Set-Cookie"),
        Some(format!("session_id={}; Max-Age=3600; Path=/", id1).as_str())
    );
    assert_eq!(
        returning.header("Set-Cookie"),
        Some(format!("session_id={}; Max-Age=3600; Path=/", id2).as_str())
    );
}

#[test]
fn test_server_session_ids_have_user_prefix() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 3);
    let id = issuer.issue();

    assert!(id.starts_with("user_"));
    assert!(id["user_".len()..].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_server_cookie_attributes_from_config() {
    let cfg = SessionConfig {
        cookie_name: "sid".to_string(),
        max_age: 60,
        path: "/app".to_string(),
        ..SessionConfig::default()
    };
    let issuer = SessionIssuer::seeded(cfg, 1);

    assert_eq!(issuer.set_cookie_value("tok"), "sid=tok; Max-Age=60; Path=/app");
}

#[test]
fn test_server_content_type_and_length() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 5);
    let requests = [
        Message::request("GET", "/"),
        Message::request("GET", "/").with_header("Cookie", "session_id=user_1"),
        Message::request("GET", "/").with_header("Cookie", "session_id=héllo"),
    ];

    for req in &requests {
        let resp = issuer.respond(req);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.content_length(), resp.body.len());
    }
}

#[test]
fn test_server_response_survives_wire() {
    let mut issuer = SessionIssuer::seeded(SessionConfig::default(), 11);
    let raw_req = b"GET / HTTP/1.1\r\nHost: 127.0.0.1:8080\r\n\r\n";
    let req = decode_request(raw_req, ParseMode::Lenient).unwrap();

    let wire = encode_response(&issuer.respond(&req));

    let mut session = client();
    let decoded = session.absorb_response(&wire, ParseMode::Strict).unwrap();
    assert_eq!(decoded.body, FIRST_VISIT_BODY);
    assert_eq!(session.state(), SessionState::HasCookie);
    assert!(session.session_id().unwrap().starts_with("user_"));
}

#[test]
fn test_bad_request_response() {
    let resp = bad_request(&ParseError::Incomplete);

    assert_eq!(resp.status_code, "400");
    assert_eq!(resp.status_message, "Bad Request");
    assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    assert_eq!(resp.content_length(), resp.body.len());
    assert!(resp.body.starts_with("400 Bad Request"));
}
