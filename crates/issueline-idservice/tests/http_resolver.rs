//! [`HttpIdResolver`] against a scripted local server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use issueline_core::{
    Engine, EngineConfig, ErrorCode, IdentityKey, IdentityResolver, RawGithubIssue, RawIssue,
    ResolverError,
};
use issueline_idservice::{HttpIdResolver, IdServiceConfig};

fn config(port: u16) -> IdServiceConfig {
    IdServiceConfig {
        hostname: "127.0.0.1".into(),
        port,
        project_id: 3,
        timeout_ms: 2_000,
        max_retries: 2,
        backoff_ms: 1,
    }
}

/// Answer one connection per scripted `(status, body)` pair and hand back
/// every request as `"<request line> <body>"`.
fn serve(script: Vec<(u16, &'static str)>) -> (IdServiceConfig, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in script {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            let mut length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("header");
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().expect("content length");
                    }
                }
            }
            let mut payload = vec![0; length];
            reader.read_exact(&mut payload).expect("request body");
            seen.push(format!(
                "{} {}",
                request_line.trim_end(),
                String::from_utf8_lossy(&payload)
            ));

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("respond");
        }
        seen
    });

    (config(port), handle)
}

const ALICE: &str = r#"[{"id": 42, "name": "Alice Smith", "email1": "alice@example.com"}]"#;

#[test]
fn registers_then_fetches_canonical_person() {
    let (config, server) = serve(vec![(200, r#"{"id": 42}"#), (200, ALICE)]);
    let resolver = HttpIdResolver::new(&config);

    let person = resolver.resolve("alice", "a@old.example").expect("resolve");
    assert_eq!(person.id, IdentityKey(42));
    assert_eq!(person.name, "Alice Smith");
    assert_eq!(person.email, "alice@example.com");

    let requests = server.join().expect("server thread");
    assert!(requests[0].starts_with("POST /post_user_id "));
    assert!(requests[0].contains("projectID=3"));
    assert!(requests[0].contains("name=alice"));
    assert!(requests[1].starts_with("GET /getUser/42 "));
}

#[test]
fn rejected_registration_retries_with_default_email() {
    let (config, server) = serve(vec![
        (200, r#"{"error": "email missing"}"#),
        (200, r#"{"id": 42}"#),
        (200, ALICE),
    ]);
    let resolver = HttpIdResolver::new(&config);

    let person = resolver.resolve("alice", "").expect("resolve");
    assert_eq!(person.id, IdentityKey(42));

    let requests = server.join().expect("server thread");
    assert_eq!(requests.len(), 3);
    assert!(requests[1].contains("email=alice%40default.com"));
}

#[test]
fn server_errors_are_retried() {
    let (config, server) = serve(vec![
        (503, "busy"),
        (200, r#"{"id": 42}"#),
        (200, ALICE),
    ]);
    let resolver = HttpIdResolver::new(&config);

    assert!(resolver.resolve("alice", "").is_ok());
    assert_eq!(server.join().expect("server thread").len(), 3);
}

#[test]
fn client_errors_are_malformed_without_retry() {
    let (config, server) = serve(vec![(404, "")]);
    let resolver = HttpIdResolver::new(&config);

    let err = resolver.resolve("alice", "").expect_err("404");
    assert!(matches!(err, ResolverError::MalformedResponse(_)));
    assert_eq!(server.join().expect("server thread").len(), 1);
}

#[test]
fn unreachable_service_aborts_the_batch() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let resolver = HttpIdResolver::new(&config(port));

    let err = resolver.resolve("alice", "").expect_err("nobody listening");
    assert!(matches!(err, ResolverError::Unavailable(_)));

    let issue: RawGithubIssue = serde_json::from_str(
        r#"{"number": 1, "created_at": "2020-01-01T00:00:00Z", "user": {"username": "alice"}}"#,
    )
    .expect("raw issue");
    let mut engine = Engine::new(EngineConfig::default(), resolver);
    let err = engine
        .process(&[RawIssue::from(issue)])
        .expect_err("resolver down");
    assert_eq!(err.code(), ErrorCode::ResolverUnavailable);
}
