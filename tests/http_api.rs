use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use fanta_dashboard::api::{ApiError, HttpApi, LeagueApi, error_detail};
use fanta_dashboard::state::{Credential, TeamPatch};

struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serves one canned response and hands back what the client sent.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let len = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    });

    (format!("http://{addr}/api"), rx)
}

fn patch() -> TeamPatch {
    TeamPatch {
        remaining_credits: 10,
        remaining_changes: 4,
        weekly_prizes: 1,
        total_winnings: 25,
        non_callable_players: "Rossi".to_string(),
    }
}

#[test]
fn list_teams_decodes_and_ignores_extra_fields() {
    let body = r#"[
        {"id":"t1","name":"GOBBI FC","owner":"Ciccio","remaining_credits":56,
         "remaining_changes":17,"weekly_prizes":0,"total_winnings":0,
         "non_callable_players":"Nessun giocatore","created_at":"2025-01-01T00:00:00"},
        {"id":"t2","name":"MONEY","total_winnings":12}
    ]"#;
    let (root, rx) = serve_once("200 OK", body);
    let api = HttpApi::new(root).unwrap();

    let teams = api.list_teams().unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].owner, "Ciccio");
    assert_eq!(teams[0].remaining_credits, 56);
    assert_eq!(teams[1].total_winnings, 12);
    assert_eq!(teams[1].owner, "");

    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "GET /api/teams HTTP/1.1");
}

#[test]
fn get_stats_reads_aggregate() {
    let (root, rx) = serve_once(
        "200 OK",
        r#"{"total_teams":10,"total_prizes":1,"total_winnings":999}"#,
    );
    let api = HttpApi::new(root).unwrap();

    let stats = api.get_stats().unwrap();
    assert_eq!(stats.total_teams, 10);
    assert_eq!(stats.total_winnings, 999);
    assert_eq!(rx.recv().unwrap().request_line, "GET /api/stats HTTP/1.1");
}

#[test]
fn authenticate_posts_password_and_returns_token() {
    let (root, rx) = serve_once("200 OK", r#"{"token":"abc123","message":"ok"}"#);
    let api = HttpApi::new(root).unwrap();

    let credential = api.authenticate("696969").unwrap();
    assert_eq!(credential.token(), "abc123");

    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "POST /api/admin/auth HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["password"], "696969");
}

#[test]
fn rejected_password_is_invalid_credential() {
    let (root, _rx) = serve_once("401 Unauthorized", r#"{"detail":"Invalid password"}"#);
    let api = HttpApi::new(root).unwrap();

    assert_eq!(
        api.authenticate("nope").unwrap_err(),
        ApiError::InvalidCredential
    );
}

#[test]
fn update_sends_bearer_token_and_full_patch() {
    let (root, rx) = serve_once("200 OK", r#"{"id":"t1","name":"GOBBI FC"}"#);
    let api = HttpApi::new(root).unwrap();

    api.update_team("t1", &patch(), &Credential::new("tok")).unwrap();

    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "PUT /api/admin/teams/t1 HTTP/1.1");
    assert_eq!(seen.header("authorization"), Some("Bearer tok"));

    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["remaining_credits"], 10);
    assert_eq!(sent["remaining_changes"], 4);
    assert_eq!(sent["weekly_prizes"], 1);
    assert_eq!(sent["total_winnings"], 25);
    assert_eq!(sent["non_callable_players"], "Rossi");
}

#[test]
fn update_with_rejected_token_is_authorization_error() {
    let (root, _rx) = serve_once("401 Unauthorized", r#"{"detail":"Invalid token"}"#);
    let api = HttpApi::new(root).unwrap();

    let err = api
        .update_team("t1", &patch(), &Credential::new("stale"))
        .unwrap_err();
    assert_eq!(err, ApiError::Authorization);
}

#[test]
fn delete_uses_delete_verb() {
    let (root, rx) = serve_once("200 OK", r#"{"message":"deleted"}"#);
    let api = HttpApi::new(root).unwrap();

    api.delete_team("t9", &Credential::new("tok")).unwrap();
    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "DELETE /api/admin/teams/t9 HTTP/1.1");
    assert_eq!(seen.header("authorization"), Some("Bearer tok"));
}

#[test]
fn server_failure_carries_detail() {
    let (root, _rx) = serve_once("500 Internal Server Error", r#"{"detail":"db down"}"#);
    let api = HttpApi::new(root).unwrap();

    assert_eq!(
        api.list_teams().unwrap_err(),
        ApiError::Server {
            status: 500,
            detail: "db down".to_string(),
        }
    );
}

#[test]
fn malformed_body_is_server_error() {
    let (root, _rx) = serve_once("200 OK", "not json");
    let api = HttpApi::new(root).unwrap();

    match api.get_stats().unwrap_err() {
        ApiError::Server { status, detail } => {
            assert_eq!(status, 200);
            assert!(detail.starts_with("invalid response body"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApi::new(format!("http://{addr}/api/")).unwrap();
    assert_eq!(api.api_root(), format!("http://{addr}/api"));
    assert!(matches!(api.list_teams(), Err(ApiError::Transport(_))));
}

#[test]
fn error_detail_prefers_fastapi_shape() {
    assert_eq!(error_detail(r#"{"detail":"Team not found"}"#), "Team not found");
    assert_eq!(
        error_detail(r#"{"detail":[{"msg":"field required"}]}"#),
        r#"[{"msg":"field required"}]"#
    );
    assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
    assert_eq!(error_detail(""), "");
}
