use std::net::SocketAddr;
use std::time::Duration;

use press_server::build_app;
use press_server::config::{AuthFileConfig, ServerConfig};

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with no auth and an empty store.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig {
            mock_mode: false,
            ..ServerConfig::default()
        })
        .await
    }

    /// Start a test server seeded with the demo event.
    pub async fn with_demo() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Start a test server that requires a bearer token.
    pub async fn with_auth(token: &str) -> Self {
        Self::from_config(ServerConfig {
            mock_mode: false,
            auth: AuthFileConfig {
                bearer_token: Some(token.to_string()),
            },
            ..ServerConfig::default()
        })
        .await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api/v1{path}", self.addr)
    }
}

/// Create a two-player event `e1` with players `p1` and `p2`.
pub async fn create_two_player_event(client: &reqwest::Client, server: &TestServer) {
    let resp = client
        .post(server.api("/events"))
        .json(&serde_json::json!({
            "id": "e1",
            "name": "Twilight Match",
            "players": [
                { "id": "p1", "display_name": "Pat", "is_scorekeeper": true },
                { "id": "p2", "display_name": "Sam" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
}

/// PUT one score and return the response body.
pub async fn put_score(
    client: &reqwest::Client,
    server: &TestServer,
    player: &str,
    hole: u8,
    strokes: i32,
) -> serde_json::Value {
    let resp = client
        .put(server.api("/events/e1/scores"))
        .json(&serde_json::json!({ "player_id": player, "hole": hole, "strokes": strokes }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}
