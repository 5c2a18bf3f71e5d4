use serde::Deserialize;

use press_core::game::AutoPressConfig;

const DEFAULT_CONFIG_PATH: &str = "press.toml";

/// Top-level server configuration, loaded from `press.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Seed the in-memory store with the demo event at startup.
    pub mock_mode: bool,
    pub auth: AuthFileConfig,
    pub limits: LimitsConfig,
    /// Auto-press settings applied to new games that don't carry their own.
    pub auto_press: AutoPressConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            mock_mode: true,
            auth: AuthFileConfig::default(),
            limits: LimitsConfig::default(),
            auto_press: AutoPressConfig::default(),
        }
    }
}

/// Store and connection caps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_events: usize,
    pub max_games_per_event: usize,
    pub max_sse_subscribers: usize,
    pub broadcast_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_events: 500,
            max_games_per_event: 64,
            max_sse_subscribers: 100,
            broadcast_capacity: 1024,
        }
    }
}

/// Auth section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthFileConfig {
    pub bearer_token: Option<String>,
}

impl ServerConfig {
    /// Collect every problem with the configuration. An empty list means the
    /// server can start.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        for (name, value) in [
            ("limits.max_events", self.limits.max_events),
            ("limits.max_games_per_event", self.limits.max_games_per_event),
            ("limits.max_sse_subscribers", self.limits.max_sse_subscribers),
            ("limits.broadcast_capacity", self.limits.broadcast_capacity),
        ] {
            if value == 0 {
                problems.push(format!("{name} must be > 0"));
            }
        }
        if let Err(e) = self.auto_press.validate() {
            problems.push(format!("auto_press: {e}"));
        }

        if self.auth.bearer_token.is_some() {
            tracing::warn!(
                "bearer_token is set in config file, use PRESS_API_TOKEN env var in production"
            );
        }

        problems
    }

    /// Load config from `press.toml` (or `$PRESS_CONFIG`) if it exists, then
    /// apply env var overrides.
    pub fn load() -> Self {
        let path =
            std::env::var("PRESS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `PRESS_*` overrides from `lookup`; empty or unparsable values
    /// are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = var("PRESS_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(token) = var("PRESS_API_TOKEN") {
            self.auth.bearer_token = Some(token);
        }
        if let Some(mock) = var("PRESS_MOCK_MODE") {
            match mock.as_str() {
                "1" | "true" => self.mock_mode = true,
                "0" | "false" => self.mock_mode = false,
                other => tracing::warn!("Ignoring PRESS_MOCK_MODE={other}"),
            }
        }
        if let Some(n) = var("PRESS_MAX_SSE_SUBSCRIBERS").and_then(|v| v.parse::<usize>().ok()) {
            self.limits.max_sse_subscribers = n;
        }
    }
}
