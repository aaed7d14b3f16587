//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/seatwise").
    pub data_dir: String,

    /// HS256 secret used to sign session tokens.
    pub session_secret: String,

    /// Session token lifetime in hours (default: 720).
    pub session_ttl_hours: i64,

    /// Emails that receive the admin role at login.
    pub admin_emails: Vec<String>,

    /// Admin API key for ops tooling (optional).
    pub admin_api_key: Option<String>,

    /// Razorpay key id (optional; payments disabled without it).
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret (optional).
    pub razorpay_key_secret: Option<String>,

    /// Calendly webhook signing secret (optional).
    pub calendly_webhook_secret: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Razorpay secrets file structure.
#[derive(Debug, Deserialize)]
struct RazorpaySecrets {
    key_id: String,
    key_secret: String,
}

/// Calendly secrets file structure.
#[derive(Debug, Deserialize)]
struct CalendlySecrets {
    webhook_secret: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (razorpay_key_id, razorpay_key_secret) = load_razorpay_secrets();
        let calendly_webhook_secret = load_calendly_secret();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/seatwise".into()),
            session_secret: std::env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "dev-session-secret".into()),
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720),
            admin_emails: std::env::var("ADMIN_EMAILS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_ascii_lowercase())
                .collect(),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            razorpay_key_id,
            razorpay_key_secret,
            calendly_webhook_secret,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Whether an email carries the admin role.
    #[must_use]
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

/// Load Razorpay secrets from file or environment.
fn load_razorpay_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/razorpay.json",
        "seatwise/.secrets/razorpay.json",
        "../.secrets/razorpay.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<RazorpaySecrets>(path) {
            tracing::info!(path = %path, "Loaded Razorpay secrets from file");
            return (Some(secrets.key_id), Some(secrets.key_secret));
        }
    }

    tracing::debug!("Razorpay secrets file not found, using environment variables");
    (
        std::env::var("RAZORPAY_KEY_ID").ok(),
        std::env::var("RAZORPAY_KEY_SECRET").ok(),
    )
}

/// Load the Calendly webhook secret from file or environment.
fn load_calendly_secret() -> Option<String> {
    let secret_paths = [
        ".secrets/calendly.json",
        "seatwise/.secrets/calendly.json",
        "../.secrets/calendly.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<CalendlySecrets>(path) {
            tracing::info!(path = %path, "Loaded Calendly secrets from file");
            return Some(secrets.webhook_secret);
        }
    }

    tracing::debug!("Calendly secrets file not found, using environment variables");
    std::env::var("CALENDLY_WEBHOOK_SECRET").ok()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/seatwise".into(),
            session_secret: "dev-session-secret".into(),
            session_ttl_hours: 720,
            admin_emails: Vec::new(),
            admin_api_key: None,
            razorpay_key_id: None,
            razorpay_key_secret: None,
            calendly_webhook_secret: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
