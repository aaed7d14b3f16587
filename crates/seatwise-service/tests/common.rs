//! Common test utilities for seatwise integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use seatwise_core::{
    Category, CreditTransaction, CutoffId, CutoffRow, Gender, InstituteType, Quota, SeatGender,
    User, UserId, SIGNUP_BONUS_CREDITS,
};
use seatwise_service::auth::issue_session;
use seatwise_service::{create_router, AppState, ServiceConfig};
use seatwise_store::{RocksStore, Store};

/// Admin ops key configured in every test harness.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Razorpay key secret configured in every test harness (signature
/// verification is local, so no gateway is contacted).
pub const RAZORPAY_SECRET: &str = "test-razorpay-secret";

/// Calendly webhook signing secret configured in every test harness.
pub const CALENDLY_SECRET: &str = "test-calendly-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store handle for seeding data.
    pub store: Arc<RocksStore>,
    /// The configuration the server runs with.
    pub config: ServiceConfig,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            session_secret: "test-session-secret".into(),
            session_ttl_hours: 24,
            admin_emails: vec!["staff@seatwise.test".into()],
            admin_api_key: Some(ADMIN_KEY.into()),
            razorpay_key_id: Some("rzp_test_key".into()),
            razorpay_key_secret: Some(RAZORPAY_SECRET.into()),
            calendly_webhook_secret: Some(CALENDLY_SECRET.into()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store), config.clone());
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            config,
            _temp_dir: temp_dir,
        }
    }

    /// Seed a user directly in the store (with the signup-bonus ledger
    /// entry) and return it with a valid session token.
    pub fn seed_user(&self, email: &str) -> (User, String) {
        let user = User::new(
            UserId::generate(),
            "Asha".into(),
            email.into(),
            "9000000001".into(),
            Gender::Female,
            Category::General,
            "Kerala".into(),
        );
        let bonus = CreditTransaction::signup_bonus(user.user_id, SIGNUP_BONUS_CREDITS);
        self.store
            .create_user(&user, &bonus)
            .expect("Failed to seed user");

        let token = issue_session(&user, &self.config).expect("Failed to issue session");
        (user, token)
    }

    /// Bearer header value for a session token.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Seed a small cutoff table around NIT-level OPEN/AI seats.
    pub fn seed_cutoffs(&self) {
        let rows = vec![
            cutoff_row("NIT Trichy", "CSE", "OPEN", Quota::AllIndia, 1, 9_000),
            cutoff_row("NIT Trichy", "ECE", "OPEN", Quota::AllIndia, 500, 60_000),
            cutoff_row("NIT Calicut", "CSE", "OPEN", Quota::AllIndia, 2_000, 55_000),
            cutoff_row("NIT Calicut", "CSE", "OPEN", Quota::HomeState, 1_000, 30_000),
            cutoff_row("NIT Surathkal", "CSE", "OBC-NCL", Quota::AllIndia, 100, 12_000),
        ];
        self.store.put_cutoffs(&rows).expect("Failed to seed cutoffs");
    }
}

/// Build one Main-exam NIT cutoff row for seeding.
pub fn cutoff_row(
    institute: &str,
    department: &str,
    seat_type: &str,
    quota: Quota,
    opening: u64,
    closing: u64,
) -> CutoffRow {
    let institute_state = match institute {
        "NIT Trichy" => "Tamil Nadu",
        "NIT Calicut" => "Kerala",
        _ => "Karnataka",
    };
    CutoffRow {
        id: CutoffId::generate(),
        institute: institute.into(),
        institute_type: InstituteType::Nit,
        institute_state: institute_state.into(),
        department: department.into(),
        quota,
        seat_type: seat_type.into(),
        seat_gender: SeatGender::GenderNeutral,
        opening_rank: opening,
        closing_rank: closing,
        year: 2024,
        round: 6,
        institute_ranking: Some(10),
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
