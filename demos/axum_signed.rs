use std::net::SocketAddr;

use axum::{Extension, Router, extract::State, http::StatusCode, routing::get};
use stateless_cookie_sessions::{
    CookieSessionConfig, Key, SecureCookieCodec, SessionManager, SignedCookie, Transaction,
    TransactionLayer,
};
use time::Duration;

type Manager = SessionManager<SecureCookieCodec<SignedCookie>>;

// Session IDs are the host's business; a real application would issue one per visitor.
const SESSION_ID: &str = "demo";

async fn index(
    State(manager): State<Manager>,
    Extension(tx): Extension<Transaction>,
) -> Result<String, (StatusCode, String)> {
    let handle = manager
        .update(&tx, SESSION_ID, Duration::hours(1))
        .map_err(|err| (StatusCode::UNAUTHORIZED, err.to_string()))?
        .unwrap_or_else(|| manager.create(&tx, SESSION_ID, Duration::hours(1)));

    let n: usize = handle
        .get("n")
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    handle.set("n", (n + 1).to_string());
    handle
        .save()
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    Ok(format!("n={n}"))
}

async fn reset(
    State(manager): State<Manager>,
    Extension(tx): Extension<Transaction>,
) -> Result<&'static str, (StatusCode, String)> {
    manager
        .delete(&tx, SESSION_ID)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok("reset")
}

#[tokio::main]
async fn main() {
    let key = Key::generate();
    let session_config = CookieSessionConfig::default()
        // Default: "session"
        .with_name("session")
        // Default: true (set to false for local HTTP development)
        .with_secure(false)
        // Default: "/"
        .with_path("/")
        // Default: None
        .without_domain()
        // Default: 4096
        .with_max_length(4096)
        // Default: 30 days
        .with_max_age(Duration::days(1));
    let manager = SessionManager::signed(key, session_config);

    let app = Router::new()
        .route("/", get(index))
        .route("/reset", get(reset))
        .with_state(manager)
        .layer(TransactionLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("tcp listener binds successfully");
    let local_addr = listener.local_addr().expect("local address is available");
    println!("listening at http://{local_addr}");

    axum::serve(listener, app)
        .await
        .expect("server runs successfully");
}
