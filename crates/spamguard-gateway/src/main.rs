//! spamguard gateway
//!
//! - Rules: YAML file named by `policy.rules_file`, compiled at startup
//! - Reload: SIGHUP, optional `policy.reload_interval_ms`, `POST /admin/reload`
//! - Decisions: `/v1/check/*`
//! - Ops: `/healthz`, `/metrics`

use tracing_subscriber::{fmt, EnvFilter};

use spamguard_gateway::{app_state, config, reload, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("SPAMGUARD_CONFIG").unwrap_or_else(|_| "spamguard.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let interval = state.cfg().policy.reload_interval();
    let triggers = reload::spawn_reload_triggers(state.policy(), interval);
    let app = router::build_router(state);

    tracing::info!(
        %listen,
        config = %path,
        sighup = triggers.sighup,
        "spamguard-gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
