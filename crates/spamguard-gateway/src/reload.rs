//! Reload triggers (composition root side).
//!
//! The policy only exposes `reload()`. This module registers it with the
//! process: SIGHUP on unix, plus an optional fixed interval. Reload does
//! blocking file I/O, so it always runs on the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use spamguard_core::error::{Result, SpamError};

use crate::policy::SpamPolicy;

/// Which automatic triggers ended up installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTriggers {
    pub sighup: bool,
    pub interval: Option<Duration>,
}

/// Run one reload off the async workers. Rule errors are already reported to
/// the policy observer; they are returned here for callers that answer a request.
pub async fn reload_now(policy: &Arc<SpamPolicy>, trigger: &'static str) -> Result<()> {
    let policy = Arc::clone(policy);
    tracing::debug!(trigger, "reloading spam rules");
    tokio::task::spawn_blocking(move || policy.reload())
        .await
        .map_err(|e| SpamError::Internal(format!("reload task failed: {e}")))?
}

// Background triggers have nobody to answer; the task failure is the only
// error the observer has not seen.
async fn reload_in_background(policy: &Arc<SpamPolicy>, trigger: &'static str) {
    if let Err(e @ SpamError::Internal(_)) = reload_now(policy, trigger).await {
        tracing::warn!(trigger, error = %e, "spam rule reload did not run");
    }
}

/// Install SIGHUP and (if configured) periodic reload. Must be called inside a tokio runtime.
pub fn spawn_reload_triggers(
    policy: Arc<SpamPolicy>,
    interval: Option<Duration>,
) -> ReloadTriggers {
    let sighup = spawn_sighup(Arc::clone(&policy));

    match interval {
        Some(every) => spawn_interval(policy, every),
        None if !sighup => {
            tracing::warn!("no automatic reload trigger available; use POST /admin/reload");
        }
        None => {}
    }

    ReloadTriggers { sighup, interval }
}

#[cfg(unix)]
fn spawn_sighup(policy: Arc<SpamPolicy>) -> bool {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to install SIGHUP handler for spam rule reloading");
            return false;
        }
    };

    tokio::spawn(async move {
        while hup.recv().await.is_some() {
            tracing::info!("SIGHUP received, reloading spam rules");
            reload_in_background(&policy, "sighup").await;
        }
    });
    true
}

#[cfg(not(unix))]
fn spawn_sighup(_policy: Arc<SpamPolicy>) -> bool {
    tracing::warn!("SIGHUP reload is not supported on this platform");
    false
}

fn spawn_interval(policy: Arc<SpamPolicy>, every: Duration) {
    tracing::info!(interval = ?every, "periodic spam rule reload enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // first tick fires immediately; rules were just loaded
        ticker.tick().await;
        loop {
            ticker.tick().await;
            reload_in_background(&policy, "interval").await;
        }
    });
}
