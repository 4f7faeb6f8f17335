//! Client execution logic with reconnection support.

use crate::{
    domain::{ReconnectPolicy, should_attempt_reconnect},
    error::ClientError,
    mirror::{ConnectionStatus, SessionMirror},
    session::run_client_session,
    ui::spawn_input_thread,
};

/// Run the client with the default reconnect policy
pub async fn run_client(url: String, player_name: String) -> Result<(), ClientError> {
    run_client_with_policy(url, player_name, ReconnectPolicy::default()).await
}

/// Run sessions until the user exits or reconnecting is no longer worthwhile.
///
/// The mirror and the input thread outlive individual connections.
pub async fn run_client_with_policy(
    url: String,
    player_name: String,
    policy: ReconnectPolicy,
) -> Result<(), ClientError> {
    let mut mirror = SessionMirror::new(player_name.clone());
    let mut input_rx = spawn_input_thread(&player_name);
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            player_name,
            failed_attempts + 1,
            policy.max_attempts
        );
        mirror.on_connecting();

        match run_client_session(&url, &mut mirror, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                mirror.on_disconnected();
                return Ok(());
            }
            Err(e) => {
                // a session that got as far as `connected` starts a fresh retry budget
                if matches!(
                    mirror.status(),
                    ConnectionStatus::Connected | ConnectionStatus::InRoom
                ) {
                    failed_attempts = 0;
                }
                mirror.on_connection_lost();
                failed_attempts += 1;
                tracing::warn!("Connection lost: {}", e);

                if !should_attempt_reconnect(&e, failed_attempts, &policy) {
                    tracing::error!(
                        "Giving up after {} failed attempt(s). Exiting.",
                        failed_attempts
                    );
                    mirror.on_disconnected();
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {:?}... (attempt {}/{})",
                    policy.interval,
                    failed_attempts + 1,
                    policy.max_attempts
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
