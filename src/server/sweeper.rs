use crate::domain_port::AuthSessionStore;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Purge expired sessions every `every` until cancelled.
pub async fn run_session_sweeper(
    store: Arc<dyn AuthSessionStore>,
    every: Duration,
    cancellation_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                debug!("session sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                match store.purge_expired().await {
                    Ok(0) => {}
                    Ok(n) => debug!(purged = n, "expired sessions purged"),
                    Err(e) => warn!("session sweep failed: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;
    use crate::infra_memory::MemoryAuthSessionStore;
    use chrono::Utc;

    #[tokio::test(start_paused = true)]
    async fn sweeps_until_cancelled() {
        let store = Arc::new(MemoryAuthSessionStore::new());
        let now = Utc::now();
        store
            .save_session(
                &SessionToken::generate(),
                &SessionRecord {
                    user_id: UserId::new_random(),
                    username: "TEST_USER".to_string(),
                    created_at: now - chrono::Duration::hours(2),
                    expires_at: now - chrono::Duration::hours(1),
                },
                1,
            )
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_session_sweeper(
            store.clone(),
            Duration::from_secs(10),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(store.is_empty());

        cancel.cancel();
        handle.await.unwrap();
    }
}
