//! Timeout and bounded retry at the gateway boundary.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shelf_core::{
    CatalogGatewayPort, Console, ConsoleId, ConsoleWithGameRoms, Game, GameWithRoms, GatewayError,
    GatewaySettings,
};
use tracing::warn;

/// Wraps a gateway so every call is time-boxed and retryable failures are
/// retried with exponential backoff. The store contract is unchanged: a
/// caller still sees one request and one response.
pub struct ResilientGateway {
    inner: Arc<dyn CatalogGatewayPort>,
    settings: GatewaySettings,
}

impl ResilientGateway {
    pub fn new(inner: Arc<dyn CatalogGatewayPort>, settings: GatewaySettings) -> Self {
        Self { inner, settings }
    }

    /// Delay before retry number `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.settings.initial_backoff.saturating_mul(factor)
    }

    async fn call<T, F, Fut>(&self, op: &'static str, mut request: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, GatewayError>> + Send,
        T: Send,
    {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let result = tokio::time::timeout(self.settings.timeout, request())
                .await
                .unwrap_or(Err(GatewayError::Timeout(self.settings.timeout)));

            match result {
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        op,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "gateway call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl CatalogGatewayPort for ResilientGateway {
    async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError> {
        self.call("list_consoles", move || self.inner.list_consoles())
            .await
    }

    async fn list_consoles_with_games(
        &self,
        console_name: &str,
    ) -> Result<ConsoleWithGameRoms, GatewayError> {
        self.call("list_consoles_with_games", move || {
            self.inner.list_consoles_with_games(console_name)
        })
        .await
    }

    async fn list_games(&self) -> Result<Vec<Game>, GatewayError> {
        self.call("list_games", move || self.inner.list_games()).await
    }

    async fn list_games_for_console(
        &self,
        console_id: ConsoleId,
    ) -> Result<Vec<GameWithRoms>, GatewayError> {
        self.call("list_games_for_console", move || {
            self.inner.list_games_for_console(console_id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockall::mock;

    mock! {
        pub Gateway {}

        #[async_trait]
        impl CatalogGatewayPort for Gateway {
            async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError>;
            async fn list_consoles_with_games(
                &self,
                console_name: &str,
            ) -> Result<ConsoleWithGameRoms, GatewayError>;
            async fn list_games(&self) -> Result<Vec<Game>, GatewayError>;
            async fn list_games_for_console(
                &self,
                console_id: ConsoleId,
            ) -> Result<Vec<GameWithRoms>, GatewayError>;
        }
    }

    /// Never answers within any reasonable timeout.
    struct StalledGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogGatewayPort for StalledGateway {
        async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        async fn list_consoles_with_games(
            &self,
            _console_name: &str,
        ) -> Result<ConsoleWithGameRoms, GatewayError> {
            unimplemented!()
        }

        async fn list_games(&self) -> Result<Vec<Game>, GatewayError> {
            unimplemented!()
        }

        async fn list_games_for_console(
            &self,
            _console_id: ConsoleId,
        ) -> Result<Vec<GameWithRoms>, GatewayError> {
            unimplemented!()
        }
    }

    fn settings(max_attempts: u32) -> GatewaySettings {
        GatewaySettings {
            timeout: Duration::from_millis(100),
            max_attempts,
            initial_backoff: Duration::from_millis(200),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_are_retried_until_success() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut inner = MockGateway::new();
        {
            let attempts = attempts.clone();
            inner.expect_list_consoles().times(3).returning(move || {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(GatewayError::Transport("connection refused".into()))
                } else {
                    Ok(Vec::new())
                }
            });
        }
        let gateway = ResilientGateway::new(Arc::new(inner), settings(3));

        let started = tokio::time::Instant::now();
        let result = gateway.list_consoles().await;

        assert_eq!(result, Ok(Vec::new()));
        // 200ms then 400ms of backoff.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(700), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let mut inner = MockGateway::new();
        inner
            .expect_list_games_for_console()
            .times(2)
            .returning(|_| Err(GatewayError::Transport("connection reset".into())));
        let gateway = ResilientGateway::new(Arc::new(inner), settings(2));

        let err = gateway
            .list_games_for_console(ConsoleId::new(5))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Transport("connection reset".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_fail_fast() {
        let mut inner = MockGateway::new();
        inner
            .expect_list_consoles_with_games()
            .times(1)
            .returning(|_| Err(GatewayError::NotFound("console Vectrex".into())));
        let gateway = ResilientGateway::new(Arc::new(inner), settings(5));

        let err = gateway
            .list_consoles_with_games("Vectrex")
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::NotFound("console Vectrex".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_calls_time_out() {
        let inner = Arc::new(StalledGateway {
            calls: AtomicUsize::new(0),
        });
        let gateway = ResilientGateway::new(inner.clone(), settings(2));

        let err = gateway.list_consoles().await.unwrap_err();

        assert_eq!(err, GatewayError::Timeout(Duration::from_millis(100)));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let gateway = ResilientGateway::new(Arc::new(MockGateway::new()), settings(4));
        assert_eq!(gateway.backoff(1), Duration::from_millis(200));
        assert_eq!(gateway.backoff(2), Duration::from_millis(400));
        assert_eq!(gateway.backoff(3), Duration::from_millis(800));
    }
}
