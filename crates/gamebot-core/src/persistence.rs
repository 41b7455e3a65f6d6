use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::warn;

use crate::{domain::UserId, ports::TranscriptStore, Result};

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(50),
        }
    }
}

/// TranscriptStore decorator that retries failed writes a bounded number of times.
///
/// After the last attempt the error is returned as-is; callers decide whether to
/// log and continue.
pub struct RetryingStore {
    inner: Arc<dyn TranscriptStore>,
    policy: RetryPolicy,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn TranscriptStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn backoff(&self, op: &str, attempt: u32, err: &crate::Error) -> bool {
        if attempt >= self.policy.max_retries {
            return false;
        }
        warn!(
            op,
            attempt = attempt + 1,
            max = self.policy.max_retries,
            "transcript write failed, retrying: {err}"
        );
        sleep(self.policy.delay).await;
        true
    }
}

#[async_trait::async_trait]
impl TranscriptStore for RetryingStore {
    async fn upsert_user(
        &self,
        id: UserId,
        handle: Option<&str>,
        first_name: &str,
    ) -> Result<()> {
        let mut attempt = 0u32;
        loop {
            let err = match self.inner.upsert_user(id, handle, first_name).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            if !self.backoff("upsert_user", attempt, &err).await {
                return Err(err);
            }
            attempt += 1;
        }
    }

    async fn append_message(&self, user_id: UserId, text: &str, is_bot: bool) -> Result<()> {
        let mut attempt = 0u32;
        loop {
            let err = match self.inner.append_message(user_id, text, is_bot).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            if !self.backoff("append_message", attempt, &err).await {
                return Err(err);
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyStore {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn tick(&self) -> Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(Error::Persistence("database is locked".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl TranscriptStore for FlakyStore {
        async fn upsert_user(&self, _: UserId, _: Option<&str>, _: &str) -> Result<()> {
            self.tick()
        }

        async fn append_message(&self, _: UserId, _: &str, _: bool) -> Result<()> {
            self.tick()
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn recovers_within_the_retry_budget() {
        let flaky = Arc::new(FlakyStore::new(2));
        let store = RetryingStore::new(flaky.clone(), policy(2));

        store.append_message(UserId(1), "hi", false).await.unwrap();
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_the_last_attempt() {
        let flaky = Arc::new(FlakyStore::new(10));
        let store = RetryingStore::new(flaky.clone(), policy(1));

        let err = store
            .upsert_user(UserId(1), None, "Ann")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_retries_fails_fast() {
        let flaky = Arc::new(FlakyStore::new(1));
        let store = RetryingStore::new(flaky.clone(), policy(0));

        assert!(store.append_message(UserId(1), "x", true).await.is_err());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
    }
}
