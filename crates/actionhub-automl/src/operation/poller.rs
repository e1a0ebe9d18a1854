//! Poll-until-terminal loop for long-running operations.

use std::time::Duration;

use actionhub_core::{Error, Result};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use super::PollPolicy;
use crate::model::Operation;
use crate::{AutoMlProvider, TRACING_TARGET_OPERATION};

/// Deadline used when the configured max wait overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Waits for long-running operations to reach a terminal state.
#[derive(Debug, Clone, Default)]
pub struct OperationPoller {
    policy: PollPolicy,
}

impl OperationPoller {
    /// Creates a poller following the given policy.
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Polls `operation` until it is done.
    ///
    /// An operation that is already done is returned without any request.
    /// A terminal error status becomes an upstream failure carrying the
    /// remote message verbatim.
    ///
    /// # Errors
    ///
    /// Returns a timeout error once the policy's max wait elapses, and a
    /// cancellation error as soon as `cancel` fires.
    pub async fn wait(
        &self,
        provider: &dyn AutoMlProvider,
        operation: Operation,
        cancel: &CancellationToken,
    ) -> Result<Operation> {
        let name = operation.name.clone();
        let started = Instant::now();
        let deadline = started
            .checked_add(self.policy.max_wait())
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut interval = self.policy.initial_interval();
        let mut operation = operation;
        let mut polls: u32 = 0;

        loop {
            if operation.done {
                tracing::debug!(
                    target: TRACING_TARGET_OPERATION,
                    operation = %name,
                    polls,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Operation finished"
                );
                return Self::finish(&name, operation);
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    target: TRACING_TARGET_OPERATION,
                    operation = %name,
                    polls,
                    "Operation wait timed out"
                );
                return Err(Error::timeout()
                    .with_message(format!(
                        "operation {name} did not complete within {}ms",
                        self.policy.max_wait().as_millis()
                    ))
                    .with_context(name));
            }

            let delay = interval.min(deadline - now);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Self::cancelled(&name)),
                _ = sleep(delay) => {}
            }

            operation = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Self::cancelled(&name)),
                result = provider.get_operation(&name) => result?,
            };

            polls += 1;
            interval = self.policy.next_interval(interval);

            tracing::trace!(
                target: TRACING_TARGET_OPERATION,
                operation = %name,
                polls,
                done = operation.done,
                next_interval_ms = interval.as_millis() as u64,
                "Polled operation"
            );
        }
    }

    fn finish(name: &str, operation: Operation) -> Result<Operation> {
        match &operation.error {
            Some(status) => {
                let message = if status.message.is_empty() {
                    format!("operation {name} failed with code {}", status.code)
                } else {
                    status.message.clone()
                };

                Err(Error::upstream_failure()
                    .with_message(message)
                    .with_context(name))
            }
            None => Ok(operation),
        }
    }

    fn cancelled(name: &str) -> Error {
        tracing::info!(
            target: TRACING_TARGET_OPERATION,
            operation = %name,
            "Operation wait cancelled"
        );

        Error::cancelled()
            .with_message(format!("waiting for operation {name} was cancelled"))
            .with_context(name)
    }
}

#[cfg(test)]
mod tests {
    use actionhub_core::ErrorKind;

    use super::*;
    use crate::mock::{MockAutoMlConfig, MockAutoMlProvider};

    const NAME: &str = "projects/foo/locations/us-central1/operations/ICN1";

    fn provider(states: Vec<Operation>) -> MockAutoMlProvider {
        MockAutoMlProvider::new(MockAutoMlConfig {
            operation_states: states,
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_operation_is_not_polled() {
        let provider = provider(Vec::new());
        let poller = OperationPoller::default();

        let operation = poller
            .wait(&provider, Operation::pending(NAME).succeeded(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(operation.done);
        assert_eq!(provider.operation_polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_done() {
        let provider = provider(vec![
            Operation::pending(NAME),
            Operation::pending(NAME),
            Operation::pending(NAME).succeeded(),
        ]);
        let poller = OperationPoller::default();

        let started = Instant::now();
        let operation = poller
            .wait(&provider, Operation::pending(NAME), &CancellationToken::new())
            .await
            .unwrap();

        assert!(operation.done);
        assert_eq!(provider.operation_polls(), 3);
        // 1s + 2s + 4s of backoff
        assert_eq!(started.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_passed_through() {
        let provider = provider(vec![Operation::pending(NAME).failed(3, "error importing ds")]);
        let poller = OperationPoller::default();

        let error = poller
            .wait(&provider, Operation::pending(NAME), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::UpstreamFailure);
        assert_eq!(error.user_message(), "error importing ds");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_bounded() {
        let provider = provider(vec![Operation::pending(NAME)]);
        let poller = OperationPoller::new(
            PollPolicy::default()
                .with_max_interval(Duration::from_secs(10))
                .with_max_wait(Duration::from_secs(60)),
        );

        let started = Instant::now();
        let error = poller
            .wait(&provider, Operation::pending(NAME), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Timeout);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_polls_at_floor() {
        let provider = provider(vec![Operation::pending(NAME)]);
        let poller = OperationPoller::new(
            PollPolicy::default()
                .with_initial_interval(Duration::ZERO)
                .with_multiplier(1.0)
                .with_max_wait(Duration::from_secs(1)),
        );

        let error = poller
            .wait(&provider, Operation::pending(NAME), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Timeout);
        // one poll every 100ms
        assert_eq!(provider.operation_polls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_wait_still_polls() {
        let provider = provider(vec![Operation::pending(NAME)]);
        let poller =
            OperationPoller::new(PollPolicy::default().with_max_wait(Duration::from_millis(900)));

        let started = Instant::now();
        let error = poller
            .wait(&provider, Operation::pending(NAME), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Timeout);
        assert_eq!(provider.operation_polls(), 1);
        assert_eq!(started.elapsed(), Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_waiting() {
        let provider = provider(vec![Operation::pending(NAME)]);
        let poller = OperationPoller::default();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let error = poller
            .wait(&provider, Operation::pending(NAME), &cancel)
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_token() {
        let provider = provider(vec![Operation::pending(NAME).succeeded()]);
        let poller = OperationPoller::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = poller
            .wait(&provider, Operation::pending(NAME), &cancel)
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Cancelled);
        assert_eq!(provider.operation_polls(), 0);
    }
}
