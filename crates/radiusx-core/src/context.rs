//! Caller-supplied request context carrying cancellation and deadline.

use crate::{RadiusxError, RadiusxResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for one inbound request.
///
/// Cloning shares the same token, so cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tightens the deadline to at most `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the deadline
    /// unchanged.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Tightens the deadline to at most `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once cancelled or past the deadline.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails fast with [`RadiusxError::Cancelled`] if the context is done.
    pub fn check(&self) -> RadiusxResult<()> {
        if self.is_done() {
            return Err(RadiusxError::Cancelled);
        }
        Ok(())
    }

    /// Runs `fut` until it completes, the context is cancelled, or the
    /// deadline elapses, whichever comes first.
    ///
    /// An already-done context never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> RadiusxResult<T>
    where
        F: Future<Output = RadiusxResult<T>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(RadiusxError::Cancelled),
            () = deadline => Err(RadiusxError::Cancelled),
            result = fut => result,
        }
    }
}
