//! Per-call cancellation and deadline

use crate::{GuideError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How many items a long scan processes between two cancellation checks
pub const CANCELLATION_CHECK_INTERVAL: usize = 64;

/// Context handed to every call by the transport
///
/// Carries the caller's cancellation signal and optional deadline. The core
/// never invents a deadline of its own; it only observes the one given here.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Context with no deadline that is only cancelled explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Context driven by an existing cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set an absolute deadline, keeping the earlier one if already set
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derived context: cancelled with its parent, but cancelling it leaves the parent alone
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel the call and every context derived from it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline (None without a deadline)
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Fail with `Cancelled` or `DeadlineExceeded` if the call should stop
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(GuideError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(GuideError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolve once the call is cancelled or its deadline passes
    ///
    /// Returns the error describing why the call is over.
    pub async fn done(&self) -> GuideError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => GuideError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => GuideError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                GuideError::Cancelled
            }
        }
    }
}
