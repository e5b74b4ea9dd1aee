use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::models::GiveawayKey;

/// Arms one-shot timers that expire a giveaway after a delay.
pub trait TimerScheduler: Send + Sync {
    fn schedule(&self, key: GiveawayKey, delay: Duration) -> TimerHandle;
}

/// Handle to a pending timer. Cancelling is idempotent and is a no-op once
/// the timer has fired.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The token the timer task waits on alongside its sleep.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}
