// giftbot-core/src/tasks/giveaway_timers.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use giftbot_common::models::GiveawayKey;
use giftbot_common::traits::scheduler_traits::{TimerHandle, TimerScheduler};

use crate::Error;
use crate::services::giveaway::GiveawayManager;

/// Arms each timer as a tokio task that either sees its handle cancelled or
/// sleeps out the delay and pushes the key onto the expiry queue.
pub struct TokioTimerScheduler {
    expired_tx: UnboundedSender<GiveawayKey>,
}

impl TokioTimerScheduler {
    /// Returns the scheduler and the receiving end of its expiry queue, to be
    /// handed to `spawn_expiry_dispatch_task`.
    pub fn new() -> (Self, UnboundedReceiver<GiveawayKey>) {
        let (expired_tx, expired_rx) = unbounded_channel();
        (Self { expired_tx }, expired_rx)
    }
}

impl TimerScheduler for TokioTimerScheduler {
    fn schedule(&self, key: GiveawayKey, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::new();
        let cancelled = handle.cancellation_token();
        let expired_tx = self.expired_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    trace!("Timer for giveaway {key} cancelled");
                }
                _ = sleep(delay) => {
                    if expired_tx.send(key).is_err() {
                        warn!("Timer for giveaway {key} fired after the expiry queue closed");
                    }
                }
            }
        });

        handle
    }
}

/// Drains the expiry queue, ending each giveaway on its own task so a slow
/// platform call holds up only that giveaway.
pub fn spawn_expiry_dispatch_task(
    manager: Arc<GiveawayManager>,
    mut expired_rx: UnboundedReceiver<GiveawayKey>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(key) = expired_rx.recv().await {
            let manager = manager.clone();
            tokio::spawn(async move {
                match manager.end(key).await {
                    Ok(outcome) => {
                        info!("Timer ended giveaway {key} ({} winner(s))", outcome.winners.len());
                    }
                    Err(Error::NotFound(_)) => {
                        debug!("Timer for giveaway {key} fired but it was already ended or removed");
                    }
                    Err(e) => {
                        warn!("Timer failed to end giveaway {key} => {e:?}");
                    }
                }
            });
        }
        debug!("Giveaway expiry queue closed");
    })
}
