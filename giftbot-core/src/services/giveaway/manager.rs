// giftbot-core/src/services/giveaway/manager.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use giftbot_common::models::{
    ActiveGiveaway, ChannelRef, DrawOutcome, EndedGiveaway, GiveawayKey, GiveawayStats, MessageRef,
    UserRef, ENTRY_REACTION,
};
use giftbot_common::traits::platform_traits::ChatPlatform;
use giftbot_common::traits::scheduler_traits::TimerScheduler;

use crate::Error;
use crate::services::giveaway::duration::{format_duration, parse_duration};
use crate::services::giveaway::participants::filter_participants;
use crate::services::giveaway::render::GiveawayRenderer;
use crate::services::giveaway::selector::select_winners;

/// Owns every giveaway the process knows about.
///
/// A key lives in `active` until it is ended, then in `ended` forever. The
/// two maps are only touched in short critical sections that never span an
/// `.await`; in particular `end` removes the active record before it talks
/// to the platform, so a timer and a manual end racing on the same key
/// cannot both process it.
///
/// Ended giveaways are never evicted; memory grows with the number of
/// giveaways run since startup.
pub struct GiveawayManager {
    chat: Arc<dyn ChatPlatform>,
    scheduler: Arc<dyn TimerScheduler>,
    renderer: GiveawayRenderer,
    active: DashMap<GiveawayKey, ActiveGiveaway>,
    ended: DashMap<GiveawayKey, EndedGiveaway>,
    rng: Mutex<StdRng>,
}

impl GiveawayManager {
    pub fn new(
        chat: Arc<dyn ChatPlatform>,
        scheduler: Arc<dyn TimerScheduler>,
        renderer: GiveawayRenderer,
    ) -> Self {
        Self::with_rng(chat, scheduler, renderer, StdRng::from_os_rng())
    }

    /// Same as `new` but with a caller-supplied random source, e.g. a seeded one.
    pub fn with_rng(
        chat: Arc<dyn ChatPlatform>,
        scheduler: Arc<dyn TimerScheduler>,
        renderer: GiveawayRenderer,
        rng: StdRng,
    ) -> Self {
        Self {
            chat,
            scheduler,
            renderer,
            active: DashMap::new(),
            ended: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn renderer(&self) -> &GiveawayRenderer {
        &self.renderer
    }

    pub fn chat(&self) -> &Arc<dyn ChatPlatform> {
        &self.chat
    }

    /// Posts the entry message, seeds the entry reaction and arms the timer.
    /// Nothing is recorded unless every step succeeds.
    pub async fn create(
        &self,
        channel: ChannelRef,
        duration_text: &str,
        prize: &str,
        winner_count: u32,
    ) -> Result<GiveawayKey, Error> {
        let duration_ms = parse_duration(duration_text)?;
        if duration_ms == 0 {
            return Err(Error::InvalidArgument(
                "The giveaway duration must be longer than zero.".into(),
            ));
        }
        if winner_count == 0 {
            return Err(Error::InvalidArgument(
                "Please specify a valid number of winners.".into(),
            ));
        }
        let prize = prize.trim();
        if prize.is_empty() {
            return Err(Error::InvalidArgument("Please specify a prize.".into()));
        }

        let content = self
            .renderer
            .entry(prize, &format_duration(duration_ms), winner_count);
        let entry_message = self.chat.post_message(channel, &content).await?;
        self.chat.add_reaction(entry_message, ENTRY_REACTION).await?;

        let key = GiveawayKey::from(entry_message);
        match self.active.entry(key) {
            Entry::Occupied(_) => {
                return Err(Error::InvalidArgument(format!(
                    "A giveaway is already running on message {key}."
                )));
            }
            Entry::Vacant(slot) => {
                // Armed while the slot is locked, so an early fire cannot
                // observe the key before the record exists.
                let timer = self
                    .scheduler
                    .schedule(key, Duration::from_millis(duration_ms));
                slot.insert(ActiveGiveaway {
                    key,
                    channel,
                    prize: prize.to_string(),
                    winner_count,
                    timer,
                });
            }
        }

        info!(
            "Giveaway {key} started in channel {channel}: prize='{prize}', winners={winner_count}, duration={}",
            format_duration(duration_ms)
        );
        Ok(key)
    }

    /// Ends an active giveaway: draws winners, announces them and moves the
    /// record to the ended collection.
    pub async fn end(&self, key: GiveawayKey) -> Result<DrawOutcome, Error> {
        let Some((_, giveaway)) = self.active.remove(&key) else {
            return Err(Error::NotFound(
                "Could not find an active giveaway with that ID.".into(),
            ));
        };
        giveaway.timer.cancel();

        let entry_message = MessageRef::new(giveaway.channel, key.0);
        let winners = match self.draw(entry_message, giveaway.winner_count).await {
            Ok(winners) => winners,
            Err(e) if e.is_not_found() => {
                warn!("Giveaway {key}: entry message is gone, dropping it without a draw");
                return Err(Error::NotFound(
                    "Could not find an active giveaway with that ID.".into(),
                ));
            }
            Err(e) => {
                warn!("Giveaway {key}: failed to collect entrants => {e:?}");
                return Err(e);
            }
        };

        let content = self.renderer.ended(&giveaway.prize, &winners);
        let announcement = self.chat.post_message(giveaway.channel, &content).await?;

        self.ended.insert(
            key,
            EndedGiveaway {
                key,
                channel: giveaway.channel,
                prize: giveaway.prize.clone(),
                winner_count: giveaway.winner_count,
                ended_at: Utc::now(),
                announcement,
                winners: winners.clone(),
            },
        );

        info!("Giveaway {key} ended with {} winner(s)", winners.len());
        Ok(DrawOutcome {
            key,
            prize: giveaway.prize,
            winners,
        })
    }

    /// Draws a fresh set of winners for an ended giveaway from whoever is
    /// reacting to its entry message right now.
    pub async fn reroll(&self, key: GiveawayKey) -> Result<DrawOutcome, Error> {
        let (channel, prize, winner_count, announcement) = match self.ended.get(&key) {
            Some(record) => (
                record.channel,
                record.prize.clone(),
                record.winner_count,
                record.announcement,
            ),
            None => {
                return Err(Error::NotFound(
                    "Could not find an ended giveaway with that ID.".into(),
                ));
            }
        };

        let entry_message = MessageRef::new(channel, key.0);
        let winners = self
            .draw(entry_message, winner_count)
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => {
                    Error::NotFound("Could not find an ended giveaway with that ID.".into())
                }
                other => other,
            })?;

        let content = self.renderer.rerolled(&prize, &winners);
        let announcement = match self.chat.edit_message(announcement, &content).await {
            Ok(()) => announcement,
            Err(e) if e.is_not_found() => {
                debug!("Giveaway {key}: announcement is gone, posting a new one");
                self.chat.post_message(channel, &content).await?
            }
            Err(e) => return Err(e),
        };

        if let Some(mut record) = self.ended.get_mut(&key) {
            record.announcement = announcement;
            record.winners = winners.clone();
        }

        info!("Giveaway {key} rerolled with {} winner(s)", winners.len());
        Ok(DrawOutcome { key, prize, winners })
    }

    pub fn stats(&self) -> GiveawayStats {
        GiveawayStats {
            active_count: self.active.len(),
            ended_count: self.ended.len(),
        }
    }

    pub fn is_active(&self, key: GiveawayKey) -> bool {
        self.active.contains_key(&key)
    }

    pub fn ended_giveaway(&self, key: GiveawayKey) -> Option<EndedGiveaway> {
        self.ended.get(&key).map(|record| record.clone())
    }

    /// Cancels every armed timer. Active giveaways are kept in memory but
    /// will no longer end on their own; they are lost with the process.
    pub fn shutdown(&self) {
        let mut cancelled = 0usize;
        for record in self.active.iter() {
            record.timer.cancel();
            cancelled += 1;
        }
        if cancelled > 0 {
            warn!("Shutting down with {cancelled} active giveaway(s); their timers were cancelled");
        }
    }

    async fn draw(&self, entry_message: MessageRef, winner_count: u32) -> Result<Vec<UserRef>, Error> {
        let reacting = self
            .chat
            .fetch_reacting_identities(entry_message, ENTRY_REACTION)
            .await?;
        let pool = filter_participants(&reacting, |user| self.chat.is_bot_identity(user));
        debug!(
            "Message {}: {} reaction(s), {} eligible participant(s)",
            entry_message.message_id,
            reacting.len(),
            pool.len()
        );

        let mut rng = self.rng.lock();
        Ok(select_winners(&pool, winner_count as usize, &mut *rng))
    }
}
