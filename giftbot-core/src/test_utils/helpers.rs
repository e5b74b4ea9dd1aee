// File: giftbot-core/src/test_utils/helpers.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use giftbot_common::models::{ChannelRef, GiveawayKey, MessageContent, MessageRef, UserRef};
use giftbot_common::traits::platform_traits::ChatPlatform;
use giftbot_common::traits::scheduler_traits::{TimerHandle, TimerScheduler};

use crate::Error;
use crate::services::giveaway::{GiveawayManager, GiveawayRenderer};

/// The stub's own account; it reacts to every entry message it posts.
pub const STUB_BOT_USER: UserRef = UserRef(1);

#[derive(Debug, Clone)]
pub struct StubMessage {
    pub channel: ChannelRef,
    pub content: MessageContent,
    pub edits: usize,
}

#[derive(Default)]
struct StubState {
    messages: HashMap<u64, StubMessage>,
    reactions: HashMap<u64, Vec<UserRef>>,
    bots: HashSet<UserRef>,
    posted_order: Vec<MessageRef>,
}

/// In-memory stand-in for a chat platform. Message ids are handed out
/// sequentially starting at 1000.
pub struct StubChat {
    next_id: AtomicU64,
    state: Mutex<StubState>,
}

impl Default for StubChat {
    fn default() -> Self {
        Self::new()
    }
}

impl StubChat {
    pub fn new() -> Self {
        let mut state = StubState::default();
        state.bots.insert(STUB_BOT_USER);
        Self {
            next_id: AtomicU64::new(1000),
            state: Mutex::new(state),
        }
    }

    /// Replaces the users reacting to `message_id`, keeping the bot's own
    /// seed reaction in front.
    pub fn set_entrants(&self, message_id: u64, users: &[UserRef]) {
        let mut state = self.state.lock();
        let mut reacting = vec![STUB_BOT_USER];
        reacting.extend_from_slice(users);
        state.reactions.insert(message_id, reacting);
    }

    pub fn mark_bot(&self, user: UserRef) {
        self.state.lock().bots.insert(user);
    }

    pub fn delete_message(&self, message_id: u64) {
        let mut state = self.state.lock();
        state.messages.remove(&message_id);
        state.reactions.remove(&message_id);
    }

    pub fn message(&self, message_id: u64) -> Option<StubMessage> {
        self.state.lock().messages.get(&message_id).cloned()
    }

    /// Every message posted so far, oldest first, including deleted ones.
    pub fn posted(&self) -> Vec<MessageRef> {
        self.state.lock().posted_order.clone()
    }

    pub fn reactions(&self, message_id: u64) -> Vec<UserRef> {
        self.state
            .lock()
            .reactions
            .get(&message_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatPlatform for StubChat {
    async fn post_message(&self, channel: ChannelRef, content: &MessageContent) -> Result<MessageRef, Error> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let message = MessageRef::new(channel, id);
        let mut state = self.state.lock();
        state.messages.insert(
            id,
            StubMessage {
                channel,
                content: content.clone(),
                edits: 0,
            },
        );
        state.posted_order.push(message);
        Ok(message)
    }

    async fn edit_message(&self, message: MessageRef, content: &MessageContent) -> Result<(), Error> {
        let mut state = self.state.lock();
        let stored = state
            .messages
            .get_mut(&message.message_id)
            .ok_or_else(|| Error::NotFound(format!("message {}", message.message_id)))?;
        stored.content = content.clone();
        stored.edits += 1;
        Ok(())
    }

    async fn add_reaction(&self, message: MessageRef, _emoji: &str) -> Result<(), Error> {
        let mut state = self.state.lock();
        if !state.messages.contains_key(&message.message_id) {
            return Err(Error::NotFound(format!("message {}", message.message_id)));
        }
        state
            .reactions
            .entry(message.message_id)
            .or_default()
            .push(STUB_BOT_USER);
        Ok(())
    }

    async fn fetch_reacting_identities(&self, message: MessageRef, _emoji: &str) -> Result<Vec<UserRef>, Error> {
        let state = self.state.lock();
        if !state.messages.contains_key(&message.message_id) {
            return Err(Error::NotFound(format!("message {}", message.message_id)));
        }
        Ok(state
            .reactions
            .get(&message.message_id)
            .cloned()
            .unwrap_or_default())
    }

    fn is_bot_identity(&self, user: &UserRef) -> bool {
        self.state.lock().bots.contains(user)
    }
}

/// Records every timer it is asked to arm and never fires on its own.
#[derive(Default)]
pub struct ManualScheduler {
    armed: Mutex<Vec<(GiveawayKey, Duration, TimerHandle)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> Vec<(GiveawayKey, Duration)> {
        self.armed
            .lock()
            .iter()
            .map(|(key, delay, _)| (*key, *delay))
            .collect()
    }

    pub fn handle_for(&self, key: GiveawayKey) -> Option<TimerHandle> {
        self.armed
            .lock()
            .iter()
            .find(|(armed_key, _, _)| *armed_key == key)
            .map(|(_, _, handle)| handle.clone())
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&self, key: GiveawayKey, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::new();
        self.armed.lock().push((key, delay, handle.clone()));
        handle
    }
}

/// A manager over a fresh stub and manual scheduler, with a fixed seed.
pub fn stub_manager() -> (Arc<GiveawayManager>, Arc<StubChat>, Arc<ManualScheduler>) {
    let chat = Arc::new(StubChat::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let manager = Arc::new(GiveawayManager::with_rng(
        chat.clone(),
        scheduler.clone(),
        GiveawayRenderer::new("Test Bot"),
        StdRng::seed_from_u64(42),
    ));
    (manager, chat, scheduler)
}

pub fn users(ids: &[u64]) -> Vec<UserRef> {
    ids.iter().copied().map(UserRef).collect()
}
