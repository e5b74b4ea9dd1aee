// tests/giveaway_manager_tests.rs

use std::collections::HashSet;
use std::time::Duration;

use giftbot_common::models::{ChannelRef, GiveawayKey, UserRef, ENTRY_REACTION};
use giftbot_core::Error;
use giftbot_core::services::giveaway::render::{COLOR_ENDED, COLOR_REROLLED, NO_PARTICIPANTS};
use giftbot_core::test_utils::helpers::{stub_manager, users, STUB_BOT_USER};

const CHANNEL: ChannelRef = ChannelRef(77);

#[tokio::test]
async fn create_posts_entry_message_and_arms_timer() -> Result<(), Error> {
    let (manager, chat, scheduler) = stub_manager();

    let key = manager.create(CHANNEL, "1h 30m", "GPU", 2).await?;

    let posted = chat.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(GiveawayKey::from(posted[0]), key);
    assert_eq!(posted[0].channel, CHANNEL);

    let entry = chat.message(key.0).expect("entry message stored");
    let description = entry.content.description.unwrap_or_default();
    assert!(description.contains("**Prize:** GPU"));
    assert!(description.contains("**Duration:** 1h 30m"));
    assert!(description.contains("**Winners:** 2"));
    assert!(description.contains(ENTRY_REACTION));

    // The bot seeds the entry reaction itself.
    assert_eq!(chat.reactions(key.0), vec![STUB_BOT_USER]);

    assert_eq!(scheduler.armed(), vec![(key, Duration::from_millis(5_400_000))]);
    assert!(manager.is_active(key));
    let stats = manager.stats();
    assert_eq!((stats.active_count, stats.ended_count), (1, 0));
    Ok(())
}

#[tokio::test]
async fn end_draws_distinct_winners_from_non_bot_entrants() -> Result<(), Error> {
    let (manager, chat, scheduler) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "GPU", 2).await?;

    let entrants = users(&[10, 11, 12, 13, 14]);
    chat.set_entrants(key.0, &entrants);

    let outcome = manager.end(key).await?;
    assert_eq!(outcome.key, key);
    assert_eq!(outcome.prize, "GPU");
    assert_eq!(outcome.winners.len(), 2);
    let distinct: HashSet<UserRef> = outcome.winners.iter().copied().collect();
    assert_eq!(distinct.len(), 2);
    assert!(outcome.winners.iter().all(|w| entrants.contains(w)));
    assert!(!outcome.winners.contains(&STUB_BOT_USER));

    assert!(!manager.is_active(key));
    let ended = manager.ended_giveaway(key).expect("ended record");
    assert_eq!(ended.winners, outcome.winners);
    assert_eq!(ended.channel, CHANNEL);

    let handle = scheduler.handle_for(key).expect("timer was armed");
    assert!(handle.is_cancelled());

    // Announcement is a new message in the giveaway's channel.
    let announcement = chat.message(ended.announcement.message_id).expect("announcement");
    assert_eq!(announcement.channel, CHANNEL);
    assert_eq!(announcement.content.color, COLOR_ENDED);
    for winner in &outcome.winners {
        assert!(announcement
            .content
            .description
            .as_deref()
            .unwrap_or_default()
            .contains(&format!("<@{}>", winner.0)));
    }

    let stats = manager.stats();
    assert_eq!((stats.active_count, stats.ended_count), (0, 1));
    Ok(())
}

#[tokio::test]
async fn end_with_fewer_entrants_than_winners_picks_everyone() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "10m", "Sticker pack", 5).await?;
    chat.set_entrants(key.0, &users(&[21, 22]));

    let mut winners = manager.end(key).await?.winners;
    winners.sort();
    assert_eq!(winners, users(&[21, 22]));
    Ok(())
}

#[tokio::test]
async fn end_with_only_bots_announces_no_participants() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1d", "Nitro", 1).await?;
    chat.mark_bot(UserRef(30));
    chat.set_entrants(key.0, &[UserRef(30)]);

    let outcome = manager.end(key).await?;
    assert!(outcome.winners.is_empty());

    let ended = manager.ended_giveaway(key).expect("ended record");
    let announcement = chat.message(ended.announcement.message_id).expect("announcement");
    assert!(announcement
        .content
        .description
        .unwrap_or_default()
        .contains(NO_PARTICIPANTS));
    Ok(())
}

#[tokio::test]
async fn repeated_reactions_count_once() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "Mug", 2).await?;
    chat.set_entrants(key.0, &users(&[40, 40, 40]));

    let outcome = manager.end(key).await?;
    assert_eq!(outcome.winners, users(&[40]));
    Ok(())
}

#[tokio::test]
async fn end_unknown_or_twice_is_not_found() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();

    let err = manager.end(GiveawayKey(999)).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.user_message(), "Could not find an active giveaway with that ID.");

    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    chat.set_entrants(key.0, &users(&[10]));
    manager.end(key).await?;

    let posted_before = chat.posted().len();
    let err = manager.end(key).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    // The second attempt must not announce anything.
    assert_eq!(chat.posted().len(), posted_before);
    assert_eq!(manager.stats().ended_count, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_ends_process_the_giveaway_once() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    chat.set_entrants(key.0, &users(&[10, 11]));

    let (first, second) = tokio::join!(manager.end(key), manager.end(key));
    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    // Entry message plus exactly one announcement.
    assert_eq!(chat.posted().len(), 2);
    assert_eq!(manager.stats().ended_count, 1);
    Ok(())
}

#[tokio::test]
async fn deleted_entry_message_drops_the_giveaway() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    chat.delete_message(key.0);

    let err = manager.end(key).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(!manager.is_active(key));
    assert!(manager.ended_giveaway(key).is_none());
    let stats = manager.stats();
    assert_eq!((stats.active_count, stats.ended_count), (0, 0));
    Ok(())
}

#[tokio::test]
async fn reroll_edits_the_announcement_with_current_entrants() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    chat.set_entrants(key.0, &users(&[10]));
    manager.end(key).await?;
    let announcement = manager.ended_giveaway(key).expect("ended").announcement;

    // Entrants changed since the end.
    chat.set_entrants(key.0, &users(&[50]));
    let outcome = manager.reroll(key).await?;
    assert_eq!(outcome.winners, users(&[50]));

    let record = manager.ended_giveaway(key).expect("ended");
    assert_eq!(record.announcement, announcement);
    assert_eq!(record.winners, users(&[50]));

    let edited = chat.message(announcement.message_id).expect("announcement");
    assert_eq!(edited.edits, 1);
    assert_eq!(edited.content.color, COLOR_REROLLED);
    assert!(edited.content.description.unwrap_or_default().contains("<@50>"));

    // Still ended, not reactivated.
    assert!(!manager.is_active(key));
    assert_eq!(manager.stats().ended_count, 1);
    Ok(())
}

#[tokio::test]
async fn reroll_can_redraw_previous_winner_and_keeps_record_fields() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "Headset", 1).await?;
    chat.set_entrants(key.0, &users(&[10]));
    assert_eq!(manager.end(key).await?.winners, users(&[10]));
    let before = manager.ended_giveaway(key).expect("ended");

    // Same single entrant: the earlier winner is still eligible.
    let outcome = manager.reroll(key).await?;
    assert_eq!(outcome.winners, users(&[10]));
    assert_eq!(outcome.prize, "Headset");

    let after = manager.ended_giveaway(key).expect("ended");
    assert_eq!(after.prize, before.prize);
    assert_eq!(after.winner_count, before.winner_count);
    assert_eq!(after.ended_at, before.ended_at);
    assert_eq!(after.channel, before.channel);
    assert_eq!(after.winners, users(&[10]));

    // A second reroll changes nothing either.
    manager.reroll(key).await?;
    assert_eq!(manager.ended_giveaway(key).expect("ended").ended_at, before.ended_at);
    Ok(())
}

#[tokio::test]
async fn reroll_posts_new_announcement_when_old_one_is_gone() -> Result<(), Error> {
    let (manager, chat, _) = stub_manager();
    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    chat.set_entrants(key.0, &users(&[10]));
    manager.end(key).await?;
    let old = manager.ended_giveaway(key).expect("ended").announcement;

    chat.delete_message(old.message_id);
    manager.reroll(key).await?;

    let new = manager.ended_giveaway(key).expect("ended").announcement;
    assert_ne!(new, old);
    assert_eq!(new.channel, CHANNEL);
    let posted = chat.message(new.message_id).expect("new announcement");
    assert_eq!(posted.content.color, COLOR_REROLLED);
    Ok(())
}

#[tokio::test]
async fn reroll_requires_an_ended_giveaway() -> Result<(), Error> {
    let (manager, _, _) = stub_manager();

    let err = manager.reroll(GiveawayKey(5)).await.unwrap_err();
    assert_eq!(err.user_message(), "Could not find an ended giveaway with that ID.");

    let key = manager.create(CHANNEL, "1h", "GPU", 1).await?;
    let err = manager.reroll(key).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(manager.is_active(key));
    Ok(())
}

#[tokio::test]
async fn invalid_create_leaves_no_state() {
    let (manager, chat, scheduler) = stub_manager();

    let err = manager.create(CHANNEL, "soon", "GPU", 1).await.unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));

    let err = manager.create(CHANNEL, "1h", "GPU", 0).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = manager.create(CHANNEL, "0s", "GPU", 1).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = manager.create(CHANNEL, "1h", "   ", 1).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    assert!(chat.posted().is_empty());
    assert!(scheduler.armed().is_empty());
    let stats = manager.stats();
    assert_eq!((stats.active_count, stats.ended_count), (0, 0));
}

#[tokio::test]
async fn shutdown_cancels_armed_timers() -> Result<(), Error> {
    let (manager, _, scheduler) = stub_manager();
    let a = manager.create(CHANNEL, "1h", "A", 1).await?;
    let b = manager.create(CHANNEL, "2h", "B", 1).await?;

    manager.shutdown();

    for key in [a, b] {
        assert!(scheduler.handle_for(key).expect("armed").is_cancelled());
    }
    Ok(())
}
