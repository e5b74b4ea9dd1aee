use std::collections::HashSet;

use giftbot_common::models::UserRef;

/// Drops bots from the raw reaction list. Each remaining user appears once,
/// in first-seen order.
pub fn filter_participants<F>(entrants: &[UserRef], is_bot: F) -> Vec<UserRef>
where
    F: Fn(&UserRef) -> bool,
{
    let mut seen = HashSet::with_capacity(entrants.len());
    entrants
        .iter()
        .filter(|user| !is_bot(user))
        .filter(|user| seen.insert(**user))
        .copied()
        .collect()
}
