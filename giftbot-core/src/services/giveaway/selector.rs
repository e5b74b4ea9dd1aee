use rand::Rng;

use giftbot_common::models::UserRef;

/// Draws `min(count, pool.len())` distinct winners uniformly at random.
///
/// Each round picks a random index into what is left of the pool and moves
/// that user to the result, so the output is in draw order. `pool` itself is
/// never touched.
pub fn select_winners<R>(pool: &[UserRef], count: usize, rng: &mut R) -> Vec<UserRef>
where
    R: Rng + ?Sized,
{
    let mut remaining = pool.to_vec();
    let target = count.min(remaining.len());
    let mut winners = Vec::with_capacity(target);

    while winners.len() < target {
        let index = rng.random_range(0..remaining.len());
        winners.push(remaining.swap_remove(index));
    }
    winners
}
