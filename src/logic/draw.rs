//! Draw: seeded shuffle of the team order before fixtures are generated.

use crate::models::Team;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `teams` in place. The same seed always gives the same order.
pub fn draw_order(teams: &mut [Team], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    teams.shuffle(&mut rng);
}
