use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use wordle_types::WordId;

use crate::record::PoolWord;

pub struct PuzzleSelector;

impl PuzzleSelector {
    /// Pick uniformly among the candidates the user has not attempted today.
    ///
    /// Storage already filters by attempted ids; the set is applied again here
    /// so a stale candidate list can never hand out a repeat.
    pub fn select<R: Rng + ?Sized>(
        candidates: &[PoolWord],
        attempted_today: &HashSet<WordId>,
        rng: &mut R,
    ) -> Option<PoolWord> {
        let available: Vec<&PoolWord> = candidates
            .iter()
            .filter(|candidate| !attempted_today.contains(&candidate.id))
            .collect();

        available.choose(rng).map(|word| (*word).clone())
    }
}
