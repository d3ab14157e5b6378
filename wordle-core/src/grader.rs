use wordle_types::Verdict;

use crate::word::{WORD_LENGTH, Word};

pub struct Grader;

impl Grader {
    /// Grade a guess against the secret, one verdict per position.
    ///
    /// Exact matches are resolved first and consume their secret letter, so a
    /// repeated guess letter can never be credited against a secret letter that
    /// is already matched elsewhere. Remaining letters then consume the first
    /// unconsumed occurrence in the secret, left to right.
    pub fn grade(secret: &Word, guess: &Word) -> Vec<Verdict> {
        let secret = secret.as_bytes();
        let guess = guess.as_bytes();

        let mut verdicts = [Verdict::Wrong; WORD_LENGTH];
        let mut resolved = [false; WORD_LENGTH];
        let mut consumed = [false; WORD_LENGTH];

        // First pass: mark correct positions
        for i in 0..WORD_LENGTH {
            if guess[i] == secret[i] {
                verdicts[i] = Verdict::Correct;
                resolved[i] = true;
                consumed[i] = true;
            }
        }

        // Second pass: misplaced letters take the first unconsumed occurrence
        for i in 0..WORD_LENGTH {
            if resolved[i] {
                continue;
            }

            let occurrence = (0..WORD_LENGTH).find(|&j| !consumed[j] && secret[j] == guess[i]);
            if let Some(j) = occurrence {
                consumed[j] = true;
                verdicts[i] = Verdict::Misplaced;
            }
        }

        verdicts.to_vec()
    }

    /// Re-grade a guess history. Every guess starts from a fresh consumption
    /// state.
    pub fn replay(secret: &Word, guesses: &[Word]) -> Vec<Vec<Verdict>> {
        guesses
            .iter()
            .map(|guess| Self::grade(secret, guess))
            .collect()
    }

    pub fn is_solved(verdicts: &[Verdict]) -> bool {
        !verdicts.is_empty() && verdicts.iter().all(|v| *v == Verdict::Correct)
    }
}
