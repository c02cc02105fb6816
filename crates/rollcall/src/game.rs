//! Offline diversion: a number guessing game.
//!
//! Shown instead of the roster while the connectivity gate reports offline.
//! It shares nothing with the contact data.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;

/// Result of one guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not a whole number inside the range; no attempt used.
    Invalid {
        /// Upper bound of the range.
        upper_bound: u32,
    },
    /// The secret is greater than the guess.
    TooLow {
        /// The guess.
        guess: u32,
        /// Attempts left.
        remaining: u32,
    },
    /// The secret is smaller than the guess.
    TooHigh {
        /// The guess.
        guess: u32,
        /// Attempts left.
        remaining: u32,
    },
    /// The guess was right; the game is over.
    Correct {
        /// The secret number.
        secret: u32,
        /// Attempts used, including this one.
        attempts: u32,
    },
    /// The last attempt missed; the game is over.
    OutOfGuesses {
        /// The secret number.
        secret: u32,
    },
    /// The game already ended; restart to play again.
    GameOver,
}

impl GuessOutcome {
    /// Check whether this outcome ended the game.
    #[must_use]
    pub fn ends_game(&self) -> bool {
        matches!(self, Self::Correct { .. } | Self::OutOfGuesses { .. })
    }
}

impl std::fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { upper_bound } => {
                write!(f, "Please enter a whole number between 1 and {upper_bound}.")
            }
            Self::TooLow { guess, remaining } => write!(
                f,
                "Wrong! The secret number is greater than {guess}. You have {remaining} attempts left."
            ),
            Self::TooHigh { guess, remaining } => write!(
                f,
                "Wrong! The secret number is smaller than {guess}. You have {remaining} attempts left."
            ),
            Self::Correct { secret, attempts } => write!(
                f,
                "Congratulations! You guessed the number ({secret}) in {attempts} attempts."
            ),
            Self::OutOfGuesses { secret } => {
                write!(f, "Out of attempts! The number was {secret}.")
            }
            Self::GameOver => write!(f, "The game is over. Type 'restart' to play again."),
        }
    }
}

/// A 1..=N guessing game with a fixed attempt budget.
#[derive(Debug, Clone)]
pub struct GuessingGame {
    config: GameConfig,
    secret: u32,
    guesses: u32,
    over: bool,
}

impl GuessingGame {
    /// Start a game with a random secret.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    /// Start a game drawing the secret from `rng`.
    pub fn with_rng<R: Rng>(config: GameConfig, rng: &mut R) -> Self {
        let secret = draw_secret(&config, rng);
        Self::with_secret(config, secret)
    }

    /// Start a game with a known secret.
    #[must_use]
    pub fn with_secret(config: GameConfig, secret: u32) -> Self {
        Self {
            config,
            secret,
            guesses: 0,
            over: false,
        }
    }

    /// Opening line shown at the start of every round.
    #[must_use]
    pub fn intro(&self) -> String {
        format!(
            "I'm thinking of a number between 1 and {}. Can you guess it?",
            self.config.upper_bound
        )
    }

    /// Take one guess from raw input.
    pub fn guess(&mut self, input: &str) -> GuessOutcome {
        if self.over {
            return GuessOutcome::GameOver;
        }

        let Some(guess) = input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|g| (1..=self.config.upper_bound).contains(g))
        else {
            return GuessOutcome::Invalid {
                upper_bound: self.config.upper_bound,
            };
        };

        self.guesses += 1;
        let remaining = self.config.max_guesses.saturating_sub(self.guesses);
        debug!(guess, attempts = self.guesses, "Guess taken");

        if guess == self.secret {
            self.over = true;
            GuessOutcome::Correct {
                secret: self.secret,
                attempts: self.guesses,
            }
        } else if remaining == 0 {
            self.over = true;
            GuessOutcome::OutOfGuesses {
                secret: self.secret,
            }
        } else if guess < self.secret {
            GuessOutcome::TooLow { guess, remaining }
        } else {
            GuessOutcome::TooHigh { guess, remaining }
        }
    }

    /// Draw a new secret and reset the attempt count.
    pub fn restart(&mut self) {
        self.restart_with(&mut rand::thread_rng());
    }

    /// Like [`restart`](Self::restart), drawing from `rng`.
    pub fn restart_with<R: Rng>(&mut self, rng: &mut R) {
        self.secret = draw_secret(&self.config, rng);
        self.guesses = 0;
        self.over = false;
    }

    /// Attempts used so far.
    #[must_use]
    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    /// Attempts left.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.config.max_guesses.saturating_sub(self.guesses)
    }

    /// Check whether the round has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }
}

fn draw_secret<R: Rng>(config: &GameConfig, rng: &mut R) -> u32 {
    rng.gen_range(1..=config.upper_bound.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(secret: u32) -> GuessingGame {
        GuessingGame::with_secret(GameConfig::default(), secret)
    }

    #[test]
    fn test_intro_mentions_range() {
        assert!(game(5).intro().contains("between 1 and 100"));
    }

    #[test]
    fn test_correct_guess_ends_game() {
        let mut game = game(42);
        assert_eq!(
            game.guess("50"),
            GuessOutcome::TooHigh {
                guess: 50,
                remaining: 9
            }
        );
        assert_eq!(
            game.guess("42"),
            GuessOutcome::Correct {
                secret: 42,
                attempts: 2
            }
        );
        assert!(game.is_over());
        assert_eq!(game.guess("42"), GuessOutcome::GameOver);
    }

    #[test]
    fn test_too_low_feedback() {
        let mut game = game(42);
        assert_eq!(
            game.guess(" 10 "),
            GuessOutcome::TooLow {
                guess: 10,
                remaining: 9
            }
        );
    }

    #[test]
    fn test_invalid_guesses_do_not_count() {
        let mut game = game(42);
        for input in ["", "abc", "0", "101", "-5", "4.5"] {
            assert_eq!(
                game.guess(input),
                GuessOutcome::Invalid { upper_bound: 100 },
                "input {input:?}"
            );
        }
        assert_eq!(game.guesses(), 0);
        assert_eq!(game.remaining(), 10);
    }

    #[test]
    fn test_budget_exhausted() {
        let mut game = game(42);
        for _ in 0..9 {
            assert!(!game.guess("1").ends_game());
        }
        assert_eq!(game.guess("1"), GuessOutcome::OutOfGuesses { secret: 42 });
        assert!(game.is_over());
        assert_eq!(game.remaining(), 0);
    }

    #[test]
    fn test_correct_on_last_attempt_wins() {
        let mut game = game(42);
        for _ in 0..9 {
            game.guess("1");
        }
        assert_eq!(
            game.guess("42"),
            GuessOutcome::Correct {
                secret: 42,
                attempts: 10
            }
        );
    }

    #[test]
    fn test_restart_resets() {
        let mut game = game(42);
        game.guess("42");
        assert!(game.is_over());

        game.restart_with(&mut StdRng::seed_from_u64(7));
        assert!(!game.is_over());
        assert_eq!(game.guesses(), 0);
    }

    #[test]
    fn test_secret_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GameConfig {
            upper_bound: 3,
            max_guesses: 10,
        };
        for _ in 0..100 {
            let mut game = GuessingGame::with_rng(config.clone(), &mut rng);
            let won = ["1", "2", "3"]
                .iter()
                .any(|g| matches!(game.guess(g), GuessOutcome::Correct { .. }));
            assert!(won);
        }
    }

    #[test]
    fn test_outcome_messages() {
        assert!(GuessOutcome::TooLow {
            guess: 5,
            remaining: 3
        }
        .to_string()
        .contains("greater than 5"));
        assert!(GuessOutcome::TooHigh {
            guess: 5,
            remaining: 3
        }
        .to_string()
        .contains("smaller than 5"));
        assert!(GuessOutcome::OutOfGuesses { secret: 9 }
            .to_string()
            .contains('9'));
        assert!(GuessOutcome::GameOver.to_string().contains("restart"));
    }
}
