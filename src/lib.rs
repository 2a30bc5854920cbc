//! # pwguess: Password Guessability Estimation
//!
//! Estimates how many guesses an attacker needs to reach a password by
//! splitting it into recognizable pieces and finding the cheapest
//! combination of them.
//!
//! ## Pipeline
//!
//! 1. **Matching** - [`Matcher::omnimatch`] runs every matcher and returns
//!    all candidate matches sorted by `(i, j)`:
//!    - dictionary words, plain, reversed and through leet substitutions
//!    - keyboard walks (`qwerty`, `6tfGHJ`, keypad `14789`)
//!    - repeats (`aaaa`, `abcabc`), sequences (`abcd`, `9753`)
//!    - recent years and dates (`1991`, `11/20/91`, `111504`)
//! 2. **Scoring** - [`Scorer`] estimates guesses for each match.
//! 3. **Search** - [`most_guessable_match_sequence`] picks the gap-free
//!    sequence minimizing `l! * product(guesses) + 10000^(l-1)`, filling
//!    unexplained spans with bruteforce matches.
//!
//! ## Example Usage
//!
//! ```
//! use pwguess::PasswordEstimator;
//!
//! let estimator = PasswordEstimator::new()?;
//!
//! // per-request inputs are never shared with other requests
//! let result = estimator.estimate("JohnSmith1991", ["john.smith@example.com", "john"]);
//! assert!(!result.sequence.is_empty());
//! println!("{} guesses (10^{:.1})", result.guesses, result.guesses_log10);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **Matcher** - Per-request context holding dictionaries, graphs and tables
//! - **Scorer** - Per-pattern guess estimates
//! - **Search** - Minimum-guess dynamic program over candidate matches
//! - **Config** - TOML selection of the built-in data and reference year

pub mod config;
pub mod data;
pub mod date;
pub mod dictionary;
pub mod keyboard;
pub mod l33t;
pub mod matcher;
pub mod pattern;
pub mod repeat;
pub mod scoring;
pub mod search;
pub mod sequence;
pub mod spatial;
pub mod types;

// Re-export main types and functions for convenience
pub use config::Config;
pub use data::{DataInfo, DataLoader};
pub use dictionary::RankedDictionary;
pub use keyboard::{AdjacencyGraph, GraphKind};
pub use matcher::Matcher;
pub use scoring::Scorer;
pub use search::{
    most_guessable_match_sequence, most_guessable_match_sequence_with, PasswordEstimator,
};
pub use types::{ConfigError, Match, MatchSequence, Pattern, PatternKind, RegexClass};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
