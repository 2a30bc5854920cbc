// pwguess Guess Estimator
// Per-pattern guess counts plus the combinatorial helpers they share

use crate::dictionary::lower_chars;
use crate::keyboard::{AdjacencyGraph, GraphKind, GraphStats};
use crate::types::{
    ConfigError, DatePattern, DictionaryPattern, Match, Pattern, RegexClass, SequencePattern,
    SpatialPattern,
};

pub const BRUTEFORCE_CARDINALITY: f64 = 10.0;
pub const MIN_GUESSES_BEFORE_GROWING_SEQUENCE: f64 = 10000.0;
pub const MIN_SUBMATCH_GUESSES_SINGLE_CHAR: f64 = 10.0;
pub const MIN_SUBMATCH_GUESSES_MULTI_CHAR: f64 = 50.0;
pub const MIN_YEAR_SPACE: i32 = 20;

// ============ Numeric helpers ============

/// Binomial coefficient as a float
///
/// Computed incrementally so intermediate values stay small.
pub fn n_ck(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 {
        return 1.0;
    }
    let mut n = n as f64;
    let mut r = 1.0;
    for d in 1..=k {
        r *= n;
        r /= d as f64;
        n -= 1.0;
    }
    r
}

/// n! as a float (1 for n < 2)
pub fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

pub fn log10(n: f64) -> f64 {
    n.log10()
}

/// Replace overflowed values with the largest finite float
#[inline]
pub fn saturate(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        f64::MAX
    }
}

/// Sum of C(n, i) for i in 1..=p
fn variations(n: usize, p: usize) -> f64 {
    (1..=p).map(|i| n_ck(n, i)).sum()
}

// ============ Scorer ============

/// Assigns a guess count to any single match
///
/// Holds the reference year and the spatial constants: full keyboards
/// use the qwerty statistics, keypads use the keypad ones.
#[derive(Debug, Clone)]
pub struct Scorer {
    reference_year: i32,
    keyboard: GraphStats,
    keypad: GraphStats,
}

impl Scorer {
    /// Scorer with spatial constants taken from the built-in qwerty and keypad graphs
    pub fn new(reference_year: i32) -> Result<Self, ConfigError> {
        let keyboard = AdjacencyGraph::builtin("qwerty")?.stats();
        let keypad = AdjacencyGraph::builtin("keypad")?.stats();
        Ok(Self::from_stats(reference_year, keyboard, keypad))
    }

    pub fn from_stats(reference_year: i32, keyboard: GraphStats, keypad: GraphStats) -> Self {
        Self {
            reference_year,
            keyboard,
            keypad,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Estimate and memoize the guesses for a match
    ///
    /// Matches shorter than the password are floored at 10 (one char) or
    /// 50 guesses. A match that already carries a guess count returns it
    /// unchanged.
    ///
    /// # Arguments
    /// * `m` - The match to score; `guesses` and `guesses_log10` are filled in
    /// * `password` - The full password the match was found in
    pub fn estimate_guesses(&self, m: &mut Match, password: &str) -> f64 {
        self.estimate_with_len(m, password.chars().count())
    }

    pub(crate) fn estimate_with_len(&self, m: &mut Match, password_len: usize) -> f64 {
        if let Some(guesses) = m.guesses {
            return guesses;
        }

        let token_len = m.len();
        let min_guesses = if token_len < password_len {
            if token_len == 1 {
                MIN_SUBMATCH_GUESSES_SINGLE_CHAR
            } else {
                MIN_SUBMATCH_GUESSES_MULTI_CHAR
            }
        } else {
            1.0
        };

        let Match { token, pattern, .. } = m;
        let guesses = match pattern {
            Pattern::Bruteforce => bruteforce_guesses(token_len),
            Pattern::Dictionary(d) => dictionary_guesses(d, token),
            Pattern::Spatial(s) => self.spatial_guesses(s, token_len),
            Pattern::Repeat(r) => r.base_guesses * r.repeat_count as f64,
            Pattern::Sequence(s) => sequence_guesses(s, token),
            Pattern::Regex(r) => self.regex_guesses(r.regex_name, token),
            Pattern::Date(d) => self.date_guesses(d),
        };

        let guesses = saturate(guesses).max(min_guesses);
        m.guesses = Some(guesses);
        m.guesses_log10 = Some(log10(guesses));
        guesses
    }

    fn year_space(&self, year: i32) -> f64 {
        (year - self.reference_year).abs().max(MIN_YEAR_SPACE) as f64
    }

    /// Distance from the reference year times days per year, times 4 with a separator
    pub fn date_guesses(&self, date: &DatePattern) -> f64 {
        let guesses = self.year_space(date.year) * 365.0;
        if date.separator.is_empty() {
            guesses
        } else {
            guesses * 4.0
        }
    }

    pub fn regex_guesses(&self, class: RegexClass, token: &str) -> f64 {
        match class.cardinality() {
            Some(base) => (base as f64).powf(token.chars().count() as f64),
            None => match token.parse::<i32>() {
                Ok(year) => self.year_space(year),
                Err(_) => MIN_YEAR_SPACE as f64,
            },
        }
    }

    /// Walks of this length or shorter with this many turns or fewer
    pub fn spatial_guesses(&self, spatial: &SpatialPattern, token_len: usize) -> f64 {
        let stats = match spatial.graph_kind {
            GraphKind::Keyboard => self.keyboard,
            GraphKind::Keypad => self.keypad,
        };
        let s = stats.starting_positions as f64;
        let d = stats.average_degree;
        let t = spatial.turns;

        let mut guesses = 0.0;
        for i in 2..=token_len {
            let possible_turns = t.min(i - 1);
            for j in 1..=possible_turns {
                guesses += n_ck(i - 1, j - 1) * s * d.powi(j as i32);
            }
        }

        // shifted keys: % instead of 5, A instead of a
        if spatial.shifted_count > 0 {
            let shifted = spatial.shifted_count;
            let unshifted = token_len.saturating_sub(shifted);
            if unshifted == 0 {
                guesses *= 2.0;
            } else {
                guesses *= variations(shifted + unshifted, shifted.min(unshifted));
            }
        }
        guesses
    }
}

/// 10^len, at least one more than the submatch floor
pub fn bruteforce_guesses(token_len: usize) -> f64 {
    let guesses = saturate(BRUTEFORCE_CARDINALITY.powf(token_len as f64));
    let min_guesses = if token_len == 1 {
        MIN_SUBMATCH_GUESSES_SINGLE_CHAR + 1.0
    } else {
        MIN_SUBMATCH_GUESSES_MULTI_CHAR + 1.0
    };
    guesses.max(min_guesses)
}

pub fn sequence_guesses(sequence: &SequencePattern, token: &str) -> f64 {
    let first = token.chars().next().unwrap_or('a');
    let mut base: f64 = match first {
        'a' | 'A' | 'z' | 'Z' | '0' | '1' | '9' => 4.0,
        c if c.is_ascii_digit() => 10.0,
        _ => 26.0,
    };
    if !sequence.ascending {
        base *= 2.0;
    }
    base * token.chars().count() as f64
}

/// Rank times case, leet and reversal variations
///
/// Records the three factors on the pattern for display.
pub fn dictionary_guesses(dict: &mut DictionaryPattern, token: &str) -> f64 {
    let base = dict.rank as f64;
    let upper = uppercase_variations(token);
    let l33t = l33t_variations(dict, token);
    dict.base_guesses = Some(base);
    dict.uppercase_variations = Some(upper);
    dict.l33t_variations = Some(l33t);
    let reversed = if dict.reversed { 2.0 } else { 1.0 };
    base * upper * l33t * reversed
}

/// Capitalization schemes an attacker would try for this token
pub fn uppercase_variations(word: &str) -> f64 {
    let chars: Vec<char> = word.chars().collect();
    let upper = chars.iter().filter(|c| c.is_ascii_uppercase()).count();
    if upper == 0 || word.to_lowercase() == word {
        return 1.0;
    }

    let n = chars.len();
    let first_only = n > 1 && chars[0].is_ascii_uppercase() && upper == 1;
    let last_only = n > 1 && chars[n - 1].is_ascii_uppercase() && upper == 1;
    let all_upper = !chars.iter().any(|c| c.is_ascii_lowercase());
    if first_only || last_only || all_upper {
        return 2.0;
    }

    let lower = chars.iter().filter(|c| c.is_ascii_lowercase()).count();
    variations(upper + lower, upper.min(lower))
}

/// Substitution schemes an attacker would try for this token
pub fn l33t_variations(dict: &DictionaryPattern, token: &str) -> f64 {
    if !dict.l33t {
        return 1.0;
    }
    let chars = lower_chars(token);
    let mut result = 1.0;
    for (&subbed, &unsubbed) in &dict.sub {
        let s = chars.iter().filter(|&&c| c == subbed).count();
        let u = chars.iter().filter(|&&c| c == unsubbed).count();
        if s == 0 || u == 0 {
            // fully subbed (444) or fully unsubbed (aaa)
            result *= 2.0;
        } else {
            result *= variations(u + s, u.min(s));
        }
    }
    result
}
