// pwguess Sequence Search
// Minimum-guess decomposition of a password and the estimator facade

use crate::config::Config;
use crate::matcher::Matcher;
use crate::scoring::{factorial, log10, saturate, Scorer, MIN_GUESSES_BEFORE_GROWING_SEQUENCE};
use crate::types::{ConfigError, Match, MatchSequence, Pattern, PatternKind};
use std::collections::BTreeMap;

/// Find the gap-free, non-overlapping match sequence an attacker would
/// reach with the fewest guesses
///
/// Minimizes `l! * product(guesses) + 10000^(l-1)` over sequences of
/// length `l`. Spans no match explains are filled with bruteforce matches.
///
/// # Arguments
/// * `password` - The full password
/// * `matches` - Candidate matches, usually from [`Matcher::omnimatch`]
/// * `scorer` - Guess estimator for individual matches
///
/// # Example
/// ```
/// # use pwguess::scoring::Scorer;
/// # use pwguess::search::most_guessable_match_sequence;
/// let scorer = Scorer::new(2020).unwrap();
/// let result = most_guessable_match_sequence("", &[], &scorer);
/// assert_eq!(result.guesses, 1.0);
/// assert!(result.sequence.is_empty());
/// ```
pub fn most_guessable_match_sequence(
    password: &str,
    matches: &[Match],
    scorer: &Scorer,
) -> MatchSequence {
    most_guessable_match_sequence_with(password, matches, scorer, false)
}

/// [`most_guessable_match_sequence`] with the `10000^(l-1)` term optionally dropped
pub fn most_guessable_match_sequence_with(
    password: &str,
    matches: &[Match],
    scorer: &Scorer,
    exclude_additive: bool,
) -> MatchSequence {
    let chars: Vec<char> = password.chars().collect();
    let n = chars.len();
    if n == 0 {
        return MatchSequence {
            password: String::new(),
            guesses: 1.0,
            guesses_log10: 0.0,
            sequence: Vec::new(),
            score: 0,
        };
    }

    let mut search = OptimalSearch::new(&chars, scorer, exclude_additive);

    // partition by end index; sort each bucket by start for deterministic output
    let mut by_j: Vec<Vec<usize>> = vec![Vec::new(); n];
    for m in matches.iter().filter(|m| m.i <= m.j && m.j < n) {
        by_j[m.j].push(search.push(m.clone()));
    }
    for bucket in &mut by_j {
        bucket.sort_by_key(|&idx| search.arena[idx].i);
    }

    for (k, bucket) in by_j.iter().enumerate() {
        for &idx in bucket {
            match search.arena[idx].i.checked_sub(1) {
                Some(prev) => {
                    let lengths: Vec<usize> = search.m[prev].keys().copied().collect();
                    for l in lengths {
                        search.update(idx, l + 1);
                    }
                }
                None => search.update(idx, 1),
            }
        }
        search.bruteforce_update(k);
    }

    let (guesses, sequence) = search.unwind();
    log::debug!(
        "best sequence over {} chars: {} matches, {:.0} guesses",
        n,
        sequence.len(),
        guesses
    );

    MatchSequence {
        password: password.to_string(),
        guesses,
        guesses_log10: log10(guesses),
        sequence,
        score: 0,
    }
}

/// DP state, indexed by end position `k` and sequence length `l`
struct OptimalSearch<'a> {
    chars: &'a [char],
    scorer: &'a Scorer,
    exclude_additive: bool,

    /// Candidate and bruteforce matches; the tables below hold indices into it
    arena: Vec<Match>,

    /// Last match of the best length-l sequence covering `0..=k`
    m: Vec<BTreeMap<usize, usize>>,

    /// Product of guesses along that sequence
    pi: Vec<BTreeMap<usize, f64>>,

    /// Overall metric for that sequence
    g: Vec<BTreeMap<usize, f64>>,
}

impl<'a> OptimalSearch<'a> {
    fn new(chars: &'a [char], scorer: &'a Scorer, exclude_additive: bool) -> Self {
        let n = chars.len();
        Self {
            chars,
            scorer,
            exclude_additive,
            arena: Vec::new(),
            m: vec![BTreeMap::new(); n],
            pi: vec![BTreeMap::new(); n],
            g: vec![BTreeMap::new(); n],
        }
    }

    fn push(&mut self, m: Match) -> usize {
        self.arena.push(m);
        self.arena.len() - 1
    }

    fn bruteforce(&self, i: usize, j: usize) -> Match {
        Match::new(
            i,
            j,
            self.chars[i..=j].iter().collect::<String>(),
            Pattern::Bruteforce,
        )
    }

    /// Consider the length-l sequence ending with arena match `idx`,
    /// keeping it only if no sequence of length <= l over the same prefix
    /// does at least as well
    fn update(&mut self, idx: usize, l: usize) {
        let n = self.chars.len();
        let mut pi = self.scorer.estimate_with_len(&mut self.arena[idx], n);
        let (i, k) = (self.arena[idx].i, self.arena[idx].j);

        if l > 1 {
            let prev = i
                .checked_sub(1)
                .and_then(|prev| self.pi[prev].get(&(l - 1)).copied());
            let Some(prev) = prev else {
                return;
            };
            pi = saturate(pi * prev);
        }

        let mut g = factorial(l) * pi;
        if !self.exclude_additive {
            g += MIN_GUESSES_BEFORE_GROWING_SEQUENCE.powi((l - 1) as i32);
        }
        let g = saturate(g);

        if self.g[k].range(..=l).any(|(_, &competing)| competing <= g) {
            return;
        }
        self.g[k].insert(l, g);
        self.m[k].insert(l, idx);
        self.pi[k].insert(l, pi);
    }

    /// Fold in bruteforce matches ending at `k`
    fn bruteforce_update(&mut self, k: usize) {
        let whole = self.bruteforce(0, k);
        let idx = self.push(whole);
        self.update(idx, 1);

        for i in 1..=k {
            let filler = self.bruteforce(i, k);
            let idx = self.push(filler);
            // two adjacent bruteforce matches never beat one wider one
            let lengths: Vec<usize> = self.m[i - 1]
                .iter()
                .filter(|&(_, &last)| self.arena[last].kind() != PatternKind::Bruteforce)
                .map(|(&l, _)| l)
                .collect();
            for l in lengths {
                self.update(idx, l + 1);
            }
        }
    }

    /// Walk back from the end of the password along the best sequence
    ///
    /// The shortest sequence wins ties at the last position.
    fn unwind(&self) -> (f64, Vec<Match>) {
        let n = self.chars.len();
        let best = self.g[n - 1]
            .iter()
            .fold(None::<(usize, f64)>, |best, (&l, &g)| match best {
                Some((_, best_g)) if best_g <= g => best,
                _ => Some((l, g)),
            });
        let Some((mut l, guesses)) = best else {
            return (f64::MAX, Vec::new());
        };

        let mut sequence = Vec::with_capacity(l);
        let mut k = Some(n - 1);
        while let Some(pos) = k {
            let Some(&idx) = self.m[pos].get(&l) else {
                break;
            };
            let m = &self.arena[idx];
            k = m.i.checked_sub(1);
            l = l.saturating_sub(1);
            sequence.push(m.clone());
        }
        sequence.reverse();
        (guesses, sequence)
    }
}

/// Estimator facade: a matcher context plus the sequence search
///
/// One estimator can serve many requests; each call to
/// [`PasswordEstimator::estimate`] works on its own copy of the context
/// carrying that request's `user_inputs`.
///
/// # Example
/// ```
/// # use pwguess::PasswordEstimator;
/// let estimator = PasswordEstimator::new().unwrap();
/// let weak = estimator.estimate("password", Vec::<String>::new());
/// let strong = estimator.estimate("correct-Horse-battery-3staple", Vec::<String>::new());
/// assert!(weak.guesses < strong.guesses);
/// ```
#[derive(Debug, Clone)]
pub struct PasswordEstimator {
    matcher: Matcher,
}

impl PasswordEstimator {
    /// Estimator over every built-in dictionary and keyboard
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::from_matcher(Matcher::new()?))
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::from_matcher(Matcher::from_config(config)?))
    }

    pub fn from_matcher(matcher: Matcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Match, then search for the cheapest decomposition
    ///
    /// # Arguments
    /// * `password` - The password to estimate
    /// * `user_inputs` - Request-specific words (user name, email, site name, ...)
    pub fn estimate<I, S>(&self, password: &str, user_inputs: I) -> MatchSequence
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matcher = self.matcher.with_user_inputs(user_inputs);
        let matches = matcher.omnimatch(password);
        most_guessable_match_sequence(password, &matches, matcher.scorer())
    }
}
