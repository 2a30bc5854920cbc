// pwguess Matcher
// Per-request matching context, dictionary matching and omnimatch

use crate::config::Config;
use crate::data::DataLoader;
use crate::date::DateMatcher;
use crate::dictionary::{lower_chars, RankedDictionary};
use crate::keyboard::AdjacencyGraph;
use crate::l33t::{default_l33t_table, l33t_match, L33tTable};
use crate::pattern::RegexMatcher;
use crate::repeat::repeat_match;
use crate::scoring::Scorer;
use crate::sequence::sequence_match;
use crate::spatial::spatial_match;
use crate::types::{ConfigError, DictionaryPattern, Match, Pattern};
use std::sync::Arc;

/// Stable sort by (i, j)
#[inline]
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by_key(|m| (m.i, m.j));
}

/// Every substring found (case-insensitively) in any of the dictionaries
///
/// # Example
/// ```
/// # use pwguess::dictionary::RankedDictionary;
/// # use pwguess::matcher::dictionary_match;
/// let dict = RankedDictionary::from_ordered_list("d", ["motherboard", "mother", "board"]);
/// let matches = dictionary_match("motherboard", &[&dict]);
/// let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.i, m.j)).collect();
/// assert_eq!(spans, vec![(0, 5), (0, 10), (6, 10)]);
/// ```
pub fn dictionary_match(password: &str, dictionaries: &[&RankedDictionary]) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let lower = lower_chars(password);
    let n = chars.len();
    let mut matches = Vec::new();

    for dict in dictionaries {
        for i in 0..n {
            let mut word = String::new();
            for j in i..n {
                word.push(lower[j]);
                if let Some(rank) = dict.rank(&word) {
                    matches.push(Match::new(
                        i,
                        j,
                        chars[i..=j].iter().collect::<String>(),
                        Pattern::Dictionary(DictionaryPattern::new(word.clone(), rank, dict.name())),
                    ));
                }
            }
        }
    }
    sort_matches(&mut matches);
    matches
}

/// Dictionary matches against the reversed password, mapped back onto it
pub fn reverse_dictionary_match(password: &str, dictionaries: &[&RankedDictionary]) -> Vec<Match> {
    let reversed: String = password.chars().rev().collect();
    let n = reversed.chars().count();

    let mut matches: Vec<Match> = dictionary_match(&reversed, dictionaries)
        .into_iter()
        .map(|mut m| {
            m.token = m.token.chars().rev().collect();
            let (i, j) = (n - 1 - m.j, n - 1 - m.i);
            m.i = i;
            m.j = j;
            if let Pattern::Dictionary(dict) = &mut m.pattern {
                dict.reversed = true;
            }
            m
        })
        .collect();
    sort_matches(&mut matches);
    matches
}

/// Matching context: ranked dictionaries, adjacency graphs, leet table,
/// regex and date tables, and the scorer used for repeat sub-scoring
///
/// Shared data sits behind `Arc`, so cloning a matcher for one request
/// is cheap. The `user_inputs` dictionary belongs to a single matcher
/// value and is never shared between requests.
#[derive(Debug, Clone)]
pub struct Matcher {
    dictionaries: Vec<Arc<RankedDictionary>>,
    user_inputs: Arc<RankedDictionary>,
    graphs: Vec<Arc<AdjacencyGraph>>,
    l33t_table: Arc<L33tTable>,
    regexen: RegexMatcher,
    dates: DateMatcher,
    scorer: Scorer,
}

impl Matcher {
    /// A matcher with no dictionaries or graphs, the default leet table and
    /// the recent-year regex
    pub fn empty(reference_year: i32) -> Result<Self, ConfigError> {
        Ok(Self {
            dictionaries: Vec::new(),
            user_inputs: Arc::new(RankedDictionary::user_inputs(Vec::<String>::new())),
            graphs: Vec::new(),
            l33t_table: Arc::new(default_l33t_table()),
            regexen: RegexMatcher::new()?,
            dates: DateMatcher::new()?,
            scorer: Scorer::new(reference_year)?,
        })
    }

    /// Every built-in dictionary and keyboard, measured against the current year
    ///
    /// # Example
    /// ```
    /// # use pwguess::matcher::Matcher;
    /// let matcher = Matcher::new().unwrap();
    /// let matches = matcher.omnimatch("password1");
    /// assert!(!matches.is_empty());
    /// ```
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(&Config::default())
    }

    /// Build a matcher from the dictionaries, keyboards and leet table a config names
    ///
    /// # Returns
    /// `UnknownDictionary`/`UnknownKeyboard` for names with no built-in data,
    /// `InvalidL33tEntry` for a malformed leet table
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut matcher = Self::empty(config.reference_year())?;
        for name in &config.dictionaries {
            matcher = matcher.with_dictionary(DataLoader::builtin_dictionary(name)?);
        }
        for name in &config.keyboards {
            matcher = matcher.with_graph(AdjacencyGraph::builtin(name)?);
        }
        if let Some(table) = config.l33t_table()? {
            matcher = matcher.with_l33t_table(table);
        }
        log::debug!(
            "matcher ready: {} dictionaries, {} graphs, reference year {}",
            matcher.dictionaries.len(),
            matcher.graphs.len(),
            matcher.reference_year()
        );
        Ok(matcher)
    }

    pub fn with_dictionary(mut self, dictionary: RankedDictionary) -> Self {
        self.dictionaries.push(Arc::new(dictionary));
        self
    }

    pub fn with_graph(mut self, graph: AdjacencyGraph) -> Self {
        self.graphs.push(Arc::new(graph));
        self
    }

    pub fn with_l33t_table(mut self, table: L33tTable) -> Self {
        self.l33t_table = Arc::new(table);
        self
    }

    pub fn with_regexen(mut self, regexen: RegexMatcher) -> Self {
        self.regexen = regexen;
        self
    }

    /// A copy of this matcher for one request, carrying its own `user_inputs`
    ///
    /// # Arguments
    /// * `inputs` - Words tied to the user (name, email, ...); rank is the 1-based position
    pub fn with_user_inputs<I, S>(&self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = self.clone();
        matcher.set_user_input_dictionary(inputs);
        matcher
    }

    /// Replace the `user_inputs` dictionary of this matcher
    pub fn set_user_input_dictionary<I, S>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.user_inputs = Arc::new(RankedDictionary::user_inputs(inputs));
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn reference_year(&self) -> i32 {
        self.scorer.reference_year()
    }

    pub fn user_inputs(&self) -> &RankedDictionary {
        &self.user_inputs
    }

    /// Configured dictionaries followed by `user_inputs`
    pub fn dictionaries(&self) -> Vec<&RankedDictionary> {
        self.dictionaries
            .iter()
            .map(|d| d.as_ref())
            .chain(std::iter::once(self.user_inputs.as_ref()))
            .collect()
    }

    pub fn graphs(&self) -> Vec<&AdjacencyGraph> {
        self.graphs.iter().map(|g| g.as_ref()).collect()
    }

    pub fn l33t_table(&self) -> &L33tTable {
        &self.l33t_table
    }

    // ============ Matchers ============

    /// Run every matcher and return the combined matches sorted by (i, j)
    pub fn omnimatch(&self, password: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        matches.extend(self.dictionary_match(password));
        matches.extend(self.reverse_dictionary_match(password));
        matches.extend(self.l33t_match(password));
        matches.extend(self.spatial_match(password));
        matches.extend(self.repeat_match(password));
        matches.extend(self.sequence_match(password));
        matches.extend(self.regex_match(password));
        matches.extend(self.date_match(password));
        sort_matches(&mut matches);
        log::trace!(
            "omnimatch found {} matches in {} chars",
            matches.len(),
            password.chars().count()
        );
        matches
    }

    pub fn dictionary_match(&self, password: &str) -> Vec<Match> {
        dictionary_match(password, &self.dictionaries())
    }

    pub fn reverse_dictionary_match(&self, password: &str) -> Vec<Match> {
        reverse_dictionary_match(password, &self.dictionaries())
    }

    pub fn l33t_match(&self, password: &str) -> Vec<Match> {
        l33t_match(password, &self.dictionaries(), &self.l33t_table)
    }

    pub fn spatial_match(&self, password: &str) -> Vec<Match> {
        spatial_match(password, &self.graphs())
    }

    /// Repeats, with each base unit scored by a recursive search
    pub fn repeat_match(&self, password: &str) -> Vec<Match> {
        repeat_match(password, self)
    }

    pub fn sequence_match(&self, password: &str) -> Vec<Match> {
        sequence_match(password)
    }

    pub fn regex_match(&self, password: &str) -> Vec<Match> {
        self.regexen.regex_match(password)
    }

    pub fn date_match(&self, password: &str) -> Vec<Match> {
        self.dates.date_match(password, self.reference_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternKind;

    fn dict(name: &str, words: &[&str]) -> RankedDictionary {
        RankedDictionary::from_ordered_list(name, words.iter().copied())
    }

    // ============ Dictionary ============

    #[test]
    fn test_dictionary_match_ranks() {
        let d = dict("d", &["motherboard", "mother", "board"]);
        let matches = dictionary_match("motherboard", &[&d]);
        let found: Vec<(usize, usize, &str, usize)> = matches
            .iter()
            .map(|m| {
                let dict = m.as_dictionary().unwrap();
                (m.i, m.j, dict.matched_word.as_str(), dict.rank)
            })
            .collect();
        assert_eq!(
            found,
            vec![
                (0, 5, "mother", 2),
                (0, 10, "motherboard", 1),
                (6, 10, "board", 3)
            ]
        );
    }

    #[test]
    fn test_dictionary_match_keeps_case_in_token() {
        let d = dict("d", &["boat"]);
        let matches = dictionary_match("BoaT", &[&d]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "BoaT");
        assert_eq!(matches[0].as_dictionary().unwrap().matched_word, "boat");
    }

    #[test]
    fn test_dictionary_match_multiple_dictionaries() {
        let d1 = dict("d1", &["abc"]);
        let d2 = dict("d2", &["bcd"]);
        let matches = dictionary_match("abcd", &[&d1, &d2]);
        let names: Vec<&str> = matches
            .iter()
            .map(|m| m.as_dictionary().unwrap().dictionary_name.as_str())
            .collect();
        assert_eq!(names, vec!["d1", "d2"]);
    }

    #[test]
    fn test_reverse_match() {
        let d = dict("d", &["123", "321", "456", "654"]);
        let matches = reverse_dictionary_match("0123456789", &[&d]);
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].i, matches[0].j), (1, 3));
        assert_eq!(matches[0].token, "123");
        let first = matches[0].as_dictionary().unwrap();
        assert_eq!((first.matched_word.as_str(), first.rank), ("321", 2));
        assert!(first.reversed);
        assert_eq!((matches[1].i, matches[1].j), (4, 6));
        assert_eq!(matches[1].as_dictionary().unwrap().rank, 4);
    }

    // ============ Context ============

    #[test]
    fn test_user_inputs_are_request_scoped() {
        let base = Matcher::empty(2020).unwrap();
        let alice = base.with_user_inputs(["Alice", "wonderland"]);

        let hits = alice.dictionary_match("alice99");
        assert_eq!(hits.len(), 1);
        let hit = hits[0].as_dictionary().unwrap();
        assert_eq!(hit.dictionary_name, "user_inputs");
        assert_eq!(hit.rank, 1);

        // the base context and other requests never see alice's inputs
        assert!(base.dictionary_match("alice99").is_empty());
        let bob = base.with_user_inputs(Vec::<String>::new());
        assert!(bob.dictionary_match("alice99").is_empty());
    }

    #[test]
    fn test_set_user_input_dictionary_replaces() {
        let mut matcher = Matcher::empty(2020).unwrap();
        matcher.set_user_input_dictionary(["first"]);
        matcher.set_user_input_dictionary(["second"]);
        assert!(matcher.dictionary_match("first").is_empty());
        assert_eq!(matcher.dictionary_match("second").len(), 1);
        assert_eq!(matcher.user_inputs().len(), 1);
    }

    #[test]
    fn test_from_config_unknown_names() {
        let config = Config {
            dictionaries: vec!["klingon".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            Matcher::from_config(&config),
            Err(ConfigError::UnknownDictionary(name)) if name == "klingon"
        ));

        let config = Config {
            keyboards: vec!["colemak".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            Matcher::from_config(&config),
            Err(ConfigError::UnknownKeyboard(_))
        ));
    }

    // ============ Omnimatch ============

    #[test]
    fn test_omnimatch_empty() {
        let matcher = Matcher::empty(2020).unwrap();
        assert!(matcher.omnimatch("").is_empty());
    }

    #[test]
    fn test_omnimatch_sorted_and_mixed() {
        let matcher = Matcher::empty(2020)
            .unwrap()
            .with_dictionary(dict("d", &["rosebud", "maelstrom"]))
            .with_graph(AdjacencyGraph::builtin("qwerty").unwrap());
        let matches = matcher.omnimatch("r0sebudmaelstrom11/20/91aaaa");
        assert!(matches
            .windows(2)
            .all(|w| (w[0].i, w[0].j) <= (w[1].i, w[1].j)));

        let has = |kind: PatternKind, i: usize, j: usize| {
            matches.iter().any(|m| m.kind() == kind && m.i == i && m.j == j)
        };
        assert!(has(PatternKind::Dictionary, 0, 6));
        assert!(has(PatternKind::Dictionary, 7, 15));
        assert!(has(PatternKind::Date, 16, 23));
        assert!(has(PatternKind::Repeat, 24, 27));
    }
}
