// pwguess Ranked Dictionary
// Maps lowercase words to their 1-based popularity rank

use rustc_hash::FxHashMap;

/// Name of the per-request dictionary built from caller-supplied inputs
pub const USER_INPUTS: &str = "user_inputs";

/// Lowercase a single char, leaving it unchanged when its lowercase form
/// is more than one char so char indices stay aligned
#[inline]
pub fn lower_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Lowercase a string char by char with [`lower_char`]
pub fn lower_chars(s: &str) -> Vec<char> {
    s.chars().map(lower_char).collect()
}

/// A named word list, ranked by position
///
/// Ranks are dense and start at 1. When a word appears more than once,
/// its first (best) rank wins.
#[derive(Debug, Clone, Default)]
pub struct RankedDictionary {
    name: String,
    ranks: FxHashMap<String, usize>,
}

impl RankedDictionary {
    /// Build a dictionary from an ordered word list
    ///
    /// Words are lower-cased, so lookups against lowercase substrings
    /// find them regardless of how the list was cased.
    ///
    /// # Example
    /// ```
    /// # use pwguess::dictionary::RankedDictionary;
    /// let dict = RankedDictionary::from_ordered_list("demo", ["mother", "board"]);
    /// assert_eq!(dict.rank("board"), Some(2));
    /// ```
    pub fn from_ordered_list<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks: FxHashMap<String, usize> = FxHashMap::default();
        for (idx, word) in words.into_iter().enumerate() {
            // a repeated word takes its later rank
            ranks.insert(word.as_ref().chars().map(lower_char).collect(), idx + 1);
        }
        Self {
            name: name.into(),
            ranks,
        }
    }

    /// Build a dictionary from newline-separated text, skipping blank lines
    pub fn from_lines(name: impl Into<String>, text: &str) -> Self {
        Self::from_ordered_list(
            name,
            text.lines().map(str::trim).filter(|line| !line.is_empty()),
        )
    }

    /// Build the `user_inputs` dictionary for one estimation request
    pub fn user_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_ordered_list(USER_INPUTS, inputs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rank of a lowercase word, if present
    #[inline]
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
