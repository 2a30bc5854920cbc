// pwguess Regex-Class Matcher
// Finds fixed lexical patterns such as recent years

use crate::matcher::sort_matches;
use crate::types::{ConfigError, Match, Pattern, RegexClass, RegexPattern};
use regex::Regex;

/// Canonical regex for each class
///
/// # Examples
/// ```
/// # use pwguess::pattern::class_pattern;
/// # use pwguess::types::RegexClass;
/// assert_eq!(class_pattern(RegexClass::Digits), "[0-9]+");
/// ```
pub fn class_pattern(class: RegexClass) -> &'static str {
    match class {
        RegexClass::AlphaLower => "[a-z]+",
        RegexClass::AlphaUpper => "[A-Z]+",
        RegexClass::Alpha => "[a-zA-Z]+",
        RegexClass::Alphanumeric => "[a-zA-Z0-9]+",
        RegexClass::Digits => "[0-9]+",
        RegexClass::Symbols => r"[ -/:-@\[-`{-~]+",
        RegexClass::RecentYear => "19[0-9]{2}|200[0-9]|201[0-9]",
    }
}

/// Named regexes applied globally and without overlap
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regexen: Vec<(RegexClass, Regex)>,
}

impl RegexMatcher {
    /// The default table: recent years only
    pub fn new() -> Result<Self, ConfigError> {
        Self::empty().with_class(RegexClass::RecentYear)
    }

    /// A matcher with no classes
    pub fn empty() -> Self {
        Self {
            regexen: Vec::new(),
        }
    }

    /// Add a class using its canonical pattern
    pub fn with_class(mut self, class: RegexClass) -> Result<Self, ConfigError> {
        self.regexen.push((class, Regex::new(class_pattern(class))?));
        Ok(self)
    }

    pub fn classes(&self) -> impl Iterator<Item = RegexClass> + '_ {
        self.regexen.iter().map(|(class, _)| *class)
    }

    /// One match per non-overlapping occurrence of each class, sorted by (i, j)
    pub fn regex_match(&self, password: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        for (class, regex) in &self.regexen {
            for found in regex.find_iter(password) {
                // byte offsets → char indices
                let i = password[..found.start()].chars().count();
                let len = found.as_str().chars().count();
                matches.push(Match::new(
                    i,
                    i + len - 1,
                    found.as_str(),
                    Pattern::Regex(RegexPattern { regex_name: *class }),
                ));
            }
        }
        sort_matches(&mut matches);
        matches
    }
}
