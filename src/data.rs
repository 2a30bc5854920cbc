// pwguess Embedded Word Lists
// Ranked frequency lists compiled into the binary

use crate::dictionary::RankedDictionary;
use crate::types::ConfigError;

/// Most common leaked passwords
pub const PASSWORDS: &str = include_str!("../data/passwords.txt");

/// Frequent English Wikipedia words
pub const ENGLISH_WIKIPEDIA: &str = include_str!("../data/english_wikipedia.txt");

/// Common US female first names
pub const FEMALE_NAMES: &str = include_str!("../data/female_names.txt");

/// Common US male first names
pub const MALE_NAMES: &str = include_str!("../data/male_names.txt");

/// Common US surnames
pub const SURNAMES: &str = include_str!("../data/surnames.txt");

/// Frequent words from US television and film subtitles
pub const US_TV_AND_FILM: &str = include_str!("../data/us_tv_and_film.txt");

/// Names of the built-in dictionaries, in matching order
pub const BUILTIN_DICTIONARIES: &[&str] = &[
    "passwords",
    "english_wikipedia",
    "female_names",
    "male_names",
    "surnames",
    "us_tv_and_film",
];

/// Data loader utility
pub struct DataLoader;

impl DataLoader {
    /// Raw newline-separated text of a built-in list
    pub fn list(name: &str) -> Option<&'static str> {
        match name {
            "passwords" => Some(PASSWORDS),
            "english_wikipedia" => Some(ENGLISH_WIKIPEDIA),
            "female_names" => Some(FEMALE_NAMES),
            "male_names" => Some(MALE_NAMES),
            "surnames" => Some(SURNAMES),
            "us_tv_and_film" => Some(US_TV_AND_FILM),
            _ => None,
        }
    }

    /// Build one of the dictionaries named in [`BUILTIN_DICTIONARIES`]
    ///
    /// # Example
    /// ```
    /// # use pwguess::data::DataLoader;
    /// let passwords = DataLoader::builtin_dictionary("passwords").unwrap();
    /// assert_eq!(passwords.rank("password"), Some(2));
    /// ```
    pub fn builtin_dictionary(name: &str) -> Result<RankedDictionary, ConfigError> {
        let text =
            Self::list(name).ok_or_else(|| ConfigError::UnknownDictionary(name.to_string()))?;
        Ok(RankedDictionary::from_lines(name, text))
    }

    /// Get all data info
    pub fn info() -> DataInfo {
        let count = |text: &str| text.lines().filter(|l| !l.trim().is_empty()).count();
        let word_counts: Vec<(&'static str, usize)> = BUILTIN_DICTIONARIES
            .iter()
            .map(|name| (*name, Self::list(name).map(count).unwrap_or(0)))
            .collect();
        let total_words = word_counts.iter().map(|(_, n)| n).sum();
        DataInfo {
            word_counts,
            total_words,
        }
    }
}

/// Information about embedded data
#[derive(Debug, Clone)]
pub struct DataInfo {
    /// Lines per built-in list
    pub word_counts: Vec<(&'static str, usize)>,
    /// Sum over all lists
    pub total_words: usize,
}
