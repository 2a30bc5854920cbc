// pwguess Type Definitions
// Core types for matches, match sequences and configuration errors

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// A claim that `token = password[i..=j]` instantiates a recognizable pattern
///
/// Indices are inclusive and counted in `char`s. `guesses` and
/// `guesses_log10` stay `None` until the scorer estimates the match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Start index (inclusive)
    pub i: usize,

    /// End index (inclusive)
    pub j: usize,

    /// The exact substring of the password covered by this match
    pub token: String,

    /// Kind-specific payload
    #[serde(flatten)]
    pub pattern: Pattern,

    /// Memoized guess estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses: Option<f64>,

    /// log10 of `guesses`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses_log10: Option<f64>,
}

impl Match {
    /// Create a new, unscored match
    pub fn new(i: usize, j: usize, token: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            i,
            j,
            token: token.into(),
            pattern,
            guesses: None,
            guesses_log10: None,
        }
    }

    /// Token length in chars
    pub fn len(&self) -> usize {
        self.token.chars().count()
    }

    /// True for a zero-length token (never produced by the matchers)
    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }

    /// The pattern kind of this match
    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }

    /// Dictionary payload, if this is a dictionary match
    pub fn as_dictionary(&self) -> Option<&DictionaryPattern> {
        match &self.pattern {
            Pattern::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Spatial payload, if this is a spatial match
    pub fn as_spatial(&self) -> Option<&SpatialPattern> {
        match &self.pattern {
            Pattern::Spatial(s) => Some(s),
            _ => None,
        }
    }

    /// Repeat payload, if this is a repeat match
    pub fn as_repeat(&self) -> Option<&RepeatPattern> {
        match &self.pattern {
            Pattern::Repeat(r) => Some(r),
            _ => None,
        }
    }

    /// Sequence payload, if this is a sequence match
    pub fn as_sequence(&self) -> Option<&SequencePattern> {
        match &self.pattern {
            Pattern::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Regex payload, if this is a regex match
    pub fn as_regex(&self) -> Option<&RegexPattern> {
        match &self.pattern {
            Pattern::Regex(r) => Some(r),
            _ => None,
        }
    }

    /// Date payload, if this is a date match
    pub fn as_date(&self) -> Option<&DatePattern> {
        match &self.pattern {
            Pattern::Date(d) => Some(d),
            _ => None,
        }
    }
}

/// Pattern-specific data, one variant per pattern kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Pattern {
    Dictionary(DictionaryPattern),
    Spatial(SpatialPattern),
    Repeat(RepeatPattern),
    Sequence(SequencePattern),
    Regex(RegexPattern),
    Date(DatePattern),
    /// Synthetic filler covering a span no real pattern explains
    Bruteforce,
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Dictionary(_) => PatternKind::Dictionary,
            Pattern::Spatial(_) => PatternKind::Spatial,
            Pattern::Repeat(_) => PatternKind::Repeat,
            Pattern::Sequence(_) => PatternKind::Sequence,
            Pattern::Regex(_) => PatternKind::Regex,
            Pattern::Date(_) => PatternKind::Date,
            Pattern::Bruteforce => PatternKind::Bruteforce,
        }
    }
}

/// Fieldless discriminant of [`Pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Dictionary,
    Spatial,
    Repeat,
    Sequence,
    Regex,
    Date,
    Bruteforce,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternKind::Dictionary => write!(f, "dictionary"),
            PatternKind::Spatial => write!(f, "spatial"),
            PatternKind::Repeat => write!(f, "repeat"),
            PatternKind::Sequence => write!(f, "sequence"),
            PatternKind::Regex => write!(f, "regex"),
            PatternKind::Date => write!(f, "date"),
            PatternKind::Bruteforce => write!(f, "bruteforce"),
        }
    }
}

/// Dictionary word, possibly reversed or reached through leet substitutions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryPattern {
    /// Lowercase dictionary entry
    pub matched_word: String,

    /// 1-based popularity rank within `dictionary_name`
    pub rank: usize,

    pub dictionary_name: String,

    pub reversed: bool,

    pub l33t: bool,

    /// Leet char → plain char, restricted to substitutions present in the token
    pub sub: BTreeMap<char, char>,

    /// Human-readable form of `sub`, e.g. "4 -> a, 0 -> o"
    pub sub_display: String,

    // Filled in by the scorer, for display purposes
    pub base_guesses: Option<f64>,
    pub uppercase_variations: Option<f64>,
    pub l33t_variations: Option<f64>,
}

impl DictionaryPattern {
    /// A plain (not reversed, not leet) dictionary hit
    pub fn new(matched_word: impl Into<String>, rank: usize, dictionary_name: impl Into<String>) -> Self {
        Self {
            matched_word: matched_word.into(),
            rank,
            dictionary_name: dictionary_name.into(),
            reversed: false,
            l33t: false,
            sub: BTreeMap::new(),
            sub_display: String::new(),
            base_guesses: None,
            uppercase_variations: None,
            l33t_variations: None,
        }
    }
}

/// Keyboard-adjacency walk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialPattern {
    /// Name of the adjacency graph the walk was found on
    pub graph: String,

    /// Whether the graph is a full keyboard or a numeric keypad
    pub graph_kind: crate::keyboard::GraphKind,

    /// Number of direction changes, counting the first step
    pub turns: usize,

    /// Number of characters typed with shift held
    pub shifted_count: usize,
}

/// Repetition of a shorter base unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatPattern {
    pub base_token: String,

    /// Guesses for `base_token` from a recursive search
    pub base_guesses: f64,

    /// Winning sequence for `base_token`
    pub base_matches: Vec<Match>,

    pub repeat_count: usize,
}

/// Run with a constant code-point delta, e.g. "abcd" or "9753"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencePattern {
    /// "lower", "upper", "digits" or "unicode"
    pub sequence_name: &'static str,

    pub sequence_space: u32,

    pub ascending: bool,
}

/// Named lexical pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexPattern {
    pub regex_name: RegexClass,
}

/// Regex classes known to the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexClass {
    AlphaLower,
    AlphaUpper,
    Alpha,
    Alphanumeric,
    Digits,
    Symbols,
    RecentYear,
}

impl RegexClass {
    /// Character-class cardinality for generic classes, `None` for recent years
    pub fn cardinality(&self) -> Option<u32> {
        match self {
            RegexClass::AlphaLower | RegexClass::AlphaUpper => Some(26),
            RegexClass::Alpha => Some(52),
            RegexClass::Alphanumeric => Some(62),
            RegexClass::Digits => Some(10),
            RegexClass::Symbols => Some(33),
            RegexClass::RecentYear => None,
        }
    }
}

impl std::fmt::Display for RegexClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RegexClass::AlphaLower => "alpha_lower",
            RegexClass::AlphaUpper => "alpha_upper",
            RegexClass::Alpha => "alpha",
            RegexClass::Alphanumeric => "alphanumeric",
            RegexClass::Digits => "digits",
            RegexClass::Symbols => "symbols",
            RegexClass::RecentYear => "recent_year",
        };
        write!(f, "{}", name)
    }
}

/// Day-month-year triple, with or without separators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePattern {
    /// Separator character, empty when the date has none
    pub separator: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Result of the minimum-guess sequence search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSequence {
    pub password: String,

    /// Total guesses of the winning sequence (1 for the empty password)
    pub guesses: f64,

    pub guesses_log10: f64,

    /// Gap-free, non-overlapping matches covering the whole password
    pub sequence: Vec<Match>,

    /// Placeholder for a crack-time-to-score collaborator, always 0 here
    pub score: u8,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown dictionary '{0}'")]
    UnknownDictionary(String),

    #[error("unknown keyboard '{0}'")]
    UnknownKeyboard(String),

    #[error("keyboard layout '{name}' has misaligned token '{token}'")]
    InvalidLayout { name: String, token: String },

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid l33t table entry '{key}' -> '{value}': both sides must be single characters")]
    InvalidL33tEntry { key: String, value: String },
}
