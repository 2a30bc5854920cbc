// pwguess Configuration
// TOML-backed selection of dictionaries, keyboards, leet table and reference year

use crate::data::BUILTIN_DICTIONARIES;
use crate::keyboard::BUILTIN_KEYBOARDS;
use crate::l33t::L33tTable;
use crate::types::ConfigError;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Current calendar year in UTC
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Matcher configuration
///
/// Every field is optional in TOML; missing fields fall back to the
/// built-in defaults.
///
/// ```toml
/// reference_year = 2020
/// dictionaries = ["passwords", "surnames"]
/// keyboards = ["qwerty", "keypad"]
///
/// [l33t_table]
/// a = ["4", "@"]
/// o = ["0"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Year that date and recent-year distances are measured from
    pub reference_year: Option<i32>,

    /// Built-in ranked dictionaries to enable
    pub dictionaries: Vec<String>,

    /// Built-in adjacency graphs to enable
    pub keyboards: Vec<String>,

    /// Replacement leet table, letter → substitutes
    pub l33t_table: Option<BTreeMap<String, Vec<String>>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_year: None,
            dictionaries: BUILTIN_DICTIONARIES.iter().map(|s| s.to_string()).collect(),
            keyboards: BUILTIN_KEYBOARDS.iter().map(|s| s.to_string()).collect(),
            l33t_table: None,
        }
    }
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!(
            "loaded config from {}: {} dictionaries, {} keyboards",
            path.display(),
            config.dictionaries.len(),
            config.keyboards.len()
        );
        Ok(config)
    }

    /// Configured reference year, or the current year
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(current_year)
    }

    /// The leet table override converted to chars, if one is configured
    ///
    /// # Returns
    /// `InvalidL33tEntry` when a key or substitute is not exactly one character
    pub fn l33t_table(&self) -> Result<Option<L33tTable>, ConfigError> {
        let Some(raw) = &self.l33t_table else {
            return Ok(None);
        };

        let single = |s: &str| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        };

        let mut table = L33tTable::new();
        for (key, values) in raw {
            let invalid = |value: &str| ConfigError::InvalidL33tEntry {
                key: key.clone(),
                value: value.to_string(),
            };
            let letter = single(key).ok_or_else(|| invalid(key))?;
            let subs = values
                .iter()
                .map(|v| single(v).ok_or_else(|| invalid(v)))
                .collect::<Result<Vec<char>, _>>()?;
            table.insert(letter, subs);
        }
        Ok(Some(table))
    }
}
