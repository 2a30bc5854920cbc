// pwguess Leet Matcher
// Dictionary matching through common character substitutions (@ for a, 0 for o, ...)

use crate::dictionary::{lower_char, RankedDictionary};
use crate::matcher::{dictionary_match, sort_matches};
use crate::types::{Match, Pattern};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Plain letter → leet characters that may stand in for it
pub type L33tTable = BTreeMap<char, Vec<char>>;

/// One consistent substitution assignment, leet char → plain letter
pub type L33tSub = BTreeMap<char, char>;

const DEFAULT_L33T_TABLE: &[(char, &[char])] = &[
    ('a', &['4', '@']),
    ('b', &['8']),
    ('c', &['(', '{', '[', '<']),
    ('e', &['3']),
    ('g', &['6', '9']),
    ('i', &['1', '!', '|']),
    ('l', &['1', '|', '7']),
    ('o', &['0']),
    ('s', &['$', '5']),
    ('t', &['+', '7']),
    ('x', &['%']),
    ('z', &['2']),
];

/// The default substitution table
pub fn default_l33t_table() -> L33tTable {
    DEFAULT_L33T_TABLE
        .iter()
        .map(|(letter, subs)| (*letter, subs.to_vec()))
        .collect()
}

/// Prune the table down to the leet characters that occur in the password
pub fn relevant_l33t_subtable(password: &str, table: &L33tTable) -> L33tTable {
    let present: FxHashSet<char> = password.chars().collect();
    table
        .iter()
        .filter_map(|(&letter, subs)| {
            let relevant: Vec<char> =
                subs.iter().copied().filter(|c| present.contains(c)).collect();
            (!relevant.is_empty()).then_some((letter, relevant))
        })
        .collect()
}

/// Enumerate the distinct consistent substitution assignments for a table
///
/// Letters are visited in table order. When a leet character is already
/// claimed by an earlier letter, both the existing assignment and a copy
/// that reassigns it are kept. Assignments are deduplicated on their
/// sorted pair list. Subsets of an assignment are not tried separately.
///
/// # Example
/// ```
/// # use pwguess::l33t::{enumerate_l33t_subs, L33tTable};
/// let table: L33tTable = [('i', vec!['1']), ('l', vec!['1'])].into_iter().collect();
/// let subs = enumerate_l33t_subs(&table);
/// assert_eq!(subs.len(), 2);
/// assert_eq!(subs[0].get(&'1'), Some(&'i'));
/// assert_eq!(subs[1].get(&'1'), Some(&'l'));
/// ```
pub fn enumerate_l33t_subs(table: &L33tTable) -> Vec<L33tSub> {
    let mut subs: Vec<Vec<(char, char)>> = vec![Vec::new()];

    for (&letter, l33t_chars) in table {
        let mut next_subs = Vec::new();
        for &l33t_chr in l33t_chars {
            for sub in &subs {
                match sub.iter().position(|&(c, _)| c == l33t_chr) {
                    None => {
                        let mut extension = sub.clone();
                        extension.push((l33t_chr, letter));
                        next_subs.push(extension);
                    }
                    Some(dup) => {
                        let mut alternative = sub.clone();
                        alternative.remove(dup);
                        alternative.push((l33t_chr, letter));
                        next_subs.push(sub.clone());
                        next_subs.push(alternative);
                    }
                }
            }
        }
        subs = dedup(next_subs);
    }

    subs.into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect()
}

fn dedup(subs: Vec<Vec<(char, char)>>) -> Vec<Vec<(char, char)>> {
    let mut seen: FxHashSet<Vec<(char, char)>> = FxHashSet::default();
    subs.into_iter()
        .filter(|sub| {
            let mut label = sub.clone();
            label.sort_unstable();
            seen.insert(label)
        })
        .collect()
}

/// Replace every character that has an entry in `sub`
pub fn translate(password: &str, sub: &L33tSub) -> String {
    password
        .chars()
        .map(|c| sub.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Dictionary matches that are only reachable through a substitution
///
/// Single-character tokens are dropped: a lone `4` or `1` would otherwise
/// match the common words "a" and "i".
pub fn l33t_match(
    password: &str,
    dictionaries: &[&RankedDictionary],
    table: &L33tTable,
) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let mut matches = Vec::new();

    for sub in enumerate_l33t_subs(&relevant_l33t_subtable(password, table)) {
        if sub.is_empty() {
            // no relevant substitutions in this password
            break;
        }
        let subbed = translate(password, &sub);
        for mut m in dictionary_match(&subbed, dictionaries) {
            let token_chars = &chars[m.i..=m.j];
            let Pattern::Dictionary(dict) = &mut m.pattern else {
                continue;
            };
            let lowered: String = token_chars.iter().map(|&c| lower_char(c)).collect();
            if lowered == dict.matched_word {
                continue;
            }

            let match_sub: L33tSub = sub
                .iter()
                .filter(|(l33t_chr, _)| token_chars.contains(*l33t_chr))
                .map(|(&k, &v)| (k, v))
                .collect();
            dict.l33t = true;
            dict.sub_display = match_sub
                .iter()
                .map(|(k, v)| format!("{} -> {}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            dict.sub = match_sub;
            m.token = token_chars.iter().collect();
            matches.push(m);
        }
    }

    matches.retain(|m| m.len() > 1);
    sort_matches(&mut matches);
    matches
}
