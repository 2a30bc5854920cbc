// pwguess Repeat Matcher
// Runs made of one unit written several times ("aaaa", "abcabc", "aabaab")

use crate::matcher::Matcher;
use crate::search::most_guessable_match_sequence;
use crate::types::{Match, Pattern, RepeatPattern};

/// Maximal repeats, scanned left to right without overlap
///
/// At each start both the shortest and the longest repeating unit are
/// tried and the longer run wins. Each base unit is scored by running
/// omnimatch and the sequence search on it alone, so `base_token` is
/// always strictly shorter than the repeat itself.
pub fn repeat_match(password: &str, matcher: &Matcher) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let n = chars.len();
    let mut matches = Vec::new();
    let mut last_index = 0;

    while last_index < n {
        let Some((start, lazy_unit, greedy_unit)) = find_repeat(&chars, last_index) else {
            break;
        };

        let lazy_len = lazy_unit * repeat_count(&chars, start, lazy_unit);
        let greedy_len = greedy_unit * repeat_count(&chars, start, greedy_unit);

        let (len, unit) = if greedy_len > lazy_len {
            // "aabaab": greedy finds "aab" twice, lazy only "a" twice
            let token = &chars[start..start + greedy_len];
            (greedy_len, smallest_period(token))
        } else {
            (lazy_len, lazy_unit)
        };

        let i = start;
        let j = start + len - 1;
        let base: String = chars[i..i + unit].iter().collect();
        let base_analysis =
            most_guessable_match_sequence(&base, &matcher.omnimatch(&base), matcher.scorer());

        matches.push(Match::new(
            i,
            j,
            chars[i..=j].iter().collect::<String>(),
            Pattern::Repeat(RepeatPattern {
                base_token: base,
                base_guesses: base_analysis.guesses,
                base_matches: base_analysis.sequence,
                repeat_count: len / unit,
            }),
        ));
        last_index = j + 1;
    }
    matches
}

/// Leftmost start at or after `from` where some unit repeats back to back,
/// with the shortest and longest such unit
fn find_repeat(chars: &[char], from: usize) -> Option<(usize, usize, usize)> {
    let n = chars.len();
    (from..n).find_map(|start| {
        let mut units = (1..=(n - start) / 2).filter(|&unit| repeats_at(chars, start, unit));
        let lazy = units.next()?;
        let greedy = units.last().unwrap_or(lazy);
        Some((start, lazy, greedy))
    })
}

fn repeats_at(chars: &[char], start: usize, unit: usize) -> bool {
    chars[start..start + unit] == chars[start + unit..start + 2 * unit]
}

/// How many times the unit at `start` occurs back to back
fn repeat_count(chars: &[char], start: usize, unit: usize) -> usize {
    let base = &chars[start..start + unit];
    chars[start..]
        .chunks_exact(unit)
        .take_while(|chunk| *chunk == base)
        .count()
}

/// Shortest unit that tiles the whole token
fn smallest_period(token: &[char]) -> usize {
    let len = token.len();
    (1..=len / 2)
        .find(|&unit| len % unit == 0 && token.chunks_exact(unit).all(|c| c == &token[..unit]))
        .unwrap_or(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::RankedDictionary;

    fn matcher() -> Matcher {
        Matcher::empty(2020).unwrap()
    }

    fn repeats(password: &str) -> Vec<(usize, usize, String, usize)> {
        repeat_match(password, &matcher())
            .into_iter()
            .map(|m| {
                let r = m.as_repeat().unwrap().clone();
                (m.i, m.j, r.base_token, r.repeat_count)
            })
            .collect()
    }

    #[test]
    fn test_no_repeats() {
        assert!(repeats("").is_empty());
        assert!(repeats("#").is_empty());
        assert!(repeats("abcdef").is_empty());
    }

    #[test]
    fn test_single_char_runs() {
        for (prefix, suffix) in [("", ""), ("u", "u"), ("y4@", "%")] {
            let password = format!("{}&&&&&{}", prefix, suffix);
            let i = prefix.chars().count();
            assert_eq!(
                repeats(&password),
                vec![(i, i + 4, "&".to_string(), 5)],
                "{}",
                password
            );
        }
    }

    #[test]
    fn test_multiple_runs() {
        assert_eq!(
            repeats("BBB1111aaaaa@@@@@@"),
            vec![
                (0, 2, "B".to_string(), 3),
                (3, 6, "1".to_string(), 4),
                (7, 11, "a".to_string(), 5),
                (12, 17, "@".to_string(), 6),
            ]
        );
        assert_eq!(
            repeats("2818BBBbzsdf1111@*&@!aaaaaEUDA@@@@@@1729"),
            vec![
                (4, 6, "B".to_string(), 3),
                (12, 15, "1".to_string(), 4),
                (21, 25, "a".to_string(), 5),
                (30, 35, "@".to_string(), 6),
            ]
        );
    }

    #[test]
    fn test_multi_char_units() {
        assert_eq!(repeats("abab"), vec![(0, 3, "ab".to_string(), 2)]);
        assert_eq!(repeats("aabaab"), vec![(0, 5, "aab".to_string(), 2)]);
        assert_eq!(repeats("abcabcabc"), vec![(0, 8, "abc".to_string(), 3)]);
    }

    #[test]
    fn test_nested_unit_is_minimal() {
        // greedy sees "aabaab" twice; the real unit is "aab"
        assert_eq!(repeats("aabaabaabaab"), vec![(0, 11, "aab".to_string(), 4)]);
    }

    #[test]
    fn test_lazy_wins_when_longer() {
        // five single chars beat two copies of "aa"
        assert_eq!(repeats("aaaaa"), vec![(0, 4, "a".to_string(), 5)]);
    }

    #[test]
    fn test_base_is_scored_recursively() {
        let m = &repeat_match("zzz", &matcher())[0];
        let r = m.as_repeat().unwrap();
        // a lone "z" is bruteforce: 11 guesses, plus 1 for a one-match sequence
        assert_eq!(r.base_guesses, 12.0);
        assert_eq!(r.base_matches.len(), 1);

        let with_dict =
            matcher().with_dictionary(RankedDictionary::from_ordered_list("d", ["x", "hello"]));
        let m = &repeat_match("hellohello", &with_dict)[0];
        let r = m.as_repeat().unwrap();
        assert_eq!(r.base_token, "hello");
        // rank 2, plus 1 for a one-match sequence
        assert_eq!(r.base_guesses, 3.0);
        assert_eq!(r.repeat_count, 2);
    }

    #[test]
    fn test_smallest_period() {
        let chars: Vec<char> = "abcabc".chars().collect();
        assert_eq!(smallest_period(&chars), 3);
        let chars: Vec<char> = "abcd".chars().collect();
        assert_eq!(smallest_period(&chars), 4);
    }
}
