// pwguess Date Matcher
// Day-month-year triples with and without separators ("13/2/1921", "111504")

use crate::matcher::sort_matches;
use crate::types::{ConfigError, DatePattern, Match, Pattern};
use regex::Regex;

pub const DATE_MAX_YEAR: i32 = 2050;
pub const DATE_MIN_YEAR: i32 = 1000;

/// Cut points (k, l) splitting a digit run of a given length into three fields
fn date_splits(len: usize) -> &'static [(usize, usize)] {
    match len {
        // 1 1 91, 91 1 1
        4 => &[(1, 2), (2, 3)],
        // 1 11 91, 11 1 91
        5 => &[(1, 3), (2, 3)],
        // 1 1 1991, 11 11 91, 1991 1 1
        6 => &[(1, 2), (2, 4), (4, 5)],
        // 1 11 1991, 11 1 1991, 1991 1 11, 1991 11 1
        7 => &[(1, 3), (2, 3), (4, 5), (4, 6)],
        // 11 11 1991, 1991 11 11
        8 => &[(2, 4), (4, 6)],
        _ => &[],
    }
}

/// A validated calendar-like triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dmy {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

/// Map three integers onto day, month and year
///
/// Rejects the triple when the middle field is outside 1..=31, when any
/// field lies in 100..1000 or above 2050, when two fields exceed 31, when
/// all three exceed 12, or when two are zero. A four-digit year at either
/// end wins; otherwise a two-digit year is expanded.
///
/// # Examples
/// ```
/// # use pwguess::date::map_ints_to_dmy;
/// let dmy = map_ints_to_dmy([1, 1, 1991]).unwrap();
/// assert_eq!((dmy.day, dmy.month, dmy.year), (1, 1, 1991));
///
/// assert!(map_ints_to_dmy([1, 1, 1500]).is_none());
/// ```
pub fn map_ints_to_dmy(ints: [i32; 3]) -> Option<Dmy> {
    if ints[1] > 31 || ints[1] <= 0 {
        return None;
    }

    let mut over_12 = 0;
    let mut over_31 = 0;
    let mut under_1 = 0;
    for &int in &ints {
        if (99 < int && int < DATE_MIN_YEAR) || int > DATE_MAX_YEAR {
            return None;
        }
        if int > 31 {
            over_31 += 1;
        }
        if int > 12 {
            over_12 += 1;
        }
        if int <= 0 {
            under_1 += 1;
        }
    }
    if over_31 >= 2 || over_12 == 3 || under_1 >= 2 {
        return None;
    }

    let year_splits = [(ints[2], [ints[0], ints[1]]), (ints[0], [ints[1], ints[2]])];

    // yyyy + daymonth or daymonth + yyyy
    for &(year, rest) in &year_splits {
        if (DATE_MIN_YEAR..=DATE_MAX_YEAR).contains(&year) {
            // a four-digit year with no valid day and month is not a date
            return map_ints_to_dm(rest).map(|(day, month)| Dmy { day, month, year });
        }
    }

    // two-digit year at either end
    year_splits.iter().find_map(|&(year, rest)| {
        map_ints_to_dm(rest).map(|(day, month)| Dmy {
            day,
            month,
            year: two_to_four_digit_year(year),
        })
    })
}

/// Read a pair as (day, month), trying both orders
pub fn map_ints_to_dm(ints: [i32; 2]) -> Option<(u32, u32)> {
    [ints, [ints[1], ints[0]]].into_iter().find_map(|[d, m]| {
        ((1..=31).contains(&d) && (1..=12).contains(&m)).then_some((d as u32, m as u32))
    })
}

/// 87 → 1987, 15 → 2015; values above 99 are kept
pub fn two_to_four_digit_year(year: i32) -> i32 {
    if year > 99 {
        year
    } else if year > 50 {
        year + 1900
    } else {
        year + 2000
    }
}

/// Date matcher
///
/// Tries every substring rather than scanning greedily, so every plausible
/// date is found; dates strictly inside another date are then dropped.
#[derive(Debug, Clone)]
pub struct DateMatcher {
    with_separator: Regex,
}

impl DateMatcher {
    pub fn new() -> Result<Self, ConfigError> {
        let with_separator =
            Regex::new(r"^([0-9]{1,4})([\s/\\_.-])([0-9]{1,2})([\s/\\_.-])([0-9]{1,4})$")?;
        Ok(Self { with_separator })
    }

    /// All non-nested date matches, sorted by (i, j)
    ///
    /// # Arguments
    /// * `password` - The password to scan
    /// * `reference_year` - Ambiguous digit runs resolve to the year closest to this
    pub fn date_match(&self, password: &str, reference_year: i32) -> Vec<Match> {
        let chars: Vec<char> = password.chars().collect();
        let n = chars.len();
        let mut matches = Vec::new();

        // without separators: length 4 "1191" to 8 "11111991"
        for i in 0..n.saturating_sub(3) {
            for j in (i + 3)..=(i + 7) {
                if j >= n {
                    break;
                }
                let token = &chars[i..=j];
                if !token.iter().all(char::is_ascii_digit) {
                    continue;
                }
                let digits: String = token.iter().collect();
                let best = date_splits(token.len())
                    .iter()
                    .filter_map(|&(k, l)| {
                        let field = |s: &str| s.parse::<i32>().ok();
                        map_ints_to_dmy([
                            field(&digits[..k])?,
                            field(&digits[k..l])?,
                            field(&digits[l..])?,
                        ])
                    })
                    // first candidate wins ties
                    .fold(None::<Dmy>, |best, candidate| match best {
                        Some(b)
                            if (b.year - reference_year).abs()
                                <= (candidate.year - reference_year).abs() =>
                        {
                            Some(b)
                        }
                        _ => Some(candidate),
                    });
                if let Some(dmy) = best {
                    matches.push(date(i, j, digits, String::new(), dmy));
                }
            }
        }

        // with separators: length 6 "1/1/91" to 10 "11/11/1991"
        for i in 0..n {
            for j in (i + 5)..=(i + 9) {
                if j >= n {
                    break;
                }
                let token: String = chars[i..=j].iter().collect();
                let Some(caps) = self.with_separator.captures(&token) else {
                    continue;
                };
                if caps[2] != caps[4] {
                    continue;
                }
                let field = |idx: usize| caps[idx].parse::<i32>().ok();
                let (Some(a), Some(b), Some(c)) = (field(1), field(3), field(5)) else {
                    continue;
                };
                if let Some(dmy) = map_ints_to_dmy([a, b, c]) {
                    let separator = caps[2].to_string();
                    matches.push(date(i, j, token, separator, dmy));
                }
            }
        }

        // '2015_06_04' also contains 15_06_04, 5_06_04 and even 2015 as dates
        let mut kept: Vec<Match> = matches
            .iter()
            .enumerate()
            .filter(|&(idx, m)| {
                !matches
                    .iter()
                    .enumerate()
                    .any(|(other_idx, o)| other_idx != idx && o.i <= m.i && o.j >= m.j)
            })
            .map(|(_, m)| m.clone())
            .collect();
        sort_matches(&mut kept);
        kept
    }
}

fn date(i: usize, j: usize, token: String, separator: String, dmy: Dmy) -> Match {
    Match::new(
        i,
        j,
        token,
        Pattern::Date(DatePattern {
            separator,
            year: dmy.year,
            month: dmy.month,
            day: dmy.day,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_YEAR: i32 = 2020;

    fn date_match(password: &str) -> Vec<Match> {
        DateMatcher::new().unwrap().date_match(password, REFERENCE_YEAR)
    }

    fn single(password: &str) -> (usize, usize, DatePattern) {
        let matches = date_match(password);
        assert_eq!(matches.len(), 1, "{}: {:?}", password, matches);
        let m = &matches[0];
        (m.i, m.j, m.as_date().unwrap().clone())
    }

    // ============ Field mapping ============

    #[test]
    fn test_map_ints_to_dm() {
        assert_eq!(map_ints_to_dm([20, 12]), Some((20, 12)));
        assert_eq!(map_ints_to_dm([12, 20]), Some((20, 12)));
        assert_eq!(map_ints_to_dm([13, 13]), None);
        assert_eq!(map_ints_to_dm([0, 5]), None);
    }

    #[test]
    fn test_two_to_four_digit_year() {
        assert_eq!(two_to_four_digit_year(87), 1987);
        assert_eq!(two_to_four_digit_year(50), 2050);
        assert_eq!(two_to_four_digit_year(4), 2004);
        assert_eq!(two_to_four_digit_year(1504), 1504);
    }

    #[test]
    fn test_map_ints_to_dmy_rejects() {
        for ints in [
            [1, 0, 1991],
            [1, 32, 1991],
            [1, 1, 500],
            [1, 1, 2051],
            [32, 1, 33],
            [13, 13, 13],
            [0, 1, 0],
            [1991, 13, 13],
        ] {
            assert!(map_ints_to_dmy(ints).is_none(), "{:?}", ints);
        }
    }

    #[test]
    fn test_map_ints_to_dmy_orders() {
        let dmy = |d, m, y| Some(Dmy { day: d, month: m, year: y });
        assert_eq!(map_ints_to_dmy([13, 2, 1921]), dmy(13, 2, 1921));
        assert_eq!(map_ints_to_dmy([1921, 2, 13]), dmy(13, 2, 1921));
        assert_eq!(map_ints_to_dmy([8, 8, 88]), dmy(8, 8, 1988));
        assert_eq!(map_ints_to_dmy([88, 8, 8]), dmy(8, 8, 1988));
        assert_eq!(map_ints_to_dmy([11, 15, 4]), dmy(15, 11, 2004));
    }

    // ============ Matching ============

    #[test]
    fn test_separators() {
        for sep in ["", " ", "-", "/", "\\", "_", "."] {
            let password = format!("13{}2{}1921", sep, sep);
            let (i, j, date) = single(&password);
            assert_eq!((i, j), (0, password.chars().count() - 1));
            assert_eq!(date.separator, sep);
            assert_eq!((date.day, date.month, date.year), (13, 2, 1921));
        }
    }

    #[test]
    fn test_mixed_separators_rejected() {
        // only the separator-free tail "1921" survives, read as 1 9 2021
        let (i, j, date) = single("13/2-1921");
        assert_eq!((i, j), (5, 8));
        assert_eq!(date.separator, "");
        assert_eq!((date.day, date.month, date.year), (1, 9, 2021));
    }

    #[test]
    fn test_orders() {
        // every field order reads as 8 8 88
        for password in ["8888", "88/8/8", "8/8/88"] {
            let (_, _, date) = single(password);
            assert_eq!((date.day, date.month, date.year), (8, 8, 1988));
        }
    }

    #[test]
    fn test_closest_year_wins() {
        let (i, j, date) = single("111504");
        assert_eq!((i, j), (0, 5));
        assert_eq!(date.separator, "");
        assert_eq!((date.day, date.month, date.year), (15, 11, 2004));
    }

    #[test]
    fn test_full_years() {
        for (day, month, year) in [(1, 1, 1999), (11, 8, 2000), (9, 12, 2005), (22, 11, 1551)] {
            let plain = format!("{}{}{}", year, month, day);
            let (i, j, date) = single(&plain);
            assert_eq!((i, j), (0, plain.len() - 1));
            assert_eq!(date.year, year, "{}", plain);

            let dotted = format!("{}.{}.{}", year, month, day);
            let (_, _, date) = single(&dotted);
            assert_eq!(date.year, year, "{}", dotted);
            assert_eq!(date.separator, ".");
        }
    }

    #[test]
    fn test_zero_padded() {
        let (_, _, date) = single("02/02/02");
        assert_eq!(date.separator, "/");
        assert_eq!((date.day, date.month, date.year), (2, 2, 2002));
    }

    #[test]
    fn test_embedded() {
        for (prefix, suffix) in [("", ""), ("a", ""), ("ab", ""), ("", "!"), ("a", "!"), ("ab", "!")] {
            let password = format!("{}1/1/91{}", prefix, suffix);
            let (i, j, date) = single(&password);
            assert_eq!((i, j), (prefix.len(), prefix.len() + 5));
            assert_eq!((date.day, date.month, date.year), (1, 1, 1991));
        }
    }

    #[test]
    fn test_overlapping_dates() {
        let matches = date_match("12/20/1991.12.20");
        let found: Vec<(usize, usize, &str, &str)> = matches
            .iter()
            .map(|m| {
                let d = m.as_date().unwrap();
                (m.i, m.j, m.token.as_str(), d.separator.as_str())
            })
            .collect();
        assert_eq!(
            found,
            vec![(0, 9, "12/20/1991", "/"), (6, 15, "1991.12.20", ".")]
        );
        for m in &matches {
            let d = m.as_date().unwrap();
            assert_eq!((d.day, d.month, d.year), (20, 12, 1991));
        }
    }

    #[test]
    fn test_padded_by_ambiguous_digits() {
        let (i, j, date) = single("912/20/919");
        assert_eq!((i, j), (1, 8));
        assert_eq!(date.separator, "/");
        assert_eq!((date.day, date.month, date.year), (20, 12, 1991));
    }

    #[test]
    fn test_nested_dates_removed() {
        let matches = date_match("2015_06_04");
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].i, matches[0].j), (0, 9));
    }

    #[test]
    fn test_short_or_non_digit() {
        assert!(date_match("").is_empty());
        assert!(date_match("123").is_empty());
        assert!(date_match("abcdefgh").is_empty());
    }
}
