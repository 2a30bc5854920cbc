// pwguess Sequence Matcher
// Runs with a constant code-point step, e.g. "abcd", "9753" or "ZYX"

use crate::types::{Match, Pattern, SequencePattern};

/// Largest step (in code points) still treated as a sequence
pub const MAX_DELTA: i64 = 5;

/// Find maximal constant-delta runs
///
/// For "abcdb975zy" the deltas are 1 1 1 -2 -41 -2 -2 69 -1, giving the
/// runs "abcd", "975" and "zy". Adjacent runs share their boundary char.
pub fn sequence_match(password: &str) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let n = chars.len();
    if n <= 1 {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut i = 0;
    let mut last_delta: Option<i64> = None;

    for k in 1..n {
        let delta = chars[k] as i64 - chars[k - 1] as i64;
        let last = *last_delta.get_or_insert(delta);
        if delta == last {
            continue;
        }
        let j = k - 1;
        push_run(&chars, i, j, last, &mut result);
        i = j;
        last_delta = Some(delta);
    }
    push_run(&chars, i, n - 1, last_delta.unwrap_or(0), &mut result);
    result
}

fn push_run(chars: &[char], i: usize, j: usize, delta: i64, out: &mut Vec<Match>) {
    let step = delta.abs();
    if !(j - i > 1 || step == 1) || step == 0 || step > MAX_DELTA {
        return;
    }

    let token = &chars[i..=j];
    let (sequence_name, sequence_space) = if token.iter().all(char::is_ascii_lowercase) {
        ("lower", 26)
    } else if token.iter().all(char::is_ascii_uppercase) {
        ("upper", 26)
    } else if token.iter().all(char::is_ascii_digit) {
        ("digits", 10)
    } else {
        // roman alphabet size, conservatively
        ("unicode", 26)
    };

    out.push(Match::new(
        i,
        j,
        token.iter().collect::<String>(),
        Pattern::Sequence(SequencePattern {
            sequence_name,
            sequence_space,
            ascending: delta > 0,
        }),
    ));
}
