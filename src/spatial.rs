// pwguess Spatial Matcher
// Finds keyboard-adjacency walks such as "qwerty", "zxcvbn" or "6tfGHJ"

use crate::keyboard::AdjacencyGraph;
use crate::matcher::sort_matches;
use crate::types::{Match, Pattern, SpatialPattern};

/// Walks of three or more keys on any of the graphs, sorted by (i, j)
pub fn spatial_match(password: &str, graphs: &[&AdjacencyGraph]) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let mut matches: Vec<Match> = graphs
        .iter()
        .flat_map(|graph| spatial_match_helper(&chars, graph))
        .collect();
    sort_matches(&mut matches);
    matches
}

/// Scan one graph left to right, extending each run while the next
/// character sits in a neighbor slot of the current one
fn spatial_match_helper(chars: &[char], graph: &AdjacencyGraph) -> Vec<Match> {
    let n = chars.len();
    let mut matches = Vec::new();
    let mut i = 0;

    while i + 1 < n {
        let mut j = i + 1;
        let mut last_direction: Option<usize> = None;
        let mut turns = 0;
        let mut shifted_count = usize::from(graph.is_shifted_start(chars[i]));

        loop {
            let found = j < n && {
                let cur = chars[j];
                let step = graph.neighbors(chars[j - 1]).and_then(|slots| {
                    slots.iter().enumerate().find_map(|(direction, slot)| {
                        slot.as_ref()?
                            .chars()
                            .position(|c| c == cur)
                            .map(|idx| (direction, idx))
                    })
                });
                match step {
                    Some((direction, idx)) => {
                        // index 1 in a slot is the shifted character: '@' in "2@"
                        if idx == 1 {
                            shifted_count += 1;
                        }
                        // the first step always counts as a turn
                        if last_direction != Some(direction) {
                            turns += 1;
                            last_direction = Some(direction);
                        }
                        true
                    }
                    None => false,
                }
            };

            if found {
                j += 1;
                continue;
            }

            // runs of one or two keys are indistinguishable from brute force
            if j - i > 2 {
                matches.push(Match::new(
                    i,
                    j - 1,
                    chars[i..j].iter().collect::<String>(),
                    Pattern::Spatial(SpatialPattern {
                        graph: graph.name().to_string(),
                        graph_kind: graph.kind(),
                        turns,
                        shifted_count,
                    }),
                ));
            }
            i = j;
            break;
        }
    }
    matches
}
