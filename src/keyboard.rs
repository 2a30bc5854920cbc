// pwguess Keyboard Adjacency Graphs
// Builds neighbor tables from textual keyboard layouts

use crate::types::ConfigError;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Names of the built-in graphs, in matching order
pub const BUILTIN_KEYBOARDS: &[&str] = &["qwerty", "dvorak", "keypad", "mac_keypad"];

/// Characters typed with shift held on a US keyboard
const SHIFTED_CHARS: &str = "~!@#$%^&*()_+QWERTYUIOP{}|ASDFGHJKL:\"ZXCVBNM<>?";

const QWERTY: &str = r#"`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) -_ =+
    qQ wW eE rR tT yY uU iI oO pP [{ ]} \|
     aA sS dD fF gG hH jJ kK lL ;: '"
      zZ xX cC vV bB nN mM ,< .> /?"#;

const DVORAK: &str = r#"`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) [{ ]}
    '" ,< .> pP yY fF gG cC rR lL /? =+ \|
     aA oO eE uU iI dD hH tT nN sS -_
      ;: qQ jJ kK xX bB mM wW vV zZ"#;

const KEYPAD: &str = "  / * -
7 8 9 +
4 5 6
1 2 3
  0 .";

const MAC_KEYPAD: &str = "  = / *
7 8 9 -
4 5 6 +
1 2 3
  0 .";

/// Physical arrangement of a graph
///
/// Keyboards have staggered rows (6 neighbor directions), keypads are a
/// grid (8 directions). The kind also selects the scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Keyboard,
    Keypad,
}

impl GraphKind {
    /// Neighbor coordinates of (x, y); list position encodes direction
    fn adjacent_coords(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        match self {
            GraphKind::Keyboard => vec![
                (x - 1, y),
                (x, y - 1),
                (x + 1, y - 1),
                (x + 1, y),
                (x, y + 1),
                (x - 1, y + 1),
            ],
            GraphKind::Keypad => vec![
                (x - 1, y),
                (x - 1, y - 1),
                (x, y - 1),
                (x + 1, y - 1),
                (x + 1, y),
                (x + 1, y + 1),
                (x, y + 1),
                (x - 1, y + 1),
            ],
        }
    }
}

/// Summary numbers used by spatial guess estimation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    /// Number of characters that can start a walk
    pub starting_positions: usize,

    /// Mean number of present neighbor slots per character
    pub average_degree: f64,
}

/// Mapping from a key character to its ordered neighbor slots
///
/// Each present slot is the neighbor key's token: index 0 is the unshifted
/// character, index 1 (if any) the shifted one.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    name: String,
    kind: GraphKind,
    neighbors: FxHashMap<char, Vec<Option<String>>>,
}

impl AdjacencyGraph {
    /// Wrap an already-built neighbor table
    pub fn from_neighbors(
        name: impl Into<String>,
        kind: GraphKind,
        neighbors: FxHashMap<char, Vec<Option<String>>>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            neighbors,
        }
    }

    /// Build a graph from a layout drawing
    ///
    /// Tokens are whitespace separated and all the same width. Keyboard
    /// rows are drawn indented one extra space per row.
    ///
    /// # Example
    /// ```
    /// # use pwguess::keyboard::{AdjacencyGraph, GraphKind};
    /// let graph = AdjacencyGraph::from_layout("tiny", GraphKind::Keypad, "1 2\n3 4").unwrap();
    /// assert_eq!(graph.starting_positions(), 4);
    /// ```
    pub fn from_layout(
        name: impl Into<String>,
        kind: GraphKind,
        layout: &str,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let token_size = layout
            .split_whitespace()
            .next()
            .map(|t| t.chars().count())
            .unwrap_or(1);
        let x_unit = token_size + 1;

        let invalid = |token: &str| ConfigError::InvalidLayout {
            name: name.clone(),
            token: token.to_string(),
        };

        let mut positions: FxHashMap<(i32, i32), &str> = FxHashMap::default();
        for (y, line) in layout.lines().enumerate() {
            let slant = match kind {
                GraphKind::Keyboard => y,
                GraphKind::Keypad => 0,
            };
            for token in line.split_whitespace() {
                if token.chars().count() != token_size {
                    return Err(invalid(token));
                }
                let offset = token.as_ptr() as usize - line.as_ptr() as usize;
                let column = line[..offset].chars().count();
                let shifted = column.checked_sub(slant).ok_or_else(|| invalid(token))?;
                if shifted % x_unit != 0 {
                    return Err(invalid(token));
                }
                positions.insert(((shifted / x_unit) as i32, y as i32), token);
            }
        }

        let mut neighbors: FxHashMap<char, Vec<Option<String>>> = FxHashMap::default();
        for (&(x, y), token) in &positions {
            let slots: Vec<Option<String>> = kind
                .adjacent_coords(x, y)
                .into_iter()
                .map(|coord| positions.get(&coord).map(|t| t.to_string()))
                .collect();
            for ch in token.chars() {
                neighbors.insert(ch, slots.clone());
            }
        }

        Ok(Self {
            name,
            kind,
            neighbors,
        })
    }

    /// One of the graphs named in [`BUILTIN_KEYBOARDS`]
    pub fn builtin(name: &str) -> Result<Self, ConfigError> {
        match name {
            "qwerty" => Self::from_layout(name, GraphKind::Keyboard, QWERTY),
            "dvorak" => Self::from_layout(name, GraphKind::Keyboard, DVORAK),
            "keypad" => Self::from_layout(name, GraphKind::Keypad, KEYPAD),
            "mac_keypad" => Self::from_layout(name, GraphKind::Keypad, MAC_KEYPAD),
            other => Err(ConfigError::UnknownKeyboard(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Ordered neighbor slots of `ch`, if `ch` is on this graph
    #[inline]
    pub fn neighbors(&self, ch: char) -> Option<&[Option<String>]> {
        self.neighbors.get(&ch).map(|v| v.as_slice())
    }

    /// Whether `ch` counts as shifted when it starts a walk on this graph
    pub fn is_shifted_start(&self, ch: char) -> bool {
        self.kind == GraphKind::Keyboard && SHIFTED_CHARS.contains(ch)
    }

    pub fn starting_positions(&self) -> usize {
        self.neighbors.len()
    }

    pub fn average_degree(&self) -> f64 {
        if self.neighbors.is_empty() {
            return 0.0;
        }
        let total: usize = self
            .neighbors
            .values()
            .map(|slots| slots.iter().filter(|s| s.is_some()).count())
            .sum();
        total as f64 / self.neighbors.len() as f64
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            starting_positions: self.starting_positions(),
            average_degree: self.average_degree(),
        }
    }
}
