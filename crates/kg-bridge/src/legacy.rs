//! Parser for the textual result format of engines that only print their results.
//!
//! Tied to the exact shape `OrderedLink (Node "a") (Node "b") (Node "c")`. A
//! different upstream rendering needs a new parser, not a looser pattern.

use kg_types::Triple;
use regex::Regex;

const ORDERED_LINK_TEXT: &str = r#"OrderedLink\s*\((?:Node\s*)?"?([^\)\s"]+)"?\)\s*\((?:Node\s*)?"?([^\)\s"]+)"?\)\s*\((?:Node\s*)?"?([^\)\s"]+)"?\)"#;

pub struct LegacyTextParser {
    pattern: Regex,
}

impl LegacyTextParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(ORDERED_LINK_TEXT).expect("ordered link pattern is valid"),
        }
    }

    /// Every `OrderedLink` with three single-word elements in `text`, in order.
    pub fn parse(&self, text: &str) -> Vec<Triple> {
        self.pattern
            .captures_iter(text)
            .map(|caps| Triple::new(&caps[1], &caps[2], &caps[3]))
            .collect()
    }
}

impl Default for LegacyTextParser {
    fn default() -> Self {
        Self::new()
    }
}
