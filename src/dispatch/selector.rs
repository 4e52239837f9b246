// src/dispatch/selector.rs

use crate::errors::{Result, SharepushError};

/// Picks the destination container for each batch.
///
/// The first batch goes to the first configured destination. Every later
/// batch goes to the first destination (in configured order) that differs
/// from the previous one, so with two or more destinations no container is
/// used twice in a row. With a single destination it is reused every time.
#[derive(Debug, Clone)]
pub struct DestinationSelector {
    destinations: Vec<String>,
    last: Option<usize>,
}

impl DestinationSelector {
    pub fn new(destinations: Vec<String>) -> Result<Self> {
        if destinations.is_empty() {
            return Err(SharepushError::ConfigError(
                "destination list must contain at least one container".to_string(),
            ));
        }
        Ok(Self {
            destinations,
            last: None,
        })
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Most recently selected destination, if any.
    pub fn last(&self) -> Option<&str> {
        self.last.map(|idx| self.destinations[idx].as_str())
    }

    /// Select the destination for the next batch and remember it.
    pub fn select(&mut self) -> &str {
        let idx = match self.last() {
            None => 0,
            Some(prev) => self
                .destinations
                .iter()
                .position(|d| d != prev)
                .unwrap_or(0),
        };
        self.last = Some(idx);
        &self.destinations[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(names: &[&str]) -> DestinationSelector {
        DestinationSelector::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn alternates_between_two_destinations() {
        let mut s = selector(&["hello", "test"]);
        let picks: Vec<String> = (0..5).map(|_| s.select().to_string()).collect();
        assert_eq!(picks, vec!["hello", "test", "hello", "test", "hello"]);
    }

    #[test]
    fn single_destination_is_always_reused() {
        let mut s = selector(&["only"]);
        for _ in 0..3 {
            assert_eq!(s.select(), "only");
        }
        assert_eq!(s.last(), Some("only"));
    }

    #[test]
    fn scans_in_configured_order_away_from_last() {
        let mut s = selector(&["a", "b", "c"]);
        assert_eq!(s.select(), "a");
        assert_eq!(s.select(), "b");
        // First entry that differs from "b" is "a" again.
        assert_eq!(s.select(), "a");
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(DestinationSelector::new(Vec::new()).is_err());
    }
}
