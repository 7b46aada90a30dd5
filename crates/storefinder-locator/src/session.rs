//! Per-page mutable state.

use std::time::Duration;

use storefinder_core::LatLng;

use crate::debounce::Debouncer;
use crate::label::Suggestion;
use crate::view::OverlayId;

/// Monotonic tag for outgoing requests. Only the latest tag may render.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Tags a new request, superseding every earlier one.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    #[must_use]
    pub fn is_current(&self, tag: u64) -> bool {
        tag == self.latest
    }
}

/// State of one map page.
#[derive(Debug)]
pub struct Session {
    /// Device position, when the user granted it. Used only for bias.
    pub user_position: Option<LatLng>,
    pub route: Option<OverlayId>,
    pub search_marker: Option<OverlayId>,
    /// Suggestions currently in the dropdown, in display order.
    pub suggestions: Vec<Suggestion>,
    pub search_seq: RequestSeq,
    pub suggest_seq: RequestSeq,
    pub autocomplete: Debouncer,
}

impl Session {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            user_position: None,
            route: None,
            search_marker: None,
            suggestions: Vec::new(),
            search_seq: RequestSeq::default(),
            suggest_seq: RequestSeq::default(),
            autocomplete: Debouncer::new(debounce),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_tag_is_current() {
        let mut seq = RequestSeq::default();
        let first = seq.next();
        assert!(seq.is_current(first));
        let second = seq.next();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
