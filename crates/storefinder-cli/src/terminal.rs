//! Line-oriented [`MapView`] for the interactive mode.

use std::fmt;
use std::io::{self, Write};

use storefinder_core::{Bounds, LatLng, Store};
use storefinder_locator::{Card, MapView, OverlayId, Suggestion};

use crate::commands::format_result;

/// Prints map updates as text. Overlays only exist as ids.
pub(crate) struct TerminalView<W: Write + Send = io::Stdout> {
    out: W,
    next_overlay: u64,
}

impl TerminalView {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            next_overlay: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }

    fn overlay(&mut self) -> OverlayId {
        self.next_overlay += 1;
        OverlayId(self.next_overlay)
    }
}

impl<W: Write + Send> MapView for TerminalView<W> {
    fn add_store_marker(&mut self, store: &Store, position: LatLng) {
        self.line(format_args!("  store  {} @ {position}", store.name));
    }

    fn show_card(&mut self, card: Card) {
        match card {
            Card::Result(result) => {
                let text = format_result(&result);
                self.line(format_args!("{text}"));
            }
            other => {
                let text = other.message().unwrap_or_default();
                self.line(format_args!("{text}"));
            }
        }
    }

    fn hide_card(&mut self) {}

    fn place_search_marker(&mut self, point: LatLng) -> OverlayId {
        self.line(format_args!("You are here: {point}"));
        self.overlay()
    }

    fn draw_route(&mut self, path: &[LatLng]) -> OverlayId {
        self.line(format_args!("Route drawn ({} points)", path.len()));
        self.overlay()
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        tracing::trace!(overlay = id.0, "overlay removed");
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        tracing::debug!(?bounds, "view fitted");
    }

    fn show_suggestions(&mut self, suggestions: &[Suggestion]) {
        for (i, suggestion) in suggestions.iter().enumerate() {
            self.line(format_args!("  [{}] {}", i + 1, suggestion.label));
        }
    }

    fn hide_suggestions(&mut self) {}

    fn set_input(&mut self, text: &str) {
        self.line(format_args!("> {text}"));
    }
}
