//! Page controller: turns user events into lookups and view updates.
//!
//! Every handler catches its own failures and renders them; nothing is
//! returned to the caller. The page lock is never held across a lookup.

use std::sync::Arc;
use std::time::Duration;

use storefinder_core::{AppConfig, LatLng};
use tokio::sync::Mutex;

use crate::error::LocateError;
use crate::label::Suggestion;
use crate::lookup::{Geocoder, PositionSource, RouteService};
use crate::pipeline::{Locator, RoutePlan};
use crate::session::Session;
use crate::view::{Card, MapView, MSG_EMPTY_INPUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Quiet period before an autocomplete request.
    pub debounce: Duration,
    /// How long the empty-input notice stays up.
    pub notice_dismiss: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            notice_dismiss: Duration::from_millis(3000),
        }
    }
}

impl ControllerSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.autocomplete_debounce_ms),
            notice_dismiss: Duration::from_millis(config.notice_dismiss_ms),
        }
    }
}

struct Page<V> {
    session: Session,
    view: V,
}

pub struct Controller<G, R, V> {
    locator: Arc<Locator<G, R>>,
    page: Arc<Mutex<Page<V>>>,
    notice_dismiss: Duration,
}

impl<G, R, V> Clone for Controller<G, R, V> {
    fn clone(&self) -> Self {
        Self {
            locator: Arc::clone(&self.locator),
            page: Arc::clone(&self.page),
            notice_dismiss: self.notice_dismiss,
        }
    }
}

impl<G, R, V> Controller<G, R, V>
where
    G: Geocoder + 'static,
    R: RouteService + 'static,
    V: MapView + 'static,
{
    pub fn new(locator: Arc<Locator<G, R>>, view: V, settings: &ControllerSettings) -> Self {
        Self {
            locator,
            page: Arc::new(Mutex::new(Page {
                session: Session::new(settings.debounce),
                view,
            })),
            notice_dismiss: settings.notice_dismiss,
        }
    }

    pub fn locator(&self) -> &Locator<G, R> {
        &self.locator
    }

    /// Runs `f` against the view under the page lock.
    pub async fn with_view<T>(&self, f: impl FnOnce(&mut V) -> T) -> T {
        let mut page = self.page.lock().await;
        f(&mut page.view)
    }

    pub async fn user_position(&self) -> Option<LatLng> {
        self.page.lock().await.session.user_position
    }

    /// Suggestions currently in the dropdown.
    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.page.lock().await.session.suggestions.clone()
    }

    /// Draws a marker for every store with coordinates. Returns how many.
    pub async fn mount(&self) -> usize {
        let mut page = self.page.lock().await;
        let mut drawn = 0;
        for store in self.locator.stores() {
            if let Some(position) = store.position() {
                page.view.add_store_marker(store, position);
                drawn += 1;
            }
        }
        tracing::info!(
            drawn,
            total = self.locator.stores().len(),
            "store markers placed"
        );
        drawn
    }

    /// Asks `source` once for the device position. Searches are biased
    /// toward it from then on; failure leaves bias off.
    pub async fn locate_user<P: PositionSource>(&self, source: &P) -> Option<LatLng> {
        match source.current_position().await {
            Ok(position) if position.is_valid() => {
                self.page.lock().await.session.user_position = Some(position);
                tracing::debug!(%position, "user position acquired");
                Some(position)
            }
            Ok(position) => {
                tracing::debug!(%position, "ignoring out-of-range user position");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "user position unavailable, using default view");
                None
            }
        }
    }

    /// Full search: geocode `input`, mark it, show the nearest store and
    /// draw the route to it.
    pub async fn search(&self, input: &str) {
        let (seq, near) = {
            let mut page = self.page.lock().await;
            let Page { session, view } = &mut *page;

            // A search closes the dropdown and anything still in flight for it.
            session.autocomplete.cancel();
            session.suggest_seq.next();
            session.suggestions.clear();
            view.hide_suggestions();

            let seq = session.search_seq.next();
            if input.trim().is_empty() {
                view.show_card(Card::Notice(MSG_EMPTY_INPUT));
                self.dismiss_notice_later(seq);
                return;
            }
            view.show_card(Card::Busy);
            (seq, session.user_position)
        };

        let geocoded = self.locator.geocode(input, near).await;

        let result = {
            let mut page = self.page.lock().await;
            let Page { session, view } = &mut *page;
            if !session.search_seq.is_current(seq) {
                tracing::debug!(seq, "dropping stale geocode response");
                return;
            }

            let point = match geocoded {
                Ok(point) => point,
                Err(e) => {
                    render_failure(view, input, &e);
                    return;
                }
            };

            if let Some(old) = session.search_marker.take() {
                view.remove_overlay(old);
            }
            session.search_marker = Some(view.place_search_marker(point));

            let result = match self.locator.nearest(point) {
                Ok(result) => result,
                Err(e) => {
                    render_failure(view, input, &e);
                    return;
                }
            };
            view.show_card(Card::Result(result.clone()));

            if let Some(old) = session.route.take() {
                view.remove_overlay(old);
            }
            result
        };

        let Some(destination) = result.store.position() else {
            return;
        };
        let plan = self.locator.plan_route(result.point, destination).await;

        let mut page = self.page.lock().await;
        let Page { session, view } = &mut *page;
        if !session.search_seq.is_current(seq) {
            tracing::debug!(seq, "dropping stale route response");
            return;
        }
        match plan {
            RoutePlan::Full(route) => {
                session.route = Some(view.draw_route(&route.path));
                view.fit_bounds(route.bounds);
            }
            RoutePlan::Degraded { bounds } => view.fit_bounds(bounds),
        }
    }

    /// Input changed. Schedules an autocomplete request after the quiet
    /// period, replacing any pending one.
    pub async fn on_input(&self, text: &str) {
        let mut page = self.page.lock().await;
        let Page { session, view } = &mut *page;

        let seq = session.suggest_seq.next();
        if !self.locator.is_suggestible(text) {
            session.autocomplete.cancel();
            session.suggestions.clear();
            view.hide_suggestions();
            return;
        }

        let this = self.clone();
        let text = text.to_owned();
        session.autocomplete.schedule(async move {
            this.run_autocomplete(&text, seq).await;
        });
    }

    /// Fills the input with suggestion `index` and searches for it.
    /// Returns the label now in the input, or `None` when there is no such
    /// suggestion.
    pub async fn pick_suggestion(&self, index: usize) -> Option<String> {
        let label = {
            let mut page = self.page.lock().await;
            let Page { session, view } = &mut *page;
            let label = session.suggestions.get(index)?.label.clone();
            view.set_input(&label);
            label
        };
        self.search(&label).await;
        Some(label)
    }

    /// Click outside the dropdown.
    pub async fn dismiss_suggestions(&self) {
        let mut page = self.page.lock().await;
        page.session.suggestions.clear();
        page.view.hide_suggestions();
    }

    async fn run_autocomplete(&self, text: &str, seq: u64) {
        let near = self.page.lock().await.session.user_position;
        let outcome = self.locator.suggest(text, near).await;

        let mut page = self.page.lock().await;
        let Page { session, view } = &mut *page;
        // Superseded tasks are normally aborted by the debouncer before
        // they get here; a reply can still lose the race for the lock.
        if !session.suggest_seq.is_current(seq) {
            tracing::debug!(seq, "dropping stale suggestions");
            return;
        }
        match outcome {
            Ok(suggestions) if suggestions.is_empty() => {
                session.suggestions.clear();
                view.hide_suggestions();
            }
            Ok(suggestions) => {
                view.show_suggestions(&suggestions);
                session.suggestions = suggestions;
            }
            Err(e) => {
                tracing::warn!(input = text, error = %e, "autocomplete request failed");
            }
        }
    }

    fn dismiss_notice_later(&self, seq: u64) {
        let page = Arc::clone(&self.page);
        let delay = self.notice_dismiss;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut page = page.lock().await;
            if page.session.search_seq.is_current(seq) {
                page.view.hide_card();
            }
        });
    }
}

fn render_failure<V: MapView>(view: &mut V, input: &str, err: &LocateError) {
    let card = match err {
        LocateError::EmptyInput => Card::Notice(MSG_EMPTY_INPUT),
        LocateError::NotFound => {
            tracing::info!(input, "address not found");
            Card::NotFound
        }
        LocateError::NoStores => {
            tracing::warn!("no store has coordinates");
            Card::NoStores
        }
        LocateError::Lookup(e) => {
            tracing::warn!(input, error = %e, "address lookup failed");
            Card::Failed
        }
    };
    view.show_card(card);
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
