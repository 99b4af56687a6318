//! The session mediator.
//!
//! All state lives here and changes only through `Session`'s methods. Any
//! change to the candidate set or the filters resets the selection to
//! [`SelectionState::Idle`] and cancels a running shuffle.
//!
//! A search fetches everything within the radius. The rating floor and
//! cuisine exclusions are applied locally, so loosening them brings dropped
//! venues back without a new fetch.
//!
//! Searches are superseding: every search, origin change or radius change
//! bumps a generation counter, and a search result carrying an older
//! generation is dropped instead of overwriting newer state.

use std::fmt::Display;
use std::sync::Arc;

use shuffood_core::{apply_filters, Candidate, CategoryMatcher, Coordinate, QueryFilters};
use shuffood_places::{CandidateSource, PlacesError};

use crate::error::SessionError;
use crate::selector::{Selector, ShuffleEvent, ShuffleHandle};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Animating {
        tick_count: u32,
        current_pick: Candidate,
    },
    Settled {
        final_pick: Candidate,
    },
}

/// Proof that a search was started, and against what.
///
/// Hand it back to [`Session::complete_search`] together with the fetch
/// result.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    origin: Coordinate,
    filters: QueryFilters,
}

impl SearchTicket {
    #[must_use]
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    #[must_use]
    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result replaced the candidate set. `shown` of `total` fetched
    /// candidates survive the current filters.
    Applied { shown: usize, total: usize },
    /// A newer search, origin or radius change happened first.
    Superseded,
}

pub struct Session<S> {
    source: S,
    matcher: Arc<dyn CategoryMatcher>,
    selector: Selector,
    origin: Option<Coordinate>,
    filters: QueryFilters,
    raw: Vec<Candidate>,
    filtered: Vec<Candidate>,
    selection: SelectionState,
    generation: u64,
    shuffle: Option<ShuffleHandle>,
}

impl<S: CandidateSource> Session<S> {
    pub fn new(
        source: S,
        matcher: Arc<dyn CategoryMatcher>,
        selector: Selector,
        filters: QueryFilters,
    ) -> Self {
        Self {
            source,
            matcher,
            selector,
            origin: None,
            filters,
            raw: Vec::new(),
            filtered: Vec::new(),
            selection: SelectionState::Idle,
            generation: 0,
            shuffle: None,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    #[must_use]
    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }

    /// The candidate set as last fetched, before client-side filtering.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.raw
    }

    #[must_use]
    pub fn filtered(&self) -> &[Candidate] {
        &self.filtered
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// `(shown, total)`: filtered count and fetched count.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.filtered.len(), self.raw.len())
    }

    #[must_use]
    pub fn is_shuffling(&self) -> bool {
        self.shuffle.is_some()
    }

    /// Moves the session to `origin`. Candidate distances were measured from
    /// the old origin, so the candidate set is discarded.
    pub fn set_origin(&mut self, origin: Coordinate) {
        if self.origin == Some(origin) {
            return;
        }
        tracing::info!(origin = %origin, "origin set");
        self.origin = Some(origin);
        self.generation += 1;
        self.raw.clear();
        self.filtered.clear();
        self.reset_selection();
    }

    /// Uses the location provider's answer, or `fallback` if it failed.
    pub fn resolve_origin<E: Display>(
        &mut self,
        provided: Result<Coordinate, E>,
        fallback: Coordinate,
    ) -> Coordinate {
        let origin = match provided {
            Ok(origin) => origin,
            Err(e) => {
                tracing::warn!(error = %e, fallback = %fallback, "location unavailable; using fallback origin");
                fallback
            }
        };
        self.set_origin(origin);
        origin
    }

    /// Replaces all filters at once.
    pub fn set_filters(&mut self, filters: QueryFilters) {
        let radius_changed =
            (filters.radius_miles() - self.filters.radius_miles()).abs() > f64::EPSILON;
        self.filters = filters;
        if radius_changed {
            self.generation += 1;
        }
        self.filters_changed();
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Filter`] for a non-positive or non-finite
    /// radius. The session is unchanged in that case.
    pub fn set_radius_miles(&mut self, radius_miles: f64) -> Result<(), SessionError> {
        self.filters.set_radius_miles(radius_miles)?;
        self.generation += 1;
        self.filters_changed();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Filter`] for a rating outside `[0, 5]`. The
    /// session is unchanged in that case.
    pub fn set_min_rating(&mut self, min_rating: f64) -> Result<(), SessionError> {
        self.filters.set_min_rating(min_rating)?;
        self.filters_changed();
        Ok(())
    }

    /// Flips the exclusion of `category`. Returns `true` when it is excluded
    /// afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let excluded = self.filters.toggle_category(category);
        self.filters_changed();
        excluded
    }

    /// Starts a search against the current origin and radius, superseding
    /// any search still in flight. The ticket's filters carry the radius
    /// only.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoOrigin`] if no origin has been set.
    pub fn begin_search(&mut self) -> Result<SearchTicket, SessionError> {
        let origin = self.origin.ok_or(SessionError::NoOrigin)?;
        self.generation += 1;
        Ok(SearchTicket {
            generation: self.generation,
            origin,
            filters: self.filters.radius_only(),
        })
    }

    /// Applies the result of the search identified by `ticket`.
    ///
    /// A superseded ticket is dropped whatever its result. A failed fetch
    /// leaves the previous candidate set in place.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Places`] when the current search failed.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<Candidate>, PlacesError>,
    ) -> Result<SearchOutcome, SessionError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping superseded search result"
            );
            return Ok(SearchOutcome::Superseded);
        }

        let candidates = result.inspect_err(|e| {
            tracing::warn!(error = %e, "search failed");
        })?;

        self.raw = candidates;
        self.refilter();
        self.reset_selection();

        let (shown, total) = self.counts();
        tracing::info!(shown, total, "search applied");
        Ok(SearchOutcome::Applied { shown, total })
    }

    /// Fetches every candidate within the radius of the current origin and
    /// replaces the candidate set.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoOrigin`] if no origin has been set.
    /// - [`SessionError::Places`] if the fetch failed.
    pub async fn search(&mut self) -> Result<SearchOutcome, SessionError> {
        let ticket = self.begin_search()?;
        let result = self
            .source
            .search_nearby(ticket.origin, &ticket.filters)
            .await;
        self.complete_search(ticket, result)
    }

    /// Starts a new shuffle over the filtered view, cancelling any shuffle
    /// already running. Drive it with [`Session::next_event`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Selection`] when the filtered view is empty;
    /// the selection is left at [`SelectionState::Idle`].
    pub fn shuffle(&mut self) -> Result<(), SessionError> {
        self.reset_selection();
        let handle = self.selector.shuffle(self.filtered.clone())?;
        self.shuffle = Some(handle);
        Ok(())
    }

    /// Waits for the running shuffle's next event and records it in the
    /// selection state. Returns `None` when no shuffle is running.
    pub async fn next_event(&mut self) -> Option<ShuffleEvent> {
        let event = self.shuffle.as_mut()?.next_event().await;
        match &event {
            Some(ShuffleEvent::Tick { tick, pick }) => {
                self.selection = SelectionState::Animating {
                    tick_count: *tick,
                    current_pick: pick.clone(),
                };
            }
            Some(ShuffleEvent::Settled(pick)) => {
                tracing::info!(id = %pick.id, name = %pick.name, "pick settled");
                self.selection = SelectionState::Settled {
                    final_pick: pick.clone(),
                };
                self.shuffle = None;
            }
            None => self.shuffle = None,
        }
        event
    }

    /// Runs the current shuffle to completion and returns the final pick.
    pub async fn settle(&mut self) -> Option<Candidate> {
        while self.next_event().await.is_some() {}
        match &self.selection {
            SelectionState::Settled { final_pick } => Some(final_pick.clone()),
            _ => None,
        }
    }

    /// Selects a candidate from the filtered view directly, skipping the
    /// shuffle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownCandidate`] if `id` is not in the
    /// filtered view.
    pub fn pick(&mut self, id: &str) -> Result<Candidate, SessionError> {
        let candidate = self
            .filtered
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCandidate(id.to_owned()))?;
        self.cancel_shuffle();
        self.selection = SelectionState::Settled {
            final_pick: candidate.clone(),
        };
        Ok(candidate)
    }

    /// Stops a running shuffle. An animating selection returns to idle; a
    /// settled one is kept.
    pub fn cancel_shuffle(&mut self) {
        if let Some(handle) = self.shuffle.take() {
            tracing::debug!("shuffle cancelled");
            handle.cancel();
        }
        if matches!(self.selection, SelectionState::Animating { .. }) {
            self.selection = SelectionState::Idle;
        }
    }

    fn filters_changed(&mut self) {
        self.refilter();
        self.reset_selection();
    }

    fn refilter(&mut self) {
        self.filtered = apply_filters(&self.raw, &self.filters, &*self.matcher);
    }

    fn reset_selection(&mut self) {
        if let Some(handle) = self.shuffle.take() {
            handle.cancel();
        }
        self.selection = SelectionState::Idle;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
