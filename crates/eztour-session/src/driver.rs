//! Async effect runner for [`SearchSession`].

use eztour_core::{PlaceCategory, Position, PriceTier};
use eztour_places::{PlaceSearch, SearchError};
use tokio::sync::watch;

use crate::session::{FetchRequest, SearchSession, SessionEvent, Transition};

/// Feeds events into a [`SearchSession`], runs the fetches it asks for and
/// feeds the outcomes back.
///
/// The latest position from the location controller is synced into the
/// session before every search.
pub struct SearchDriver<S> {
    engine: S,
    session: SearchSession,
    positions: watch::Receiver<Option<Position>>,
}

impl<S: PlaceSearch> SearchDriver<S> {
    #[must_use]
    pub fn new(engine: S, positions: watch::Receiver<Option<Position>>) -> Self {
        Self::with_session(engine, positions, SearchSession::default())
    }

    #[must_use]
    pub fn with_session(
        engine: S,
        positions: watch::Receiver<Option<Position>>,
        session: SearchSession,
    ) -> Self {
        Self {
            engine,
            session,
            positions,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    #[must_use]
    pub fn engine(&self) -> &S {
        &self.engine
    }

    #[must_use]
    pub fn into_session(self) -> SearchSession {
        self.session
    }

    /// Applies one event and returns any fetch it produced without running it.
    pub fn dispatch(&mut self, event: SessionEvent) -> Option<FetchRequest> {
        let Transition { session, request } = std::mem::take(&mut self.session).reduce(event);
        self.session = session;
        request
    }

    /// Waits until the controller has published a position.
    ///
    /// Returns `None` if the controller was dropped first.
    pub async fn wait_for_position(&mut self) -> Option<Position> {
        let position = match self.positions.wait_for(Option::is_some).await {
            Ok(latest) => *latest,
            Err(_) => None,
        };
        self.sync_position();
        position
    }

    pub fn select_criteria(&mut self, category: PlaceCategory, price_tier: PriceTier) {
        self.dispatch(SessionEvent::CriteriaSelected {
            category,
            price_tier,
        });
    }

    /// Searches at the current radius. Returns how many candidates were added;
    /// `0` when the search was declined.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`SearchError`] when the fetch fails. The session
    /// records the failure and keeps its accumulated results.
    pub async fn search(&mut self) -> Result<usize, SearchError> {
        self.sync_position();
        match self.dispatch(SessionEvent::SearchRequested) {
            Some(request) => self.run(request).await,
            None => Ok(0),
        }
    }

    /// Widens the radius one step and searches again. Returns how many
    /// candidates were added; `0` at the ceiling or when declined.
    ///
    /// # Errors
    ///
    /// Same as [`SearchDriver::search`].
    pub async fn load_more(&mut self) -> Result<usize, SearchError> {
        self.sync_position();
        match self.dispatch(SessionEvent::LoadMoreRequested) {
            Some(request) => self.run(request).await,
            None => Ok(0),
        }
    }

    fn sync_position(&mut self) {
        let latest = *self.positions.borrow_and_update();
        if let Some(position) = latest {
            if self.session.position() != Some(position) {
                self.dispatch(SessionEvent::PositionUpdated(position));
            }
        }
    }

    async fn run(&mut self, request: FetchRequest) -> Result<usize, SearchError> {
        let FetchRequest { ticket, query } = request;
        let before = self.session.candidates().len();

        match self.engine.fetch(&query).await {
            Ok(delta) => {
                self.dispatch(SessionEvent::FetchSucceeded { ticket, delta });
                Ok(self.session.candidates().len().saturating_sub(before))
            }
            Err(e) if e.is_precondition() => {
                tracing::debug!(reason = %e, "fetch declined");
                self.dispatch(SessionEvent::FetchDeclined { ticket });
                Ok(0)
            }
            Err(e) => {
                self.dispatch(SessionEvent::FetchFailed {
                    ticket,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
