//! The search session as a value with a pure reducer.
//!
//! `SearchSession::reduce` takes the current session and one event and
//! returns the next session plus, when the event calls for it, a
//! [`FetchRequest`] for the caller to execute. Every request carries a
//! [`FetchTicket`]; a completion is applied only while its ticket is still
//! the in-flight one, so responses to superseded criteria or radii are
//! discarded.

use std::collections::HashSet;

use eztour_core::{rank, Candidate, PlaceCategory, Position, PriceTier, Radius, SearchCriteria};
use eztour_places::SearchQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    LoadMore,
}

/// Identifies one issued fetch and the state it was issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub sequence: u64,
    pub radius: Radius,
    pub category: PlaceCategory,
    pub price_tier: PriceTier,
    pub kind: FetchKind,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub query: SearchQuery,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    CriteriaSelected {
        category: PlaceCategory,
        price_tier: PriceTier,
    },
    CategorySelected(PlaceCategory),
    PriceTierSelected(PriceTier),
    PositionUpdated(Position),
    SearchRequested,
    LoadMoreRequested,
    FetchSucceeded {
        ticket: FetchTicket,
        delta: Vec<Candidate>,
    },
    /// The fetch was declined before any request went out.
    FetchDeclined {
        ticket: FetchTicket,
    },
    FetchFailed {
        ticket: FetchTicket,
        message: String,
    },
}

#[derive(Debug)]
pub struct Transition {
    pub session: SearchSession,
    pub request: Option<FetchRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    criteria: SearchCriteria,
    radius: Radius,
    candidates: Vec<Candidate>,
    position: Option<Position>,
    generation: u64,
    sequence: u64,
    in_flight: Option<FetchTicket>,
    last_failure: Option<String>,
}

impl SearchSession {
    /// A fresh session with the given criteria preselected.
    #[must_use]
    pub fn with_criteria(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        self.criteria
    }

    #[must_use]
    pub fn radius(&self) -> Radius {
        self.radius
    }

    /// Accumulated candidates in arrival order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Accumulated candidates ranked by distance from the latest position.
    #[must_use]
    pub fn ranked(&self) -> Vec<Candidate> {
        rank(&self.candidates, self.position)
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|t| t.kind == FetchKind::LoadMore)
    }

    /// Message of the most recent failed fetch, cleared by the next success
    /// or criteria change.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Looks up an accumulated candidate by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn existing_ids(&self) -> HashSet<String> {
        self.candidates.iter().map(|c| c.id.clone()).collect()
    }

    #[must_use]
    pub fn reduce(mut self, event: SessionEvent) -> Transition {
        let request = match event {
            SessionEvent::CriteriaSelected {
                category,
                price_tier,
            } => {
                self.select(SearchCriteria::new(category, price_tier));
                None
            }
            SessionEvent::CategorySelected(category) => {
                self.select(SearchCriteria {
                    category: Some(category),
                    ..self.criteria
                });
                None
            }
            SessionEvent::PriceTierSelected(price_tier) => {
                self.select(SearchCriteria {
                    price_tier: Some(price_tier),
                    ..self.criteria
                });
                None
            }
            SessionEvent::PositionUpdated(position) => {
                self.position = Some(position);
                None
            }
            SessionEvent::SearchRequested => self.issue(FetchKind::Initial),
            SessionEvent::LoadMoreRequested => match self.radius.expanded() {
                Some(next) => {
                    self.radius = next;
                    self.issue(FetchKind::LoadMore)
                }
                None => {
                    tracing::debug!(radius = %self.radius, "radius at ceiling; load more ignored");
                    None
                }
            },
            SessionEvent::FetchSucceeded { ticket, delta } => {
                if self.take_if_current(&ticket) {
                    self.last_failure = None;
                    self.append(delta);
                }
                None
            }
            SessionEvent::FetchDeclined { ticket } => {
                self.take_if_current(&ticket);
                None
            }
            SessionEvent::FetchFailed { ticket, message } => {
                if self.take_if_current(&ticket) {
                    tracing::warn!(radius = %ticket.radius, error = %message, "fetch failed");
                    self.last_failure = Some(message);
                }
                None
            }
        };

        Transition {
            session: self,
            request,
        }
    }

    fn select(&mut self, criteria: SearchCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.candidates.clear();
        self.radius = Radius::floor();
        self.generation += 1;
        self.in_flight = None;
        self.last_failure = None;
        self.criteria = criteria;
        tracing::debug!(generation = self.generation, "criteria changed; results reset");
    }

    fn issue(&mut self, kind: FetchKind) -> Option<FetchRequest> {
        let Some((category, price_tier)) = self.criteria.complete() else {
            tracing::debug!("search declined: criteria incomplete");
            return None;
        };
        let Some(position) = self.position else {
            tracing::debug!("search declined: no position yet");
            return None;
        };

        self.sequence += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            sequence: self.sequence,
            radius: self.radius,
            category,
            price_tier,
            kind,
        };
        self.in_flight = Some(ticket.clone());

        Some(FetchRequest {
            ticket,
            query: SearchQuery {
                position: Some(position),
                category,
                price_tier: Some(price_tier),
                radius: self.radius,
                existing_ids: self.existing_ids(),
            },
        })
    }

    /// Clears the in-flight ticket when `ticket` is it; otherwise the
    /// completion is stale.
    fn take_if_current(&mut self, ticket: &FetchTicket) -> bool {
        if self.in_flight.as_ref() == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            tracing::warn!(
                generation = ticket.generation,
                sequence = ticket.sequence,
                radius = %ticket.radius,
                "discarding stale fetch completion"
            );
            false
        }
    }

    fn append(&mut self, delta: Vec<Candidate>) {
        let mut ids = self.existing_ids();
        let before = self.candidates.len();
        self.candidates
            .extend(delta.into_iter().filter(|c| ids.insert(c.id.clone())));
        tracing::info!(
            added = self.candidates.len() - before,
            total = self.candidates.len(),
            radius = %self.radius,
            "results updated"
        );
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
