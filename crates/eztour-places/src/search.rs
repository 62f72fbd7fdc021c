//! The geo-search engine: one nearby-search call, exact price-tier filtering
//! and deduplication against candidates the caller already holds.

use std::collections::HashSet;
use std::future::Future;

use eztour_core::{Candidate, PlaceCategory, Position, PriceTier, Radius};

use crate::client::PlacesClient;
use crate::error::{MissingInput, SearchError};
use crate::normalize::normalize_place;

/// Inputs for one fetch.
///
/// `existing_ids` holds the ids already accumulated by the caller; any
/// result with one of these ids is left out of the returned delta.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub position: Option<Position>,
    pub category: PlaceCategory,
    pub price_tier: Option<PriceTier>,
    pub radius: Radius,
    pub existing_ids: HashSet<String>,
}

/// Anything that can turn a [`SearchQuery`] into a candidate delta.
pub trait PlaceSearch {
    /// Fetches candidates for `query`, returning only new, tier-matching
    /// entries in provider order.
    fn fetch(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, SearchError>> + Send;
}

/// [`PlaceSearch`] backed by the places HTTP API.
pub struct GeoSearchEngine {
    client: PlacesClient,
}

impl GeoSearchEngine {
    #[must_use]
    pub fn new(client: PlacesClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &PlacesClient {
        &self.client
    }
}

impl PlaceSearch for GeoSearchEngine {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
        let Some(price_tier) = query.price_tier else {
            return Err(SearchError::Precondition(MissingInput::PriceTier));
        };
        let Some(position) = query.position else {
            return Err(SearchError::Precondition(MissingInput::Position));
        };

        tracing::debug!(
            %position,
            radius = query.radius.meters(),
            category = %query.category,
            price_tier = price_tier.value(),
            "fetching nearby places"
        );

        let page = self
            .client
            .nearby_search(position, query.radius, query.category)
            .await?;

        let fetched = page.results.len();
        let candidates: Vec<Candidate> = page.results.into_iter().map(normalize_place).collect();
        let delta = select_delta(candidates, price_tier, &query.existing_ids);

        tracing::info!(
            fetched,
            added = delta.len(),
            radius = query.radius.meters(),
            "nearby search complete"
        );
        Ok(delta)
    }
}

/// Keeps candidates whose tier equals `price_tier` exactly and whose id is
/// neither in `existing_ids` nor repeated earlier in the same page.
#[must_use]
pub fn select_delta(
    candidates: Vec<Candidate>,
    price_tier: PriceTier,
    existing_ids: &HashSet<String>,
) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| c.price_tier == Some(price_tier))
        .filter(|c| !existing_ids.contains(&c.id))
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}
