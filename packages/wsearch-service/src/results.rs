use std::time::Instant;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, SearchService};
use wsearch_domain::{
	entity::{Entity, EntityMatch, SimilarityStrategy, TitleQuery},
	normalize,
	tiers::{self, TieredHit},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultsRequest {
	pub keyword: String,
	/// Accepted for parity with the suggestions request. Ranking of the result page is not
	/// personalized.
	pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCard {
	pub id: Uuid,
	pub title: String,
	pub description: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultsResponse {
	pub keyword: String,
	pub entities: Vec<EntityCard>,
	pub elapsed_ms: u64,
}

impl SearchService {
	pub async fn search_results(&self, req: SearchResultsRequest) -> Result<SearchResultsResponse> {
		let started = Instant::now();
		let normalized = normalize::normalize_keyword(&req.keyword);
		let hits = self.tiered_search(&normalized, self.cfg.search.results_limit).await?;
		let max_chars = self.cfg.search.description_max_chars as usize;
		let entities = hits.into_iter().map(|hit| card(hit.entity, max_chars)).collect();
		let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

		Ok(SearchResultsResponse { keyword: req.keyword, entities, elapsed_ms })
	}

	/// Prefix, fuzzy, then substring matches for an already normalized keyword.
	///
	/// Each tier is queried with the ids claimed by the tiers above it excluded. Any tier query
	/// failure fails the whole search.
	pub async fn tiered_search(&self, keyword: &str, limit: u32) -> Result<Vec<TieredHit>> {
		if keyword.is_empty() || limit == 0 {
			return Ok(Vec::new());
		}

		let floor = self.cfg.search.fuzzy_threshold;
		let wanted = limit as usize;
		let prefix = self.stores.entities.match_titles(&TitleQuery::prefix(keyword, limit)).await?;
		let mut claimed = Vec::with_capacity(wanted);

		claim(&mut claimed, prefix.iter());

		let fuzzy = if self.tier_satisfied(&claimed, wanted) {
			Vec::new()
		} else {
			let query = TitleQuery::similar(keyword, SimilarityStrategy::Trigram, floor, limit)
				.excluding(claimed.iter().copied());

			self.stores.entities.match_titles(&query).await?
		};

		claim(&mut claimed, fuzzy.iter().filter(|m| m.similarity > floor));

		let substring = if self.tier_satisfied(&claimed, wanted) {
			Vec::new()
		} else {
			let query = TitleQuery::substring(keyword, limit).excluding(claimed.iter().copied());

			self.stores.entities.match_titles(&query).await?
		};

		Ok(tiers::merge_tiers(prefix, fuzzy, substring, floor, wanted))
	}

	fn tier_satisfied(&self, claimed: &[Uuid], wanted: usize) -> bool {
		self.cfg.search.skip_satisfied_tiers && claimed.len() >= wanted
	}
}

fn claim<'a>(claimed: &mut Vec<Uuid>, matches: impl Iterator<Item = &'a EntityMatch>) {
	for m in matches {
		if !claimed.contains(&m.entity.entity_id) {
			claimed.push(m.entity.entity_id);
		}
	}
}

fn card(entity: Entity, max_chars: usize) -> EntityCard {
	EntityCard {
		id: entity.entity_id,
		title: entity.title,
		description: normalize::truncate_text(&entity.description, max_chars),
		created_at: entity.created_at,
	}
}
