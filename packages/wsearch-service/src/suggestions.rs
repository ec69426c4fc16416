//! Autocomplete suggestions.
//!
//! A request fans out to four candidate sources, scores every candidate, collapses duplicate
//! texts, and keeps the top entries. Impressions for the returned entries are written on a
//! detached task.

mod candidates;
mod ranking;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ImpressionRecord, Result, SearchService};
use wsearch_domain::{
	candidate::{CandidateSource, SuggestionKind},
	dedup, normalize,
	scoring::{ScoreBreakdown, ScoredCandidate},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
	pub keyword: String,
	pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
	#[serde(rename = "type")]
	pub kind: SuggestionKind,
	pub text: String,
	pub source: CandidateSource,
	pub entity_id: Option<Uuid>,
	pub position: u32,
	pub scores: ScoreBreakdown,
}
impl SuggestionItem {
	fn from_ranked(position: u32, ranked: ScoredCandidate) -> Self {
		let ScoredCandidate { candidate, scores } = ranked;

		Self {
			kind: candidate.kind(),
			text: candidate.text().to_string(),
			source: candidate.source(),
			entity_id: candidate.entity_id(),
			position,
			scores,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
	pub keyword: String,
	pub suggestions: Vec<SuggestionItem>,
}

impl SearchService {
	pub async fn suggestions(&self, req: SuggestionsRequest) -> Result<SuggestionsResponse> {
		let normalized = normalize::normalize_keyword(&req.keyword);

		if normalized.is_empty() {
			return Ok(SuggestionsResponse { keyword: req.keyword, suggestions: Vec::new() });
		}

		let generated = candidates::generate(self, &normalized, req.user_id).await;
		let scored = ranking::rank(
			self,
			generated.candidates,
			&normalized,
			req.user_id,
			&generated.trending,
		)
		.await;
		let mut deduped = dedup::dedup_by_text(scored);

		deduped.truncate(self.cfg.suggestions.max_results as usize);

		let suggestions: Vec<SuggestionItem> = deduped
			.into_iter()
			.zip(0_u32..)
			.map(|(ranked, position)| SuggestionItem::from_ranked(position, ranked))
			.collect();

		self.spawn_impressions(&req.keyword, &normalized, req.user_id, &suggestions);

		Ok(SuggestionsResponse { keyword: req.keyword, suggestions })
	}

	fn spawn_impressions(
		&self,
		keyword: &str,
		normalized: &str,
		user_id: Option<Uuid>,
		suggestions: &[SuggestionItem],
	) {
		if suggestions.is_empty() {
			return;
		}

		let records: Vec<ImpressionRecord> = suggestions
			.iter()
			.map(|item| ImpressionRecord {
				user_id,
				keyword: keyword.to_string(),
				normalized_keyword: normalized.to_string(),
				suggestion: item.text.clone(),
				kind: item.kind,
				entity_id: item.entity_id,
				position: i32::try_from(item.position).unwrap_or(i32::MAX),
			})
			.collect();
		let activity = self.stores.activity.clone();

		tokio::spawn(async move {
			if let Err(err) = activity.insert_impressions(&records).await {
				tracing::warn!(
					error = %err,
					count = records.len(),
					"Failed to log suggestion impressions."
				);
			}
		});
	}
}
