use std::collections::HashMap;

use uuid::Uuid;

use crate::SearchService;
use wsearch_domain::{
	candidate::{Candidate, SuggestionKind},
	scoring::{self, CtrStats, ScoreInputs, ScoreWeights, ScoredCandidate},
};

/// Scores every candidate and sorts by final score. Lookup failures only zero the affected
/// component; no candidate is dropped.
pub(super) async fn rank(
	service: &SearchService,
	candidates: Vec<Candidate>,
	keyword: &str,
	user_id: Option<Uuid>,
	trending: &HashMap<String, f64>,
) -> Vec<ScoredCandidate> {
	let weights = ScoreWeights::from(&service.cfg.ranking);
	let history = personal_history(service, keyword, user_id).await;
	let mut scored = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		let key = candidate.text().to_lowercase();
		let personal_count = match (candidate.kind(), user_id) {
			(SuggestionKind::Keyword, Some(_)) => history.get(&key).copied().unwrap_or(0),
			(SuggestionKind::Entity, Some(user_id)) =>
				entity_clicks(service, user_id, &candidate, keyword).await,
			(_, None) => 0,
		};
		let trending_score = match candidate.kind() {
			SuggestionKind::Keyword => trending.get(&key).copied().unwrap_or(0.0),
			SuggestionKind::Entity => 0.0,
		};
		let ctr = ctr_stats(service, &candidate).await;
		let inputs = ScoreInputs { personal_count, trending: trending_score, ctr };
		let scores = scoring::score_candidate(&candidate, keyword, &inputs, &weights);

		scored.push(ScoredCandidate { candidate, scores });
	}

	scoring::sort_by_final_score(&mut scored);

	scored
}

/// The user's keyword frequencies, fetched once per ranking pass.
async fn personal_history(
	service: &SearchService,
	keyword: &str,
	user_id: Option<Uuid>,
) -> HashMap<String, i64> {
	let Some(user_id) = user_id else {
		return HashMap::new();
	};
	let window_days = service.cfg.suggestions.history_window_days;
	let limit = service.cfg.ranking.personal_history_limit;

	match service.stores.activity.history_frequencies(user_id, keyword, window_days, limit).await {
		Ok(rows) => rows.into_iter().map(|row| (row.keyword.to_lowercase(), row.frequency)).collect(),
		Err(err) => {
			tracing::warn!(error = %err, "Failed to load personal history for ranking.");

			HashMap::new()
		},
	}
}

async fn entity_clicks(
	service: &SearchService,
	user_id: Uuid,
	candidate: &Candidate,
	keyword: &str,
) -> i64 {
	let Some(entity_id) = candidate.entity_id() else {
		return 0;
	};
	let window_days = service.cfg.suggestions.history_window_days;

	match service
		.stores
		.activity
		.entity_click_count(user_id, entity_id, keyword, window_days)
		.await
	{
		Ok(count) => count,
		Err(err) => {
			tracing::warn!(error = %err, entity_id = %entity_id, "Failed to count entity clicks.");

			0
		},
	}
}

async fn ctr_stats(service: &SearchService, candidate: &Candidate) -> CtrStats {
	let window_days = service.cfg.ranking.ctr_window_days;

	match service.stores.activity.ctr_stats(candidate.text(), candidate.kind(), window_days).await {
		Ok(stats) => stats,
		Err(err) => {
			tracing::warn!(
				error = %err,
				suggestion = candidate.text(),
				"Failed to load click-through stats."
			);

			CtrStats::default()
		},
	}
}
