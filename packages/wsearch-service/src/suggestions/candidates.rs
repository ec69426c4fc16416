use std::{collections::HashMap, future::Future, time::Duration};

use uuid::Uuid;

use crate::{KeywordFrequency, Result, SearchService, TrendingKeyword};
use wsearch_domain::{
	candidate::{Candidate, CandidateSource},
	entity::{EntityMatch, SimilarityStrategy, TitleQuery},
};

pub(super) struct Generated {
	/// Sources A, B, C, D concatenated in that order.
	pub(super) candidates: Vec<Candidate>,
	/// Prefix-filtered trending scores keyed by keyword.
	pub(super) trending: HashMap<String, f64>,
}

pub(super) async fn generate(
	service: &SearchService,
	keyword: &str,
	user_id: Option<Uuid>,
) -> Generated {
	let cfg = &service.cfg.suggestions;
	let limit = cfg.source_limit;
	let budget = Duration::from_millis(cfg.source_timeout_ms);
	let exact_query = TitleQuery::prefix(keyword, limit);
	let fuzzy_query = TitleQuery::similar(
		keyword,
		SimilarityStrategy::Trigram,
		service.cfg.search.fuzzy_threshold,
		limit,
	);
	let (history, trending, exact, fuzzy) = tokio::join!(
		guarded(CandidateSource::UserHistory, budget, user_history(service, keyword, user_id)),
		guarded(
			CandidateSource::Trending,
			budget,
			service.stores.trending.range_by_prefix(keyword, limit),
		),
		guarded(
			CandidateSource::EntityTitleExact,
			budget,
			service.stores.entities.match_titles(&exact_query),
		),
		guarded(
			CandidateSource::EntityTitleFuzzy,
			budget,
			service.stores.entities.match_titles(&fuzzy_query),
		),
	);

	assemble(history, trending, exact, fuzzy)
}

fn assemble(
	history: Vec<KeywordFrequency>,
	trending: Vec<TrendingKeyword>,
	exact: Vec<EntityMatch>,
	fuzzy: Vec<EntityMatch>,
) -> Generated {
	let mut candidates =
		Vec::with_capacity(history.len() + trending.len() + exact.len() + fuzzy.len());
	let mut trending_scores = HashMap::with_capacity(trending.len());

	for row in history {
		candidates.push(Candidate::keyword(row.keyword, CandidateSource::UserHistory));
	}
	for row in trending {
		trending_scores.insert(row.keyword.clone(), row.score);
		candidates.push(Candidate::keyword(row.keyword, CandidateSource::Trending));
	}

	let exact_ids: Vec<Uuid> = exact.iter().map(|m| m.entity.entity_id).collect();

	for m in exact {
		candidates.push(Candidate::entity_exact(m.entity.entity_id, m.entity.title));
	}
	for m in fuzzy {
		if exact_ids.contains(&m.entity.entity_id) {
			continue;
		}

		candidates.push(Candidate::entity_fuzzy(m.entity.entity_id, m.entity.title, m.similarity));
	}

	Generated { candidates, trending: trending_scores }
}

async fn user_history(
	service: &SearchService,
	keyword: &str,
	user_id: Option<Uuid>,
) -> Result<Vec<KeywordFrequency>> {
	let Some(user_id) = user_id else {
		return Ok(Vec::new());
	};
	let cfg = &service.cfg.suggestions;

	service
		.stores
		.activity
		.history_frequencies(user_id, keyword, cfg.history_window_days, cfg.source_limit)
		.await
}

/// Runs one source under the time budget. Failures and timeouts yield no rows.
async fn guarded<T, F>(source: CandidateSource, budget: Duration, fut: F) -> Vec<T>
where
	F: Future<Output = Result<Vec<T>>>,
{
	match tokio::time::timeout(budget, fut).await {
		Ok(Ok(rows)) => rows,
		Ok(Err(err)) => {
			tracing::warn!(source = source.as_str(), error = %err, "Candidate source failed.");

			Vec::new()
		},
		Err(_) => {
			tracing::warn!(
				source = source.as_str(),
				timeout_ms = budget.as_millis() as u64,
				"Candidate source timed out."
			);

			Vec::new()
		},
	}
}
