//! Search history, impression, and click logs.

use sqlx::{PgExecutor, QueryBuilder};
use uuid::Uuid;

use wsearch_domain::{candidate::SuggestionKind, normalize, scoring::CtrStats};

use crate::{
	Result,
	models::{ClickRecord, ImpressionRecord, KeywordFrequency, SearchCommit},
};

/// The user's committed keywords starting with `prefix` inside the trailing window, most frequent
/// first, ties broken by most recent use.
pub async fn history_frequencies<'e, E>(
	executor: E,
	user_id: Uuid,
	prefix: &str,
	window_days: u32,
	limit: u32,
) -> Result<Vec<KeywordFrequency>>
where
	E: PgExecutor<'e>,
{
	let pattern = format!("{}%", normalize::escape_like(prefix));
	let rows = sqlx::query_as(
		"\
SELECT
	normalized_keyword AS keyword,
	count(*) AS frequency,
	max(created_at) AS last_seen_at
FROM search_history
WHERE user_id = $1
	AND normalized_keyword LIKE $2 ESCAPE '\\'
	AND created_at >= now() - make_interval(days => $3)
GROUP BY normalized_keyword
ORDER BY frequency DESC, last_seen_at DESC, keyword
LIMIT $4",
	)
	.bind(user_id)
	.bind(pattern)
	.bind(window_to_i32(window_days))
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Clicks by the user on the entity, made while the typed keyword started with `prefix`.
pub async fn entity_click_count<'e, E>(
	executor: E,
	user_id: Uuid,
	entity_id: Uuid,
	prefix: &str,
	window_days: u32,
) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let pattern = format!("{}%", normalize::escape_like(prefix));
	let count: i64 = sqlx::query_scalar(
		"\
SELECT count(*)
FROM search_clicks
WHERE user_id = $1
	AND entity_id = $2
	AND normalized_keyword LIKE $3 ESCAPE '\\'
	AND created_at >= now() - make_interval(days => $4)",
	)
	.bind(user_id)
	.bind(entity_id)
	.bind(pattern)
	.bind(window_to_i32(window_days))
	.fetch_one(executor)
	.await?;

	Ok(count)
}

/// Impressions and clicks recorded for one display text and kind inside the trailing window.
pub async fn ctr_stats<'e, E>(
	executor: E,
	suggestion: &str,
	kind: SuggestionKind,
	window_days: u32,
) -> Result<CtrStats>
where
	E: PgExecutor<'e>,
{
	let (impressions, clicks): (i64, i64) = sqlx::query_as(
		"\
SELECT
	(
		SELECT count(*)
		FROM search_impressions
		WHERE suggestion = $1
			AND suggestion_type = $2
			AND created_at >= now() - make_interval(days => $3)
	) AS impressions,
	(
		SELECT count(*)
		FROM search_clicks
		WHERE clicked_suggestion = $1
			AND suggestion_type = $2
			AND created_at >= now() - make_interval(days => $3)
	) AS clicks",
	)
	.bind(suggestion)
	.bind(kind.as_str())
	.bind(window_to_i32(window_days))
	.fetch_one(executor)
	.await?;

	Ok(CtrStats { impressions, clicks })
}

pub async fn insert_impressions<'e, E>(executor: E, records: &[ImpressionRecord]) -> Result<()>
where
	E: PgExecutor<'e>,
{
	if records.is_empty() {
		return Ok(());
	}

	let mut builder = QueryBuilder::<sqlx::Postgres>::new(
		"\
INSERT INTO search_impressions (
	user_id,
	keyword,
	normalized_keyword,
	suggestion,
	suggestion_type,
	entity_id,
	position
) ",
	);

	builder.push_values(records, |mut row, record| {
		row.push_bind(record.user_id)
			.push_bind(record.keyword.as_str())
			.push_bind(record.normalized_keyword.as_str())
			.push_bind(record.suggestion.as_str())
			.push_bind(record.kind.as_str())
			.push_bind(record.entity_id)
			.push_bind(record.position);
	});
	builder.build().execute(executor).await?;

	Ok(())
}

pub async fn insert_click<'e, E>(executor: E, record: &ClickRecord) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO search_clicks (
	user_id,
	keyword,
	normalized_keyword,
	clicked_suggestion,
	suggestion_type,
	entity_id,
	position
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(record.user_id)
	.bind(record.keyword.as_str())
	.bind(record.normalized_keyword.as_str())
	.bind(record.clicked_suggestion.as_str())
	.bind(record.kind.as_str())
	.bind(record.entity_id)
	.bind(record.position)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn insert_history<'e, E>(executor: E, commit: &SearchCommit) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO search_history (
	user_id,
	keyword,
	normalized_keyword,
	device,
	client_app_version
)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(commit.user_id)
	.bind(commit.keyword.as_str())
	.bind(commit.normalized_keyword.as_str())
	.bind(commit.device.as_str())
	.bind(commit.client_app_version.as_str())
	.execute(executor)
	.await?;

	Ok(())
}

/// Marks the user's most recent history row as having led to the selected entity. Returns whether
/// a row was updated.
pub async fn mark_history_result<'e, E>(executor: E, user_id: Uuid, entity_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE search_history
SET
	has_result = true,
	selected_entity_id = $2
WHERE id = (
	SELECT id
	FROM search_history
	WHERE user_id = $1
	ORDER BY created_at DESC, id DESC
	LIMIT 1
)",
	)
	.bind(user_id)
	.bind(entity_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

fn window_to_i32(days: u32) -> i32 {
	i32::try_from(days).unwrap_or(i32::MAX)
}
