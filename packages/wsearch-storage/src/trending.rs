//! Trending keyword counters.
//!
//! One row per normalized keyword. The counter only moves through [`increment`], which is a
//! single atomic upsert.

use sqlx::PgExecutor;

use wsearch_domain::normalize;

use crate::{Result, models::TrendingKeyword};

/// Adds one to the keyword's counter, creating it at 1 if absent, and returns the new score.
pub async fn increment<'e, E>(executor: E, keyword: &str) -> Result<f64>
where
	E: PgExecutor<'e>,
{
	let score: f64 = sqlx::query_scalar(
		"\
INSERT INTO trending_keywords (keyword, score, updated_at)
VALUES ($1, 1, now())
ON CONFLICT (keyword) DO UPDATE
SET
	score = trending_keywords.score + 1,
	updated_at = now()
RETURNING score",
	)
	.bind(keyword)
	.fetch_one(executor)
	.await?;

	Ok(score)
}

pub async fn top_n<'e, E>(executor: E, limit: u32) -> Result<Vec<TrendingKeyword>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as(
		"\
SELECT keyword, score
FROM trending_keywords
ORDER BY score DESC, keyword
LIMIT $1",
	)
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn range_by_prefix<'e, E>(
	executor: E,
	prefix: &str,
	limit: u32,
) -> Result<Vec<TrendingKeyword>>
where
	E: PgExecutor<'e>,
{
	let pattern = format!("{}%", normalize::escape_like(prefix));
	let rows = sqlx::query_as(
		"\
SELECT keyword, score
FROM trending_keywords
WHERE keyword LIKE $1 ESCAPE '\\'
ORDER BY score DESC, keyword
LIMIT $2",
	)
	.bind(pattern)
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
