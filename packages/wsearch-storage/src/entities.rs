use sqlx::PgExecutor;
use uuid::Uuid;

use wsearch_domain::entity::{Entity, EntityMatch, SimilarityStrategy, TitleMatch, TitleQuery};

use crate::{Error, Result, models::EntityRow};

/// Runs one title lookup. Rows come back in the order the oracle ranks them: prefix and substring
/// modes by recency, similarity modes by score.
pub async fn match_titles<'e, E>(executor: E, query: &TitleQuery) -> Result<Vec<EntityMatch>>
where
	E: PgExecutor<'e>,
{
	if query.limit == 0 {
		return Ok(Vec::new());
	}

	let limit = i64::from(query.limit);
	let rows: Vec<EntityRow> = match query.mode {
		TitleMatch::Prefix | TitleMatch::Substring => {
			let Some(pattern) = query.like_pattern() else {
				return Err(Error::InvalidArgument("Title query has no LIKE pattern.".to_string()));
			};
			let similarity = if matches!(query.mode, TitleMatch::Prefix) { 1.0 } else { 0.5 };

			sqlx::query_as(
				"\
SELECT
	entity_id,
	title,
	description,
	created_at,
	$4::float8 AS similarity
FROM entities
WHERE lower(title) LIKE $1 ESCAPE '\\'
	AND NOT (entity_id = ANY($2))
ORDER BY created_at DESC, entity_id
LIMIT $3",
			)
			.bind(pattern)
			.bind(query.exclude.as_slice())
			.bind(limit)
			.bind(similarity)
			.fetch_all(executor)
			.await?
		},
		TitleMatch::Similar { strategy: SimilarityStrategy::Trigram, threshold } =>
			sqlx::query_as(
				"\
SELECT
	entity_id,
	title,
	description,
	created_at,
	similarity(lower(title), $1)::float8 AS similarity
FROM entities
WHERE similarity(lower(title), $1) > $4
	AND NOT (entity_id = ANY($2))
ORDER BY similarity DESC, created_at DESC, entity_id
LIMIT $3",
			)
			.bind(query.keyword.as_str())
			.bind(query.exclude.as_slice())
			.bind(limit)
			.bind(threshold as f32)
			.fetch_all(executor)
			.await?,
		// Containment is the only filter; a zero score still counts as a match because pg_bigm
		// pads with spaces and a single character inside a word shares no bigram with the title.
		TitleMatch::Similar { strategy: SimilarityStrategy::Bigram, .. } =>
			sqlx::query_as(
				"\
SELECT
	entity_id,
	title,
	description,
	created_at,
	bigm_similarity(lower(title), $1)::float8 AS similarity
FROM entities
WHERE lower(title) LIKE likequery($1)
	AND NOT (entity_id = ANY($2))
ORDER BY similarity DESC, created_at DESC, entity_id
LIMIT $3",
			)
			.bind(query.keyword.as_str())
			.bind(query.exclude.as_slice())
			.bind(limit)
			.fetch_all(executor)
			.await?,
	};

	Ok(rows.into_iter().map(EntityMatch::from).collect())
}

pub async fn get_entity<'e, E>(executor: E, entity_id: Uuid) -> Result<Option<Entity>>
where
	E: PgExecutor<'e>,
{
	let row: Option<EntityRow> = sqlx::query_as(
		"\
SELECT
	entity_id,
	title,
	description,
	created_at,
	1.0::float8 AS similarity
FROM entities
WHERE entity_id = $1",
	)
	.bind(entity_id)
	.fetch_optional(executor)
	.await?;

	Ok(row.map(|row| EntityMatch::from(row).entity))
}

pub async fn insert_entity<'e, E>(executor: E, entity: &Entity) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO entities (entity_id, title, description, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (entity_id) DO UPDATE
SET
	title = EXCLUDED.title,
	description = EXCLUDED.description",
	)
	.bind(entity.entity_id)
	.bind(entity.title.as_str())
	.bind(entity.description.as_str())
	.bind(entity.created_at)
	.execute(executor)
	.await?;

	Ok(())
}
