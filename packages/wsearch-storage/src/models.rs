use time::OffsetDateTime;
use uuid::Uuid;

use wsearch_domain::{
	candidate::SuggestionKind,
	entity::{Entity, EntityMatch},
};

#[derive(Debug, sqlx::FromRow)]
pub struct EntityRow {
	pub entity_id: Uuid,
	pub title: String,
	pub description: String,
	pub created_at: OffsetDateTime,
	pub similarity: f64,
}
impl From<EntityRow> for EntityMatch {
	fn from(row: EntityRow) -> Self {
		Self {
			entity: Entity {
				entity_id: row.entity_id,
				title: row.title,
				description: row.description,
				created_at: row.created_at,
			},
			similarity: row.similarity,
		}
	}
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KeywordFrequency {
	pub keyword: String,
	pub frequency: i64,
	pub last_seen_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TrendingKeyword {
	pub keyword: String,
	pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpressionRecord {
	pub user_id: Option<Uuid>,
	pub keyword: String,
	pub normalized_keyword: String,
	pub suggestion: String,
	pub kind: SuggestionKind,
	pub entity_id: Option<Uuid>,
	pub position: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickRecord {
	pub user_id: Option<Uuid>,
	pub keyword: String,
	pub normalized_keyword: String,
	pub clicked_suggestion: String,
	pub kind: SuggestionKind,
	pub entity_id: Option<Uuid>,
	pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCommit {
	pub user_id: Uuid,
	pub keyword: String,
	pub normalized_keyword: String,
	pub device: String,
	pub client_app_version: String,
}
