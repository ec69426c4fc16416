//! Write paths and single-record reads: committed searches, clicks, trending, entity detail.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{ClickRecord, Error, Result, SearchCommit, SearchService};
use wsearch_domain::{candidate::SuggestionKind, entity::Entity, normalize};

const MAX_TRENDING_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInputRequest {
	#[serde(default)]
	pub user_id: String,
	#[serde(default)]
	pub keyword: String,
	#[serde(default)]
	pub device: String,
	#[serde(default)]
	pub client_app_version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRequest {
	pub user_id: Option<String>,
	#[serde(default)]
	pub keyword: String,
	#[serde(default)]
	pub suggestion: String,
	#[serde(default)]
	pub suggestion_type: String,
	pub entity_id: Option<String>,
	pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
	pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
	pub id: Uuid,
	pub title: String,
	pub description: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Entity> for EntityDetail {
	fn from(entity: Entity) -> Self {
		Self {
			id: entity.entity_id,
			title: entity.title,
			description: entity.description,
			created_at: entity.created_at,
		}
	}
}

impl SearchService {
	/// Records a committed search in the user's history and bumps the keyword's trending counter.
	pub async fn log_search_input(&self, req: SearchInputRequest) -> Result<()> {
		let Ok(user_id) = Uuid::parse_str(req.user_id.trim()) else {
			return Err(Error::InvalidRequest { message: "userId must be a valid UUID.".to_string() });
		};
		let normalized = normalize::normalize_keyword(&req.keyword);

		if normalized.is_empty() {
			return Err(Error::InvalidRequest { message: "keyword must be non-empty.".to_string() });
		}

		let commit = SearchCommit {
			user_id,
			keyword: req.keyword,
			normalized_keyword: normalized,
			device: req.device,
			client_app_version: req.client_app_version,
		};

		self.stores.activity.insert_history(&commit).await?;

		if let Err(err) = self.stores.trending.increment(&commit.normalized_keyword).await {
			tracing::warn!(
				error = %err,
				keyword = commit.normalized_keyword.as_str(),
				"Failed to increment trending counter."
			);
		}

		Ok(())
	}

	/// Records a click on a rendered suggestion. Malformed ids are stored as absent.
	pub async fn log_click(&self, req: ClickRequest) -> Result<()> {
		let Ok(kind) = req.suggestion_type.parse::<SuggestionKind>() else {
			return Err(Error::InvalidRequest {
				message: "suggestionType must be keyword or entity.".to_string(),
			});
		};

		if req.keyword.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "keyword must be non-empty.".to_string() });
		}
		if req.suggestion.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "suggestion must be non-empty.".to_string(),
			});
		}

		let user_id = crate::parse_optional_id(req.user_id.as_deref());
		let entity_id = crate::parse_optional_id(req.entity_id.as_deref());
		let record = ClickRecord {
			user_id,
			normalized_keyword: normalize::normalize_keyword(&req.keyword),
			keyword: req.keyword,
			clicked_suggestion: req.suggestion,
			kind,
			entity_id,
			position: req.position,
		};

		self.stores.activity.insert_click(&record).await?;

		if kind == SuggestionKind::Entity
			&& let (Some(user_id), Some(entity_id)) = (user_id, entity_id)
			&& let Err(err) = self.stores.activity.mark_history_result(user_id, entity_id).await
		{
			tracing::warn!(error = %err, "Failed to mark search history result.");
		}

		Ok(())
	}

	/// Most popular committed keywords. Store failures degrade to an empty list.
	pub async fn trending(&self, limit: Option<u32>) -> Result<TrendingResponse> {
		let limit = match limit {
			Some(0) | None => self.cfg.trending.default_limit,
			Some(limit) => limit.min(MAX_TRENDING_LIMIT),
		};
		let keywords = match self.stores.trending.top_n(limit).await {
			Ok(rows) => rows.into_iter().map(|row| row.keyword).collect(),
			Err(err) => {
				tracing::warn!(error = %err, "Failed to load trending keywords.");

				Vec::new()
			},
		};

		Ok(TrendingResponse { keywords })
	}

	pub async fn get_entity(&self, raw_id: &str) -> Result<EntityDetail> {
		let Ok(entity_id) = Uuid::parse_str(raw_id.trim()) else {
			return Err(Error::InvalidRequest {
				message: "Entity id must be a valid UUID.".to_string(),
			});
		};
		let Some(entity) = self.stores.entities.get_entity(entity_id).await? else {
			return Err(Error::NotFound { message: format!("Entity {entity_id} does not exist.") });
		};

		Ok(EntityDetail::from(entity))
	}
}
