use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalize;

/// A searchable content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
	pub entity_id: Uuid,
	pub title: String,
	pub description: String,
	pub created_at: OffsetDateTime,
}

/// An entity returned by a title query, with the similarity the query assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
	pub entity: Entity,
	pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityStrategy {
	/// `pg_trgm` trigram similarity.
	Trigram,
	/// `pg_bigm` bigram similarity over titles containing the keyword. Better recall for short
	/// CJK keywords.
	Bigram,
}

/// How a title query matches the keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TitleMatch {
	/// Lowercased title starts with the keyword.
	Prefix,
	/// Trigram similarity strictly above `threshold`. Bigram matches every title containing the
	/// keyword and only reports the score, so `threshold` is not applied.
	Similar { strategy: SimilarityStrategy, threshold: f64 },
	/// Lowercased title contains the keyword anywhere.
	Substring,
}

/// A bounded title lookup. `keyword` is expected to be normalized; LIKE wildcards are escaped by
/// the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleQuery {
	pub keyword: String,
	pub mode: TitleMatch,
	pub exclude: Vec<Uuid>,
	pub limit: u32,
}
impl TitleQuery {
	pub fn prefix(keyword: impl Into<String>, limit: u32) -> Self {
		Self { keyword: keyword.into(), mode: TitleMatch::Prefix, exclude: Vec::new(), limit }
	}

	pub fn similar(
		keyword: impl Into<String>,
		strategy: SimilarityStrategy,
		threshold: f64,
		limit: u32,
	) -> Self {
		Self {
			keyword: keyword.into(),
			mode: TitleMatch::Similar { strategy, threshold },
			exclude: Vec::new(),
			limit,
		}
	}

	pub fn substring(keyword: impl Into<String>, limit: u32) -> Self {
		Self { keyword: keyword.into(), mode: TitleMatch::Substring, exclude: Vec::new(), limit }
	}

	pub fn excluding(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
		self.exclude.extend(ids);

		self
	}

	/// LIKE pattern for prefix and substring modes.
	pub fn like_pattern(&self) -> Option<String> {
		let escaped = normalize::escape_like(&self.keyword);

		match self.mode {
			TitleMatch::Prefix => Some(format!("{escaped}%")),
			TitleMatch::Substring => Some(format!("%{escaped}%")),
			TitleMatch::Similar { .. } => None,
		}
	}

	/// Applies the match mode to a title in memory, mirroring the SQL predicates for the LIKE modes.
	/// Similarity modes cannot be evaluated without the database and always return `false`.
	pub fn matches_title(&self, title: &str) -> bool {
		let lowered = title.to_lowercase();

		match self.mode {
			TitleMatch::Prefix => lowered.starts_with(&self.keyword),
			TitleMatch::Substring => lowered.contains(&self.keyword),
			TitleMatch::Similar { .. } => false,
		}
	}
}
