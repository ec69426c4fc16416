use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
	Keyword,
	Entity,
}
impl SuggestionKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Keyword => "keyword",
			Self::Entity => "entity",
		}
	}
}
impl fmt::Display for SuggestionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SuggestionKind {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"keyword" => Ok(Self::Keyword),
			"entity" => Ok(Self::Entity),
			other => Err(format!("Unknown suggestion kind {other:?}.")),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
	UserHistory,
	Trending,
	EntityTitleExact,
	EntityTitleFuzzy,
}
impl CandidateSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::UserHistory => "user_history",
			Self::Trending => "trending",
			Self::EntityTitleExact => "entity_title_exact",
			Self::EntityTitleFuzzy => "entity_title_fuzzy",
		}
	}

	/// Only fuzzy-sourced candidates carry a similarity that feeds the fuzzy score.
	pub fn is_fuzzy(self) -> bool {
		matches!(self, Self::EntityTitleFuzzy)
	}
}

/// An unranked suggestion proposal.
///
/// Fields are private so an entity reference exists exactly when the kind is
/// [`SuggestionKind::Entity`].
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	kind: SuggestionKind,
	text: String,
	source: CandidateSource,
	entity_id: Option<Uuid>,
	similarity: f64,
}
impl Candidate {
	pub fn keyword(text: impl Into<String>, source: CandidateSource) -> Self {
		Self { kind: SuggestionKind::Keyword, text: text.into(), source, entity_id: None, similarity: 0.0 }
	}

	/// Prefix-matched entity; similarity is fixed at 1.0.
	pub fn entity_exact(entity_id: Uuid, title: impl Into<String>) -> Self {
		Self {
			kind: SuggestionKind::Entity,
			text: title.into(),
			source: CandidateSource::EntityTitleExact,
			entity_id: Some(entity_id),
			similarity: 1.0,
		}
	}

	pub fn entity_fuzzy(entity_id: Uuid, title: impl Into<String>, similarity: f64) -> Self {
		let similarity = if similarity.is_finite() { similarity.clamp(0.0, 1.0) } else { 0.0 };

		Self {
			kind: SuggestionKind::Entity,
			text: title.into(),
			source: CandidateSource::EntityTitleFuzzy,
			entity_id: Some(entity_id),
			similarity,
		}
	}

	pub fn kind(&self) -> SuggestionKind {
		self.kind
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn source(&self) -> CandidateSource {
		self.source
	}

	pub fn entity_id(&self) -> Option<Uuid> {
		self.entity_id
	}

	pub fn similarity(&self) -> f64 {
		self.similarity
	}
}
