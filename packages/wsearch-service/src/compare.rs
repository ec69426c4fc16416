//! Side-by-side trigram and bigram title matching.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, SearchService};
use wsearch_domain::{
	entity::{EntityMatch, SimilarityStrategy, TitleQuery},
	normalize, tiers,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
	Trgm,
	Bigram,
	#[default]
	Both,
}
impl CompareMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Trgm => "trgm",
			Self::Bigram => "bigram",
			Self::Both => "both",
		}
	}
}
impl fmt::Display for CompareMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for CompareMode {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"trgm" => Ok(Self::Trgm),
			"bigram" => Ok(Self::Bigram),
			"both" => Ok(Self::Both),
			_ => Err(Error::InvalidRequest {
				message: "mode must be one of trgm, bigram, or both.".to_string(),
			}),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
	pub keyword: String,
	#[serde(default)]
	pub mode: CompareMode,
	/// Absent or zero means the configured default.
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareItem {
	pub id: Uuid,
	pub title: String,
	pub description: String,
	pub score: f64,
}
impl CompareItem {
	fn from_match(m: EntityMatch, max_chars: usize) -> Self {
		Self {
			id: m.entity.entity_id,
			title: m.entity.title,
			description: normalize::truncate_text(&m.entity.description, max_chars),
			score: m.similarity,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
	pub keyword: String,
	pub mode: CompareMode,
	pub trgm_results: Vec<CompareItem>,
	pub bigram_results: Vec<CompareItem>,
}

impl SearchService {
	pub async fn compare(&self, req: CompareRequest) -> Result<CompareResponse> {
		let normalized = normalize::normalize_keyword(&req.keyword);
		let limit = self.compare_limit(req.limit);
		let mut response = CompareResponse {
			keyword: req.keyword,
			mode: req.mode,
			trgm_results: Vec::new(),
			bigram_results: Vec::new(),
		};

		if normalized.is_empty() {
			return Ok(response);
		}

		match req.mode {
			CompareMode::Trgm => {
				response.trgm_results =
					self.single_strategy(&normalized, SimilarityStrategy::Trigram, limit).await?;
			},
			CompareMode::Bigram => {
				response.bigram_results =
					self.single_strategy(&normalized, SimilarityStrategy::Bigram, limit).await?;
			},
			CompareMode::Both => {
				let (trgm, bigram) = tokio::try_join!(
					self.single_strategy(&normalized, SimilarityStrategy::Trigram, limit),
					self.single_strategy(&normalized, SimilarityStrategy::Bigram, limit),
				)?;

				response.trgm_results = trgm;
				response.bigram_results = bigram;
			},
		}

		Ok(response)
	}

	fn compare_limit(&self, requested: Option<u32>) -> u32 {
		let cfg = &self.cfg.compare;

		match requested {
			Some(0) | None => cfg.default_limit,
			Some(limit) => limit.min(cfg.max_limit),
		}
	}

	async fn single_strategy(
		&self,
		keyword: &str,
		strategy: SimilarityStrategy,
		limit: u32,
	) -> Result<Vec<CompareItem>> {
		let threshold = self.cfg.search.fuzzy_threshold;
		let query = match strategy {
			SimilarityStrategy::Trigram => TitleQuery::similar(keyword, strategy, threshold, limit),
			// Containment only; zero-score bigram matches are kept.
			SimilarityStrategy::Bigram => TitleQuery::similar(keyword, strategy, 0.0, limit),
		};
		let mut matches = self.stores.entities.match_titles(&query).await?;

		if strategy == SimilarityStrategy::Trigram {
			matches.retain(|m| m.similarity > threshold);
		}

		tiers::sort_by_similarity(&mut matches);
		matches.truncate(limit as usize);

		let max_chars = self.cfg.search.description_max_chars as usize;

		Ok(matches.into_iter().map(|m| CompareItem::from_match(m, max_chars)).collect())
	}
}
