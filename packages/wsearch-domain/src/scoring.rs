//! Five-component suggestion scoring.
//!
//! `final = prefix + personal + trending + fuzzy + ctr`, every component non-negative.

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, SuggestionKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
	pub prefix: f64,
	pub contains: f64,
	pub personal: f64,
	pub trending: f64,
	pub fuzzy: f64,
	pub ctr: f64,
}
impl From<&wsearch_config::Ranking> for ScoreWeights {
	fn from(cfg: &wsearch_config::Ranking) -> Self {
		Self {
			prefix: cfg.prefix_weight,
			contains: cfg.contains_weight,
			personal: cfg.personal_weight,
			trending: cfg.trending_weight,
			fuzzy: cfg.fuzzy_weight,
			ctr: cfg.ctr_weight,
		}
	}
}
impl Default for ScoreWeights {
	fn default() -> Self {
		Self::from(&wsearch_config::Ranking::default())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CtrStats {
	pub impressions: i64,
	pub clicks: i64,
}
impl CtrStats {
	pub fn rate(self) -> Option<f64> {
		if self.impressions <= 0 {
			return None;
		}

		Some(self.clicks.max(0) as f64 / self.impressions as f64)
	}
}

/// Per-candidate lookups gathered by the ranking pass. Missing data is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
	/// History frequency for keywords, click count for entities.
	pub personal_count: i64,
	pub trending: f64,
	pub ctr: CtrStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
	pub prefix_score: f64,
	pub personal_score: f64,
	pub trending_score: f64,
	pub fuzzy_score: f64,
	pub ctr_score: f64,
	pub final_score: f64,
}
impl ScoreBreakdown {
	pub fn from_components(prefix: f64, personal: f64, trending: f64, fuzzy: f64, ctr: f64) -> Self {
		let prefix_score = non_negative(prefix);
		let personal_score = non_negative(personal);
		let trending_score = non_negative(trending);
		let fuzzy_score = non_negative(fuzzy);
		let ctr_score = non_negative(ctr);
		let final_score = prefix_score + personal_score + trending_score + fuzzy_score + ctr_score;

		Self { prefix_score, personal_score, trending_score, fuzzy_score, ctr_score, final_score }
	}

	pub fn component_sum(&self) -> f64 {
		self.prefix_score + self.personal_score + self.trending_score + self.fuzzy_score + self.ctr_score
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
	pub candidate: Candidate,
	pub scores: ScoreBreakdown,
}

/// `prefix` weight when the lowercased text starts with the keyword, `contains` weight when the
/// keyword appears later, zero otherwise. `keyword` must already be normalized.
pub fn prefix_score(text: &str, keyword: &str, weights: &ScoreWeights) -> f64 {
	let lowered = text.to_lowercase();

	if lowered.starts_with(keyword) {
		weights.prefix
	} else if lowered.contains(keyword) {
		weights.contains
	} else {
		0.0
	}
}

pub fn score_candidate(
	candidate: &Candidate,
	keyword: &str,
	inputs: &ScoreInputs,
	weights: &ScoreWeights,
) -> ScoreBreakdown {
	let prefix = prefix_score(candidate.text(), keyword, weights);
	let personal = inputs.personal_count.max(0) as f64 * weights.personal;
	let trending = match candidate.kind() {
		SuggestionKind::Keyword => inputs.trending * weights.trending,
		SuggestionKind::Entity => 0.0,
	};
	let fuzzy = if candidate.source().is_fuzzy() {
		candidate.similarity() * weights.fuzzy
	} else {
		0.0
	};
	let ctr = inputs.ctr.rate().map(|rate| rate * weights.ctr).unwrap_or(0.0);

	ScoreBreakdown::from_components(prefix, personal, trending, fuzzy, ctr)
}

/// Sorts by final score, highest first. The sort is stable, so equal scores keep the candidate
/// generation order.
pub fn sort_by_final_score(scored: &mut [ScoredCandidate]) {
	scored.sort_by(|a, b| b.scores.final_score.total_cmp(&a.scores.final_score));
}

fn non_negative(value: f64) -> f64 {
	if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
