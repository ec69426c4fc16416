//! Three-tier result merging for the full search page.

use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityMatch};

/// Similarity reported for substring-tier hits.
pub const SUBSTRING_SIMILARITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
	Prefix = 1,
	Fuzzy = 2,
	Substring = 3,
}
impl MatchTier {
	pub fn rank(self) -> u8 {
		self as u8
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TieredHit {
	pub entity: Entity,
	pub similarity: f64,
	pub tier: MatchTier,
}

/// Merges the three tier lists into one ranked page.
///
/// An entity appears once, in the best tier that matched it. Fuzzy hits at or below
/// `fuzzy_floor` are dropped. Prefix hits report similarity 1.0 and substring hits
/// [`SUBSTRING_SIMILARITY`]. The page is ordered by tier, then similarity descending, then
/// creation time descending, then entity id.
pub fn merge_tiers(
	prefix: Vec<EntityMatch>,
	fuzzy: Vec<EntityMatch>,
	substring: Vec<EntityMatch>,
	fuzzy_floor: f64,
	limit: usize,
) -> Vec<TieredHit> {
	let mut seen = HashSet::new();
	let mut hits = Vec::with_capacity(prefix.len() + fuzzy.len() + substring.len());

	for m in prefix {
		if seen.insert(m.entity.entity_id) {
			hits.push(TieredHit { entity: m.entity, similarity: 1.0, tier: MatchTier::Prefix });
		}
	}
	for m in fuzzy {
		if !(m.similarity > fuzzy_floor) {
			continue;
		}
		if seen.insert(m.entity.entity_id) {
			hits.push(TieredHit {
				entity: m.entity,
				similarity: m.similarity,
				tier: MatchTier::Fuzzy,
			});
		}
	}
	for m in substring {
		if seen.insert(m.entity.entity_id) {
			hits.push(TieredHit {
				entity: m.entity,
				similarity: SUBSTRING_SIMILARITY,
				tier: MatchTier::Substring,
			});
		}
	}

	hits.sort_by(|a, b| {
		a.tier
			.cmp(&b.tier)
			.then_with(|| b.similarity.total_cmp(&a.similarity))
			.then_with(|| by_recency_then_id(&a.entity, &b.entity))
	});
	hits.truncate(limit);

	hits
}

/// Orders similarity matches by score descending, then creation time descending, then entity id.
pub fn sort_by_similarity(matches: &mut [EntityMatch]) {
	matches.sort_by(|a, b| {
		b.similarity.total_cmp(&a.similarity).then_with(|| by_recency_then_id(&a.entity, &b.entity))
	});
}

fn by_recency_then_id(a: &Entity, b: &Entity) -> Ordering {
	b.created_at.cmp(&a.created_at).then_with(|| a.entity_id.cmp(&b.entity_id))
}
