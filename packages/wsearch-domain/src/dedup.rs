use std::collections::HashMap;

use crate::scoring::ScoredCandidate;

/// Collapses candidates whose texts are equal ignoring case.
///
/// The first occurrence keeps its slot. A later duplicate replaces the kept entry in that slot only
/// when its final score is strictly higher. Input is expected to be sorted by final score already,
/// so in practice the first occurrence wins.
pub fn dedup_by_text(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
	let mut slots: HashMap<String, usize> = HashMap::with_capacity(scored.len());
	let mut out: Vec<ScoredCandidate> = Vec::with_capacity(scored.len());

	for item in scored {
		let key = item.candidate.text().to_lowercase();

		match slots.get(&key) {
			Some(&idx) => {
				if item.scores.final_score > out[idx].scores.final_score {
					out[idx] = item;
				}
			},
			None => {
				slots.insert(key, out.len());
				out.push(item);
			},
		}
	}

	out
}
