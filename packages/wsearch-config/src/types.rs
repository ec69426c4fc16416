use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub suggestions: Suggestions,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub compare: Compare,
	#[serde(default)]
	pub trending: Trending,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Candidate generation and assembly limits for the autocomplete path.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	/// Suggestions returned after dedup.
	pub max_results: u32,
	/// Cap applied to each of the four candidate sources.
	pub source_limit: u32,
	/// Trailing window for personal history and entity click lookups.
	pub history_window_days: u32,
	/// A source that does not answer within this budget contributes nothing.
	pub source_timeout_ms: u64,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { max_results: 10, source_limit: 10, history_window_days: 30, source_timeout_ms: 800 }
	}
}

/// Weights of the five score components.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub prefix_weight: f64,
	pub contains_weight: f64,
	pub personal_weight: f64,
	pub trending_weight: f64,
	pub fuzzy_weight: f64,
	pub ctr_weight: f64,
	pub ctr_window_days: u32,
	pub personal_history_limit: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			prefix_weight: 100.0,
			contains_weight: 50.0,
			personal_weight: 20.0,
			trending_weight: 1.0,
			fuzzy_weight: 10.0,
			ctr_weight: 50.0,
			ctr_window_days: 7,
			personal_history_limit: 100,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Trigram similarity floor for fuzzy title matches. Kept low so short keywords still recall.
	pub fuzzy_threshold: f64,
	pub results_limit: u32,
	pub description_max_chars: u32,
	/// Skip lower tiers once higher tiers already fill the limit.
	pub skip_satisfied_tiers: bool,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			fuzzy_threshold: 0.1,
			results_limit: 20,
			description_max_chars: 200,
			skip_satisfied_tiers: true,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Compare {
	pub default_limit: u32,
	pub max_limit: u32,
}
impl Default for Compare {
	fn default() -> Self {
		Self { default_limit: 20, max_limit: 100 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Trending {
	pub default_limit: u32,
}
impl Default for Trending {
	fn default() -> Self {
		Self { default_limit: 10 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
