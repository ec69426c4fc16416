mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Compare, Config, Postgres, Ranking, Search, Security, Service, Storage, Suggestions, Trending,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("suggestions.max_results", cfg.suggestions.max_results),
		("suggestions.source_limit", cfg.suggestions.source_limit),
		("suggestions.history_window_days", cfg.suggestions.history_window_days),
		("ranking.ctr_window_days", cfg.ranking.ctr_window_days),
		("ranking.personal_history_limit", cfg.ranking.personal_history_limit),
		("search.results_limit", cfg.search.results_limit),
		("compare.default_limit", cfg.compare.default_limit),
		("compare.max_limit", cfg.compare.max_limit),
		("trending.default_limit", cfg.trending.default_limit),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.suggestions.source_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "suggestions.source_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.prefix_weight", cfg.ranking.prefix_weight),
		("ranking.contains_weight", cfg.ranking.contains_weight),
		("ranking.personal_weight", cfg.ranking.personal_weight),
		("ranking.trending_weight", cfg.ranking.trending_weight),
		("ranking.fuzzy_weight", cfg.ranking.fuzzy_weight),
		("ranking.ctr_weight", cfg.ranking.ctr_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if !cfg.search.fuzzy_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.fuzzy_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..1.0).contains(&cfg.search.fuzzy_threshold) {
		return Err(Error::Validation {
			message: "search.fuzzy_threshold must be in the range 0.0-1.0 (exclusive of 1.0)."
				.to_string(),
		});
	}
	if cfg.search.description_max_chars < 4 {
		return Err(Error::Validation {
			message: "search.description_max_chars must be at least 4.".to_string(),
		});
	}
	if cfg.compare.default_limit > cfg.compare.max_limit {
		return Err(Error::Validation {
			message: "compare.default_limit must not exceed compare.max_limit.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	cfg.service.log_level = if level.is_empty() { "info".to_string() } else { level.to_string() };
}
