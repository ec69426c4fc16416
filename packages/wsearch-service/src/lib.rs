pub mod compare;
pub mod ingest;
pub mod results;
pub mod suggestions;
pub mod time_serde;

mod error;

pub use compare::{CompareItem, CompareMode, CompareRequest, CompareResponse};
pub use error::{Error, Result};
pub use ingest::{ClickRequest, EntityDetail, SearchInputRequest, TrendingResponse};
pub use results::{EntityCard, SearchResultsRequest, SearchResultsResponse};
pub use suggestions::{SuggestionItem, SuggestionsRequest, SuggestionsResponse};
pub use wsearch_storage::models::{
	ClickRecord, ImpressionRecord, KeywordFrequency, SearchCommit, TrendingKeyword,
};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use wsearch_config::Config;
use wsearch_domain::{
	candidate::SuggestionKind,
	entity::{Entity, EntityMatch, TitleQuery},
	scoring::CtrStats,
};
use wsearch_storage::{activity, db::Db, entities, trending};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Title lookups against the entity catalog. Prefix, similarity, and substring matching are
/// delegated to the backing store.
pub trait EntityIndex
where
	Self: Send + Sync,
{
	fn match_titles<'a>(&'a self, query: &'a TitleQuery) -> BoxFuture<'a, Result<Vec<EntityMatch>>>;

	fn get_entity<'a>(&'a self, entity_id: Uuid) -> BoxFuture<'a, Result<Option<Entity>>>;
}

/// Global keyword popularity counters.
pub trait TrendingStore
where
	Self: Send + Sync,
{
	fn increment<'a>(&'a self, keyword: &'a str) -> BoxFuture<'a, Result<f64>>;

	fn top_n<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<TrendingKeyword>>>;

	fn range_by_prefix<'a>(
		&'a self,
		prefix: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<TrendingKeyword>>>;
}

/// Per-user search history plus impression and click logs.
pub trait ActivityStore
where
	Self: Send + Sync,
{
	fn history_frequencies<'a>(
		&'a self,
		user_id: Uuid,
		prefix: &'a str,
		window_days: u32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<KeywordFrequency>>>;

	fn entity_click_count<'a>(
		&'a self,
		user_id: Uuid,
		entity_id: Uuid,
		prefix: &'a str,
		window_days: u32,
	) -> BoxFuture<'a, Result<i64>>;

	fn ctr_stats<'a>(
		&'a self,
		suggestion: &'a str,
		kind: SuggestionKind,
		window_days: u32,
	) -> BoxFuture<'a, Result<CtrStats>>;

	fn insert_impressions<'a>(&'a self, records: &'a [ImpressionRecord])
	-> BoxFuture<'a, Result<()>>;

	fn insert_click<'a>(&'a self, record: &'a ClickRecord) -> BoxFuture<'a, Result<()>>;

	fn insert_history<'a>(&'a self, commit: &'a SearchCommit) -> BoxFuture<'a, Result<()>>;

	fn mark_history_result<'a>(
		&'a self,
		user_id: Uuid,
		entity_id: Uuid,
	) -> BoxFuture<'a, Result<bool>>;
}

#[derive(Clone)]
pub struct Stores {
	pub entities: Arc<dyn EntityIndex>,
	pub trending: Arc<dyn TrendingStore>,
	pub activity: Arc<dyn ActivityStore>,
}
impl Stores {
	pub fn new(
		entities: Arc<dyn EntityIndex>,
		trending: Arc<dyn TrendingStore>,
		activity: Arc<dyn ActivityStore>,
	) -> Self {
		Self { entities, trending, activity }
	}

	/// All three seams backed by one Postgres pool.
	pub fn postgres(db: Db) -> Self {
		let stores = Arc::new(PostgresStores { db });

		Self { entities: stores.clone(), trending: stores.clone(), activity: stores }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub stores: Stores,
}
impl SearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, stores: Stores::postgres(db) }
	}

	pub fn with_stores(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores }
	}
}

struct PostgresStores {
	db: Db,
}

impl EntityIndex for PostgresStores {
	fn match_titles<'a>(&'a self, query: &'a TitleQuery) -> BoxFuture<'a, Result<Vec<EntityMatch>>> {
		Box::pin(async move { Ok(entities::match_titles(&self.db.pool, query).await?) })
	}

	fn get_entity<'a>(&'a self, entity_id: Uuid) -> BoxFuture<'a, Result<Option<Entity>>> {
		Box::pin(async move { Ok(entities::get_entity(&self.db.pool, entity_id).await?) })
	}
}

impl TrendingStore for PostgresStores {
	fn increment<'a>(&'a self, keyword: &'a str) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move { Ok(trending::increment(&self.db.pool, keyword).await?) })
	}

	fn top_n<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<TrendingKeyword>>> {
		Box::pin(async move { Ok(trending::top_n(&self.db.pool, limit).await?) })
	}

	fn range_by_prefix<'a>(
		&'a self,
		prefix: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<TrendingKeyword>>> {
		Box::pin(async move { Ok(trending::range_by_prefix(&self.db.pool, prefix, limit).await?) })
	}
}

impl ActivityStore for PostgresStores {
	fn history_frequencies<'a>(
		&'a self,
		user_id: Uuid,
		prefix: &'a str,
		window_days: u32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<KeywordFrequency>>> {
		Box::pin(async move {
			Ok(activity::history_frequencies(&self.db.pool, user_id, prefix, window_days, limit)
				.await?)
		})
	}

	fn entity_click_count<'a>(
		&'a self,
		user_id: Uuid,
		entity_id: Uuid,
		prefix: &'a str,
		window_days: u32,
	) -> BoxFuture<'a, Result<i64>> {
		Box::pin(async move {
			Ok(activity::entity_click_count(&self.db.pool, user_id, entity_id, prefix, window_days)
				.await?)
		})
	}

	fn ctr_stats<'a>(
		&'a self,
		suggestion: &'a str,
		kind: SuggestionKind,
		window_days: u32,
	) -> BoxFuture<'a, Result<CtrStats>> {
		Box::pin(async move {
			Ok(activity::ctr_stats(&self.db.pool, suggestion, kind, window_days).await?)
		})
	}

	fn insert_impressions<'a>(
		&'a self,
		records: &'a [ImpressionRecord],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(activity::insert_impressions(&self.db.pool, records).await?) })
	}

	fn insert_click<'a>(&'a self, record: &'a ClickRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(activity::insert_click(&self.db.pool, record).await?) })
	}

	fn insert_history<'a>(&'a self, commit: &'a SearchCommit) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(activity::insert_history(&self.db.pool, commit).await?) })
	}

	fn mark_history_result<'a>(
		&'a self,
		user_id: Uuid,
		entity_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			Ok(activity::mark_history_result(&self.db.pool, user_id, entity_id).await?)
		})
	}
}

/// Parses an optional id from an untrusted string. Blank or malformed input is treated as absent.
pub fn parse_optional_id(raw: Option<&str>) -> Option<Uuid> {
	let trimmed = raw?.trim();

	if trimmed.is_empty() {
		return None;
	}

	Uuid::parse_str(trimmed).ok()
}
