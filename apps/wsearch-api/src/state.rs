use std::sync::Arc;

use wsearch_service::SearchService;
use wsearch_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	/// Connects to Postgres and bootstraps the schema before serving.
	pub async fn new(config: wsearch_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::with_service(SearchService::new(config, db)))
	}

	pub fn with_service(service: SearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
