use uuid::Uuid;

use wsearch_domain::{candidate::CandidateSource, tiers::MatchTier};
use wsearch_service::{
	ClickRequest, SearchInputRequest, SearchResultsRequest, SearchService, SuggestionsRequest,
};
use wsearch_storage::{db::Db, entities};
use wsearch_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres with pg_trgm and pg_bigm. Set WSEARCH_PG_DSN to run."]
async fn end_to_end_against_postgres() {
	let Some(base_dsn) = wsearch_testkit::env_dsn() else {
		eprintln!("Skipping end_to_end_against_postgres; set WSEARCH_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let mut cfg = super::test_config();

	cfg.storage.postgres.dsn = test_db.dsn().to_string();

	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let garmin = super::entity("Garmin Edge 840", 2);
	let mount = super::entity("Bike mount for garmin", 5);

	for entity in [&garmin, &mount] {
		entities::insert_entity(&db.pool, entity).await.expect("Failed to seed entity.");
	}

	let service = SearchService::new(cfg, db);
	let user_id = Uuid::new_v4();

	for _ in 0..2 {
		service
			.log_search_input(SearchInputRequest {
				user_id: user_id.to_string(),
				keyword: "garmin watch".to_string(),
				device: "ios".to_string(),
				client_app_version: "2.3.1".to_string(),
			})
			.await
			.expect("Failed to log search input.");
	}

	let trending = service.trending(None).await.expect("Failed to load trending.");

	assert_eq!(trending.keywords, vec!["garmin watch".to_string()]);

	let response = service
		.suggestions(SuggestionsRequest { keyword: "Gar".to_string(), user_id: Some(user_id) })
		.await
		.expect("Failed to fetch suggestions.");
	let watch = response
		.suggestions
		.iter()
		.find(|s| s.text == "garmin watch")
		.expect("Expected committed keyword among suggestions.");

	assert_eq!(watch.source, CandidateSource::UserHistory);
	assert_eq!(watch.scores.personal_score, 40.0);
	assert!(
		response
			.suggestions
			.iter()
			.any(|s| s.entity_id == Some(garmin.entity_id)
				&& s.source == CandidateSource::EntityTitleExact)
	);

	let hits = service.tiered_search("garmin", 20).await.expect("Failed to run tiered search.");

	assert_eq!(hits[0].entity.entity_id, garmin.entity_id);
	assert_eq!(hits[0].tier, MatchTier::Prefix);
	assert!(hits.iter().any(|h| h.entity.entity_id == mount.entity_id && h.tier > MatchTier::Prefix));

	let results = service
		.search_results(SearchResultsRequest { keyword: "garmin".to_string(), user_id: None })
		.await
		.expect("Failed to fetch search results.");

	assert_eq!(results.entities.len(), hits.len());

	service
		.log_click(ClickRequest {
			user_id: Some(user_id.to_string()),
			keyword: "gar".to_string(),
			suggestion: garmin.title.clone(),
			suggestion_type: "entity".to_string(),
			entity_id: Some(garmin.entity_id.to_string()),
			position: Some(0),
		})
		.await
		.expect("Failed to log click.");

	let detail =
		service.get_entity(&garmin.entity_id.to_string()).await.expect("Failed to load entity.");

	assert_eq!(detail.title, garmin.title);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
