use std::sync::atomic::Ordering;

use uuid::Uuid;

use wsearch_domain::candidate::SuggestionKind;
use wsearch_service::{ClickRequest, Error, SearchInputRequest};

use super::FakeStores;

fn commit(user_id: &str, keyword: &str) -> SearchInputRequest {
	SearchInputRequest {
		user_id: user_id.to_string(),
		keyword: keyword.to_string(),
		device: "ios".to_string(),
		client_app_version: "2.3.1".to_string(),
	}
}

fn click(kind: &str, user_id: Option<&str>, entity_id: Option<&str>) -> ClickRequest {
	ClickRequest {
		user_id: user_id.map(str::to_string),
		keyword: "Gar".to_string(),
		suggestion: "Garmin 840".to_string(),
		suggestion_type: kind.to_string(),
		entity_id: entity_id.map(str::to_string),
		position: Some(1),
	}
}

#[tokio::test]
async fn committed_search_records_history_and_trending() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);
	let user_id = Uuid::new_v4();

	for _ in 0..2 {
		service
			.log_search_input(commit(&user_id.to_string(), "  PostgreSQL "))
			.await
			.expect("Commit failed.");
	}

	let history = fake.history.lock().expect("history lock").clone();

	assert_eq!(history.len(), 2);
	assert_eq!(history[0].user_id, user_id);
	assert_eq!(history[0].keyword, "  PostgreSQL ");
	assert_eq!(history[0].normalized_keyword, "postgresql");
	assert_eq!(history[0].device, "ios");
	assert_eq!(fake.trending.lock().expect("trending lock").get("postgresql"), Some(&2.0));
}

#[tokio::test]
async fn committed_search_requires_a_user_and_keyword() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);
	let err = service
		.log_search_input(commit("not-a-uuid", "garmin"))
		.await
		.expect_err("Expected invalid user id.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let err = service
		.log_search_input(commit(&Uuid::new_v4().to_string(), " \n "))
		.await
		.expect_err("Expected empty keyword.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert!(fake.history.lock().expect("history lock").is_empty());
}

#[tokio::test]
async fn trending_failure_does_not_fail_the_commit() {
	let fake = FakeStores::new();

	fake.fail_trending.store(true, Ordering::SeqCst);

	let service = super::build_service(&fake);

	service
		.log_search_input(commit(&Uuid::new_v4().to_string(), "garmin"))
		.await
		.expect("Commit should survive a trending failure.");

	assert_eq!(fake.history.lock().expect("history lock").len(), 1);
}

#[tokio::test]
async fn click_type_is_validated() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);
	let err = service.log_click(click("world", None, None)).await.expect_err("Expected failure.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert!(fake.clicks.lock().expect("clicks lock").is_empty());
}

#[tokio::test]
async fn malformed_click_ids_are_stored_as_absent() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);

	service
		.log_click(click("entity", Some("nope"), Some("also-nope")))
		.await
		.expect("Click failed.");

	let clicks = fake.clicks.lock().expect("clicks lock").clone();

	assert_eq!(clicks.len(), 1);
	assert_eq!(clicks[0].user_id, None);
	assert_eq!(clicks[0].entity_id, None);
	assert_eq!(clicks[0].kind, SuggestionKind::Entity);
	assert_eq!(clicks[0].normalized_keyword, "gar");
	assert!(fake.marked.lock().expect("marked lock").is_empty());
}

#[tokio::test]
async fn entity_click_marks_the_latest_history_row() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);
	let user_id = Uuid::new_v4();
	let entity_id = Uuid::new_v4();

	service
		.log_click(click("entity", Some(&user_id.to_string()), Some(&entity_id.to_string())))
		.await
		.expect("Click failed.");
	service
		.log_click(click("keyword", Some(&user_id.to_string()), None))
		.await
		.expect("Click failed.");

	assert_eq!(fake.marked.lock().expect("marked lock").clone(), vec![(user_id, entity_id)]);
	assert_eq!(fake.clicks.lock().expect("clicks lock").len(), 2);
}

#[tokio::test]
async fn trending_lists_top_keywords() {
	let fake = FakeStores::new();

	fake.set_trending("garmin", 9.0);
	fake.set_trending("postgresql", 5.0);
	fake.set_trending("rust", 7.0);

	let service = super::build_service(&fake);
	let response = service.trending(Some(2)).await.expect("Trending failed.");

	assert_eq!(response.keywords, vec!["garmin".to_string(), "rust".to_string()]);

	let response = service.trending(None).await.expect("Trending failed.");

	assert_eq!(response.keywords.len(), 3);
}

#[tokio::test]
async fn trending_failure_degrades_to_empty() {
	let fake = FakeStores::new();

	fake.set_trending("garmin", 9.0);
	fake.fail_trending.store(true, Ordering::SeqCst);

	let service = super::build_service(&fake);
	let response = service.trending(None).await.expect("Trending should degrade.");

	assert!(response.keywords.is_empty());
}

#[tokio::test]
async fn get_entity_reports_missing_and_malformed_ids() {
	let fake = FakeStores::new();
	let garmin = super::entity("Garmin 840", 1);

	fake.add_entity(&garmin);

	let service = super::build_service(&fake);
	let found = service.get_entity(&garmin.entity_id.to_string()).await.expect("Get failed.");

	assert_eq!(found.id, garmin.entity_id);
	assert_eq!(found.title, "Garmin 840");
	assert_eq!(found.description, garmin.description);

	let err = service
		.get_entity(&Uuid::new_v4().to_string())
		.await
		.expect_err("Expected missing entity.");

	assert!(matches!(err, Error::NotFound { .. }));

	let err = service.get_entity("garmin").await.expect_err("Expected malformed id.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}
