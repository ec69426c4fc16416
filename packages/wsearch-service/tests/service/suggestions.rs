use std::sync::atomic::Ordering;

use uuid::Uuid;

use wsearch_domain::candidate::{CandidateSource, SuggestionKind};
use wsearch_service::{ClickRecord, ImpressionRecord, SuggestionsRequest};

use super::FakeStores;

fn request(keyword: &str, user_id: Option<Uuid>) -> SuggestionsRequest {
	SuggestionsRequest { keyword: keyword.to_string(), user_id }
}

#[tokio::test]
async fn blank_keyword_returns_nothing_and_queries_nothing() {
	let fake = FakeStores::new();
	let service = super::build_service(&fake);
	let response = service
		.suggestions(request(" \t\u{0007} ", Some(Uuid::new_v4())))
		.await
		.expect("Suggestions failed.");

	assert!(response.suggestions.is_empty());
	assert_eq!(response.keyword, " \t\u{0007} ");
	assert_eq!(fake.reads(), 0);

	tokio::time::sleep(std::time::Duration::from_millis(20)).await;

	assert_eq!(fake.impression_count(), 0);
}

#[tokio::test]
async fn trending_keyword_scores_prefix_plus_trending() {
	let fake = FakeStores::new();

	fake.set_trending("postgresql", 5.0);

	let service = super::build_service(&fake);
	let response =
		service.suggestions(request("PostgreSQL", None)).await.expect("Suggestions failed.");
	let top = &response.suggestions[0];

	assert_eq!(top.kind, SuggestionKind::Keyword);
	assert_eq!(top.text, "postgresql");
	assert_eq!(top.source, CandidateSource::Trending);
	assert_eq!(top.entity_id, None);
	assert_eq!(top.position, 0);
	assert_eq!(top.scores.prefix_score, 100.0);
	assert_eq!(top.scores.trending_score, 5.0);
	assert_eq!(top.scores.final_score, 105.0);
}

#[tokio::test]
async fn personal_history_frequency_scales_by_weight() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();

	fake.add_history(user_id, "garmin", 3);
	fake.add_history(Uuid::new_v4(), "garmin", 7);

	let service = super::build_service(&fake);
	let response =
		service.suggestions(request("gar", Some(user_id))).await.expect("Suggestions failed.");
	let garmin = response
		.suggestions
		.iter()
		.find(|s| s.text == "garmin")
		.expect("Expected a garmin suggestion.");

	assert_eq!(garmin.source, CandidateSource::UserHistory);
	assert_eq!(garmin.scores.personal_score, 60.0);
	assert_eq!(garmin.scores.final_score, 160.0);
}

#[tokio::test]
async fn anonymous_requests_get_no_personal_score() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();

	fake.add_history(user_id, "garmin", 3);
	fake.set_trending("garmin", 1.0);

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 1);
	assert_eq!(response.suggestions[0].source, CandidateSource::Trending);
	assert_eq!(response.suggestions[0].scores.personal_score, 0.0);
}

#[tokio::test]
async fn duplicate_texts_collapse_to_one_suggestion() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();
	let garmin = super::entity("Garmin", 1);

	fake.add_history(user_id, "garmin", 1);
	fake.set_trending("garmin", 2.0);
	fake.add_entity(&garmin);

	let service = super::build_service(&fake);
	let response =
		service.suggestions(request("gar", Some(user_id))).await.expect("Suggestions failed.");
	let texts: Vec<String> = response.suggestions.iter().map(|s| s.text.to_lowercase()).collect();

	assert_eq!(texts, vec!["garmin".to_string()]);
	assert_eq!(response.suggestions[0].source, CandidateSource::UserHistory);
	assert_eq!(response.suggestions[0].scores.final_score, 122.0);
}

#[tokio::test]
async fn prefix_entity_is_not_repeated_by_fuzzy_source() {
	let fake = FakeStores::new();
	let garmin = super::entity("Garmin 840", 2);
	let gramin = super::entity("Gramin Case", 1);

	fake.add_entity(&garmin);
	fake.add_entity(&gramin);
	fake.set_trigram(&garmin, 0.6);
	fake.set_trigram(&gramin, 0.25);

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 2);

	let first = &response.suggestions[0];
	let second = &response.suggestions[1];

	assert_eq!(first.entity_id, Some(garmin.entity_id));
	assert_eq!(first.source, CandidateSource::EntityTitleExact);
	assert_eq!(first.scores.prefix_score, 100.0);
	assert_eq!(first.scores.fuzzy_score, 0.0);
	assert_eq!(second.entity_id, Some(gramin.entity_id));
	assert_eq!(second.source, CandidateSource::EntityTitleFuzzy);
	assert_eq!(second.scores.prefix_score, 0.0);
	assert_eq!(second.scores.fuzzy_score, 2.5);
	assert_eq!(second.scores.final_score, 2.5);
}

#[tokio::test]
async fn entity_clicks_feed_personal_score() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();
	let garmin = super::entity("Garmin 840", 2);

	fake.add_entity(&garmin);

	for _ in 0..2 {
		fake.clicks.lock().expect("clicks lock").push(ClickRecord {
			user_id: Some(user_id),
			keyword: "Garmin".to_string(),
			normalized_keyword: "garmin".to_string(),
			clicked_suggestion: "Garmin 840".to_string(),
			kind: SuggestionKind::Entity,
			entity_id: Some(garmin.entity_id),
			position: Some(0),
		});
	}

	let service = super::build_service(&fake);
	let response =
		service.suggestions(request("gar", Some(user_id))).await.expect("Suggestions failed.");
	let top = &response.suggestions[0];

	assert_eq!(top.entity_id, Some(garmin.entity_id));
	assert_eq!(top.scores.personal_score, 40.0);
}

#[tokio::test]
async fn click_through_rate_adds_ctr_score() {
	let fake = FakeStores::new();

	fake.set_trending("garmin", 1.0);

	{
		let mut impressions = fake.impressions.lock().expect("impressions lock");

		for position in 0..4 {
			impressions.push(ImpressionRecord {
				user_id: None,
				keyword: "ga".to_string(),
				normalized_keyword: "ga".to_string(),
				suggestion: "garmin".to_string(),
				kind: SuggestionKind::Keyword,
				entity_id: None,
				position,
			});
		}
	}

	fake.clicks.lock().expect("clicks lock").push(ClickRecord {
		user_id: None,
		keyword: "ga".to_string(),
		normalized_keyword: "ga".to_string(),
		clicked_suggestion: "garmin".to_string(),
		kind: SuggestionKind::Keyword,
		entity_id: None,
		position: Some(0),
	});

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");

	assert_eq!(response.suggestions[0].scores.ctr_score, 12.5);
	assert_eq!(response.suggestions[0].scores.final_score, 113.5);
}

#[tokio::test]
async fn failing_source_degrades_to_the_others() {
	let fake = FakeStores::new();
	let garmin = super::entity("Garmin 840", 2);

	fake.add_entity(&garmin);
	fake.set_trending("garmin", 3.0);
	fake.fail_trending.store(true, Ordering::SeqCst);

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 1);
	assert_eq!(response.suggestions[0].entity_id, Some(garmin.entity_id));

	fake.fail_trending.store(false, Ordering::SeqCst);
	fake.fail_entities.store(true, Ordering::SeqCst);

	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 1);
	assert_eq!(response.suggestions[0].text, "garmin");
}

#[tokio::test]
async fn stalled_source_is_cut_off_by_the_timeout() {
	let fake = FakeStores::new();
	let garmin = super::entity("Garmin 840", 2);

	fake.add_entity(&garmin);
	fake.set_trending("garmin", 3.0);
	fake.stall_trending.store(true, Ordering::SeqCst);

	let mut cfg = super::test_config();

	cfg.suggestions.source_timeout_ms = 50;

	let service = super::service_with(cfg, &fake);
	let response = tokio::time::timeout(
		std::time::Duration::from_secs(5),
		service.suggestions(request("gar", None)),
	)
	.await
	.expect("Suggestions should not wait for the stalled source.")
	.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 1);
	assert_eq!(response.suggestions[0].entity_id, Some(garmin.entity_id));
}

#[tokio::test]
async fn results_are_capped_with_sequential_positions() {
	let fake = FakeStores::new();

	for i in 0..15 {
		fake.set_trending(&format!("garmin {i:02}"), f64::from(i));
	}

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");
	let positions: Vec<u32> = response.suggestions.iter().map(|s| s.position).collect();

	assert_eq!(positions, (0..10).collect::<Vec<u32>>());
	assert!(
		response
			.suggestions
			.windows(2)
			.all(|w| w[0].scores.final_score >= w[1].scores.final_score)
	);
	assert!(
		response
			.suggestions
			.iter()
			.all(|s| s.scores.final_score == s.scores.prefix_score
				+ s.scores.personal_score
				+ s.scores.trending_score
				+ s.scores.fuzzy_score
				+ s.scores.ctr_score)
	);
}

#[tokio::test]
async fn impressions_are_logged_for_each_returned_suggestion() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();
	let garmin = super::entity("Garmin 840", 2);

	fake.add_entity(&garmin);
	fake.set_trending("garmin", 3.0);

	let service = super::build_service(&fake);
	let response =
		service.suggestions(request("  GAR ", Some(user_id))).await.expect("Suggestions failed.");

	super::wait_for_impressions(&fake, response.suggestions.len()).await;

	let impressions = fake.impressions.lock().expect("impressions lock").clone();

	assert_eq!(impressions.len(), 2);

	for (item, record) in response.suggestions.iter().zip(&impressions) {
		assert_eq!(record.user_id, Some(user_id));
		assert_eq!(record.keyword, "  GAR ");
		assert_eq!(record.normalized_keyword, "gar");
		assert_eq!(record.suggestion, item.text);
		assert_eq!(record.kind, item.kind);
		assert_eq!(record.entity_id, item.entity_id);
		assert_eq!(record.position as u32, item.position);
	}
}

#[tokio::test]
async fn impression_write_failure_does_not_fail_the_request() {
	let fake = FakeStores::new();

	fake.set_trending("garmin", 3.0);
	fake.fail_activity.store(true, Ordering::SeqCst);

	let service = super::build_service(&fake);
	let response = service
		.suggestions(request("gar", Some(Uuid::new_v4())))
		.await
		.expect("Suggestions failed.");

	assert_eq!(response.suggestions.len(), 1);
	assert_eq!(response.suggestions[0].scores.personal_score, 0.0);
	assert_eq!(response.suggestions[0].scores.ctr_score, 0.0);
}

#[tokio::test]
async fn repeated_requests_serialize_identically() {
	let fake = FakeStores::new();
	let user_id = Uuid::new_v4();

	for (title, age) in [("Garmin 840", 3), ("Garmin Edge", 1), ("Gardening Basics", 2)] {
		let entity = super::entity(title, age);

		fake.add_entity(&entity);
		fake.set_trigram(&entity, 0.4);
	}

	fake.add_history(user_id, "garmin", 2);
	fake.set_trending("garmin", 4.0);
	fake.set_trending("garden", 4.0);

	let service = super::build_service(&fake);
	let first =
		service.suggestions(request("gar", Some(user_id))).await.expect("Suggestions failed.");
	let second =
		service.suggestions(request("gar", Some(user_id))).await.expect("Suggestions failed.");

	assert_eq!(
		serde_json::to_string(&first).expect("Failed to serialize."),
		serde_json::to_string(&second).expect("Failed to serialize.")
	);
}

#[tokio::test]
async fn response_uses_camel_case_fields() {
	let fake = FakeStores::new();
	let garmin = super::entity("Garmin 840", 2);

	fake.add_entity(&garmin);

	let service = super::build_service(&fake);
	let response = service.suggestions(request("gar", None)).await.expect("Suggestions failed.");
	let value = serde_json::to_value(&response).expect("Failed to serialize.");
	let item = &value["suggestions"][0];

	assert_eq!(item["type"], "entity");
	assert_eq!(item["source"], "entity_title_exact");
	assert_eq!(item["entityId"], garmin.entity_id.to_string());
	assert_eq!(item["scores"]["prefixScore"], 100.0);
	assert_eq!(item["scores"]["finalScore"], 100.0);
}
