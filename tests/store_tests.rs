//! Store-level tests: merge-insert discipline, identity, membership, cache.

use castgraph::db::Store;
use castgraph::models::person::{CREATOR_JOB, CastAppearance, CrewAppearance};
use castgraph::models::series::Series;

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("castgraph-store-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

fn test_series(id: i64, name: &str) -> Series {
    Series {
        id,
        name: name.to_string(),
        original_name: name.to_string(),
        overview: "A show about testing.".to_string(),
        genre_ids: vec![18, 35],
        popularity: Some(42.5),
        vote_average: Some(8.1),
        vote_count: Some(1200),
        poster_path: Some("/poster.jpg".to_string()),
        backdrop_path: None,
        first_air_date: Some("2020-01-15".to_string()),
        origin_country: vec!["US".to_string()],
        original_language: Some("en".to_string()),
        added_at: "2026-06-01T00:00:00Z".to_string(),
    }
}

fn cast(person_id: i64, series_id: i64, name: &str, order: i32) -> CastAppearance {
    CastAppearance {
        person_id,
        series_id,
        name: name.to_string(),
        character: Some("Somebody".to_string()),
        billing_order: order,
        profile_path: None,
    }
}

fn crew(person_id: i64, series_id: i64, name: &str, job: &str) -> CrewAppearance {
    CrewAppearance {
        person_id,
        series_id,
        name: name.to_string(),
        job: job.to_string(),
        department: Some(job.to_string()),
        profile_path: None,
    }
}

#[tokio::test]
async fn add_series_then_get_returns_equal_record() {
    let store = test_store().await;
    let series = test_series(100, "Identity Show");

    assert!(store.add_series(&series).await.unwrap());
    let got = store.get_series(100).await.unwrap().unwrap();
    assert_eq!(got, series);
}

#[tokio::test]
async fn series_merge_is_first_write_wins() {
    let store = test_store().await;
    let original = test_series(100, "Original Name");

    store.add_series(&original).await.unwrap();

    let mut imposter = test_series(100, "Renamed");
    imposter.vote_count = Some(999_999);
    assert!(!store.add_series(&imposter).await.unwrap());

    let got = store.get_series(100).await.unwrap().unwrap();
    assert_eq!(got.name, "Original Name");
    assert_eq!(got.vote_count, Some(1200));
}

#[tokio::test]
async fn cast_merge_insert_is_idempotent() {
    let store = test_store().await;
    store.add_series(&test_series(100, "Show")).await.unwrap();

    let people = vec![cast(1, 100, "Lead", 0), cast(2, 100, "Second", 1)];

    assert_eq!(store.add_cast(100, &people).await.unwrap(), 2);
    assert_eq!(store.add_cast(100, &people).await.unwrap(), 0);

    let stored = store.cast_for_series(100).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn duplicate_people_within_one_batch_collapse() {
    let store = test_store().await;
    store.add_series(&test_series(100, "Show")).await.unwrap();

    // TMDB sometimes lists a person once per role; only the first survives.
    let people = vec![cast(1, 100, "Lead", 0), cast(1, 100, "Lead", 5)];
    assert_eq!(store.add_cast(100, &people).await.unwrap(), 1);

    let stored = store.cast_for_series(100).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].billing_order, 0);
}

#[tokio::test]
async fn same_person_across_series_stays_distinct() {
    let store = test_store().await;
    store.add_series(&test_series(100, "One")).await.unwrap();
    store.add_series(&test_series(200, "Two")).await.unwrap();

    store
        .add_crew(100, &[crew(42, 100, "Busy Director", "Director")])
        .await
        .unwrap();
    store
        .add_crew(200, &[crew(42, 200, "Busy Director", "Director")])
        .await
        .unwrap();

    assert_eq!(store.crew_for_series(100).await.unwrap().len(), 1);
    assert_eq!(store.crew_for_series(200).await.unwrap().len(), 1);
}

#[tokio::test]
async fn normalize_writes_series_cast_and_crew_together() {
    let store = test_store().await;
    let series = test_series(100, "Atomic Show");
    let cast_rows = vec![cast(1, 100, "Lead", 0)];
    let crew_rows = vec![
        crew(2, 100, "Director", "Director"),
        crew(3, 100, "Showmaker", CREATOR_JOB),
    ];

    store
        .normalize(&series, &cast_rows, &crew_rows)
        .await
        .unwrap();

    assert!(store.has_series(100).await.unwrap());
    assert_eq!(store.cast_for_series(100).await.unwrap().len(), 1);
    assert_eq!(store.crew_for_series(100).await.unwrap().len(), 2);

    // Re-normalizing the same payload changes nothing.
    store
        .normalize(&series, &cast_rows, &crew_rows)
        .await
        .unwrap();
    let (cast_count, crew_count) = store.credit_counts(100).await.unwrap();
    assert_eq!((cast_count, crew_count), (1, 2));
}

#[tokio::test]
async fn existing_crew_credit_beats_creator_pseudo_row() {
    let store = test_store().await;
    let series = test_series(100, "Show");

    // Crew list carries the person as Director; the creator pseudo-row for
    // the same person comes later in the batch and loses the merge.
    let crew_rows = vec![
        crew(7, 100, "Multi Hat", "Director"),
        crew(7, 100, "Multi Hat", CREATOR_JOB),
    ];

    store.normalize(&series, &[], &crew_rows).await.unwrap();

    let stored = store.crew_for_series(100).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].job, "Director");
}

#[tokio::test]
async fn tracklist_round_trip() {
    let store = test_store().await;

    assert!(!store.is_tracked(100).await.unwrap());
    assert!(store.track(100).await.unwrap());
    assert!(store.is_tracked(100).await.unwrap());

    // Idempotent add and remove.
    assert!(!store.track(100).await.unwrap());
    assert!(store.untrack(100).await.unwrap());
    assert!(!store.untrack(100).await.unwrap());
    assert!(!store.is_tracked(100).await.unwrap());
}

#[tokio::test]
async fn tracked_series_keeps_tracking_order() {
    let store = test_store().await;
    store.add_series(&test_series(200, "Second")).await.unwrap();
    store.add_series(&test_series(100, "First")).await.unwrap();

    store.track(200).await.unwrap();
    store.track(100).await.unwrap();

    let ids: Vec<i64> = store
        .tracked_series()
        .await
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![200, 100]);
}

#[tokio::test]
async fn untracking_keeps_stored_records() {
    let store = test_store().await;
    store.add_series(&test_series(100, "Keeper")).await.unwrap();
    store
        .add_cast(100, &[cast(1, 100, "Lead", 0)])
        .await
        .unwrap();
    store.track(100).await.unwrap();

    store.untrack(100).await.unwrap();

    assert!(store.has_series(100).await.unwrap());
    assert_eq!(store.cast_for_series(100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn request_cache_round_trip_and_idempotent_put() {
    let store = test_store().await;
    let url = "https://api.themoviedb.org/3/tv/100?append_to_response=credits";

    assert!(store.cache_get(url).await.unwrap().is_none());

    store.cache_put(url, r#"{"id":100}"#).await.unwrap();
    assert_eq!(
        store.cache_get(url).await.unwrap().as_deref(),
        Some(r#"{"id":100}"#)
    );

    // First write wins; a different body for the same URL is ignored.
    store.cache_put(url, r#"{"id":999}"#).await.unwrap();
    assert_eq!(
        store.cache_get(url).await.unwrap().as_deref(),
        Some(r#"{"id":100}"#)
    );
}

#[tokio::test]
async fn cache_keys_include_query_string() {
    let store = test_store().await;

    store
        .cache_put("https://example.org/search?query=a", "a")
        .await
        .unwrap();

    assert!(
        store
            .cache_get("https://example.org/search?query=b")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn genre_table_merge_inserts() {
    let store = test_store().await;

    store
        .put_genres(&[(18, "Drama".to_string()), (35, "Comedy".to_string())])
        .await
        .unwrap();
    store
        .put_genres(&[(18, "Renamed".to_string())])
        .await
        .unwrap();

    let names = store.genre_names().await.unwrap();
    assert_eq!(names.get(&18).map(String::as_str), Some("Drama"));
    assert_eq!(names.get(&35).map(String::as_str), Some("Comedy"));
}
