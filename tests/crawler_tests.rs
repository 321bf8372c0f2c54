//! End-to-end crawl over a pre-seeded request cache. Every URL the crawler
//! needs is cached up front, so the expansion runs without touching the
//! network; a request for anything uncached would fail the test.

use std::sync::Arc;

use castgraph::clients::tmdb::TmdbClient;
use castgraph::config::CrawlerConfig;
use castgraph::db::Store;
use castgraph::models::person::CREATOR_JOB;
use castgraph::services::CrawlerService;

const API: &str = "https://api.themoviedb.org/3";

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("castgraph-crawl-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

fn detail_url(series_id: i64) -> String {
    format!("{API}/tv/{series_id}?append_to_response=credits&language=en-US")
}

fn credits_url(person_id: i64) -> String {
    format!("{API}/person/{person_id}/tv_credits?append_to_response=credits&language=en-US")
}

fn series_body(id: i64, name: &str) -> String {
    format!(r#"{{"id":{id},"name":"{name}","original_name":"{name}","overview":""}}"#)
}

async fn seed_root_series(store: &Store) {
    // Root series 100: one lead within the billing cutoff, one deep-billed
    // extra, a director, and a creator.
    let root = r#"{
        "id": 100,
        "name": "Root Show",
        "original_name": "Root Show",
        "overview": "The root of the crawl.",
        "genres": [{"id": 18, "name": "Drama"}],
        "created_by": [{"id": 4, "name": "The Creator"}],
        "credits": {
            "cast": [
                {"id": 1, "name": "Lead Actor", "character": "Hero", "order": 0},
                {"id": 2, "name": "Extra", "character": "Passerby", "order": 30}
            ],
            "crew": [
                {"id": 3, "name": "The Director", "job": "Director", "department": "Directing"}
            ]
        }
    }"#;
    store.cache_put(&detail_url(100), root).await.unwrap();

    // Credit histories for the three important people. Series 100 reappears
    // and must be dropped by the visited set; 555 shows up twice and must be
    // deduplicated.
    store
        .cache_put(
            &credits_url(1),
            r#"{"id":1,"cast":[{"id":100},{"id":555},{"id":555}],"crew":[]}"#,
        )
        .await
        .unwrap();
    store
        .cache_put(
            &credits_url(3),
            r#"{"id":3,"cast":[],"crew":[{"id":666},{"id":555}]}"#,
        )
        .await
        .unwrap();
    store
        .cache_put(&credits_url(4), r#"{"id":4,"cast":[],"crew":[]}"#)
        .await
        .unwrap();

    // Related series details, fetched by the depth-0 pass.
    store
        .cache_put(&detail_url(555), &series_body(555, "Related Five"))
        .await
        .unwrap();
    store
        .cache_put(&detail_url(666), &series_body(666, "Related Six"))
        .await
        .unwrap();
}

fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        rate_limit: 2,
        billing_order_cutoff: 10,
        important_jobs: vec!["Director".to_string(), CREATOR_JOB.to_string()],
        backoff_min_ms: 1,
        backoff_max_ms: 2,
    }
}

#[tokio::test]
async fn expand_ingests_root_and_related_series() {
    let store = test_store().await;
    seed_root_series(&store).await;

    let tmdb = Arc::new(TmdbClient::new(
        String::new(),
        "en-US".to_string(),
        store.cache_repo(),
    ));
    let crawler = CrawlerService::new(store.clone(), tmdb, test_config());

    let root = crawler.expand(100).await.unwrap();
    assert_eq!(root.id, 100);
    assert_eq!(root.name, "Root Show");
    assert_eq!(root.genre_ids, vec![18]);

    // Root plus both related series, each normalized exactly once.
    for (id, name) in [(100, "Root Show"), (555, "Related Five"), (666, "Related Six")] {
        let series = store.get_series(id).await.unwrap().unwrap();
        assert_eq!(series.name, name);
    }

    // Root credits include the creator pseudo-crew row.
    let crew = store.crew_for_series(100).await.unwrap();
    assert_eq!(crew.len(), 2);
    let creator = crew.iter().find(|c| c.person_id == 4).unwrap();
    assert_eq!(creator.job, CREATOR_JOB);

    let cast = store.cast_for_series(100).await.unwrap();
    assert_eq!(cast.len(), 2);
}

#[tokio::test]
async fn expand_is_replay_safe() {
    let store = test_store().await;
    seed_root_series(&store).await;

    let tmdb = Arc::new(TmdbClient::new(
        String::new(),
        "en-US".to_string(),
        store.cache_repo(),
    ));
    let crawler = CrawlerService::new(store.clone(), tmdb, test_config());

    crawler.expand(100).await.unwrap();
    crawler.expand(100).await.unwrap();

    let (cast, crew) = store.credit_counts(100).await.unwrap();
    assert_eq!((cast, crew), (2, 2));
}

#[tokio::test]
async fn root_fetch_failure_aborts_expansion() {
    let store = test_store().await;

    // Cached error envelope for the root: the crawl must surface the API
    // failure without writing anything.
    store
        .cache_put(
            &detail_url(100),
            r#"{"success":false,"status_code":34,"status_message":"The resource you requested could not be found."}"#,
        )
        .await
        .unwrap();

    let tmdb = Arc::new(TmdbClient::new(
        String::new(),
        "en-US".to_string(),
        store.cache_repo(),
    ));
    let crawler = CrawlerService::new(store.clone(), tmdb, test_config());

    let err = crawler.expand(100).await.unwrap_err();
    assert!(err.to_string().contains("could not be found"));
    assert!(!store.has_series(100).await.unwrap());
}
