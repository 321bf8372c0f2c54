use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::db::repositories::cache::CacheRepository;

const TMDB_API: &str = "https://api.themoviedb.org/3";

/// Failure taxonomy for the remote fetcher.
///
/// `Transport` covers network failures and non-JSON bodies; `Api` carries the
/// server's `status_message` verbatim when a response is a `success: false`
/// envelope. Neither is retried.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB transport error: {0}")]
    Transport(String),

    #[error("TMDB error: {0}")]
    Api(String),

    #[error("Cache error: {0}")]
    Database(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TmdbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub page: i64,
    pub total_pages: i64,
    pub total_results: i64,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTvResult {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    pub genres: Vec<GenreDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastCredit {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    #[serde(default)]
    pub order: i32,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewCredit {
    pub id: i64,
    pub name: String,
    pub job: String,
    pub department: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastCredit>,
    #[serde(default)]
    pub crew: Vec<CrewCredit>,
}

/// `GET /tv/{id}?append_to_response=credits`: series detail with the cast,
/// crew, and creator lists embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetails {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<GenreDto>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    #[serde(default)]
    pub credits: Credits,
}

/// One entry of a person's credit history; only the series id matters for
/// expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonCredit {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonTvCredits {
    pub id: i64,
    #[serde(default)]
    pub cast: Vec<PersonCredit>,
    #[serde(default)]
    pub crew: Vec<PersonCredit>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    token: String,
    language: String,
    cache: CacheRepository,
}

impl TmdbClient {
    #[must_use]
    pub fn new(token: String, language: String, cache: CacheRepository) -> Self {
        Self::with_shared_client(
            Client::builder()
                .user_agent("castgraph/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
            token,
            language,
            cache,
        )
    }

    #[must_use]
    pub fn with_shared_client(
        client: Client,
        token: String,
        language: String,
        cache: CacheRepository,
    ) -> Self {
        Self {
            client,
            token,
            language,
            cache,
        }
    }

    pub async fn search_tv(&self, query: &str) -> Result<Paginated<SearchTvResult>, TmdbError> {
        let url = self.make_url(
            "search/tv",
            &[
                ("include_adult", "true"),
                ("language", &self.language),
                ("page", "1"),
                ("query", query),
            ],
        )?;
        self.fetch_json(url).await
    }

    pub async fn tv_series_details(&self, series_id: i64) -> Result<SeriesDetails, TmdbError> {
        let url = self.make_url(
            &format!("tv/{series_id}"),
            &[
                ("append_to_response", "credits"),
                ("language", &self.language),
            ],
        )?;
        self.fetch_json(url).await
    }

    pub async fn person_tv_credits(&self, person_id: i64) -> Result<PersonTvCredits, TmdbError> {
        let url = self.make_url(
            &format!("person/{person_id}/tv_credits"),
            &[
                ("append_to_response", "credits"),
                ("language", &self.language),
            ],
        )?;
        self.fetch_json(url).await
    }

    pub async fn tv_genres(&self) -> Result<GenreList, TmdbError> {
        let url = self.make_url("genre/tv/list", &[("language", &self.language)])?;
        self.fetch_json(url).await
    }

    fn make_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, TmdbError> {
        let mut url = Url::parse(&format!("{TMDB_API}/{path}"))
            .map_err(|e| TmdbError::Transport(e.to_string()))?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Cache-aware fetch. A cached body is decoded without a network call;
    /// a fresh body is written through only after it decodes as JSON and is
    /// not an error envelope.
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TmdbError> {
        let key = url.to_string();

        let cached = self
            .cache
            .get(&key)
            .await
            .map_err(|e| TmdbError::Database(e.to_string()))?;
        let from_cache = cached.is_some();

        let body = match cached {
            Some(body) => body,
            None => {
                debug!("GET {}", key);
                let response = self
                    .client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .bearer_auth(&self.token)
                    .send()
                    .await?;
                response.text().await?
            }
        };

        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let message = value
                .get("status_message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown failure");
            return Err(TmdbError::Api(message.to_string()));
        }

        if !from_cache {
            self.cache
                .put(&key, &body)
                .await
                .map_err(|e| TmdbError::Database(e.to_string()))?;
        }

        serde_json::from_value(value).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(body: &str) -> Result<serde_json::Value, TmdbError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let message = value
                .get("status_message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown failure");
            return Err(TmdbError::Api(message.to_string()));
        }
        Ok(value)
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body = r#"{"success":false,"status_code":7,"status_message":"Invalid API key"}"#;
        match classify(body) {
            Err(TmdbError::Api(message)) => assert_eq!(message, "Invalid API key"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_becomes_transport_error() {
        assert!(matches!(
            classify("<html>upstream proxy error</html>"),
            Err(TmdbError::Transport(_))
        ));
    }

    #[test]
    fn success_true_is_not_an_envelope() {
        assert!(classify(r#"{"success":true,"id":1}"#).is_ok());
        assert!(classify(r#"{"id":1,"name":"ok"}"#).is_ok());
    }

    #[test]
    fn details_decode_with_missing_optionals() {
        let body = r#"{"id":100,"name":"Show","credits":{"cast":[{"id":1,"name":"A","order":0}]}}"#;
        let details: SeriesDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.id, 100);
        assert_eq!(details.credits.cast.len(), 1);
        assert!(details.credits.crew.is_empty());
        assert!(details.created_by.is_empty());
    }
}
