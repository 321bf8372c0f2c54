//! Rate-limited expansion of a series into its people and their other series.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::clients::tmdb::{PersonTvCredits, SeriesDetails, TmdbClient, TmdbError};
use crate::config::CrawlerConfig;
use crate::constants::crawl::EXPANSION_DEPTH;
use crate::db::Store;
use crate::models::person::{CREATOR_JOB, CastAppearance, CrewAppearance};
use crate::models::series::Series;
use crate::services::graph::ImportanceFilter;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Tmdb(#[from] TmdbError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}

pub struct CrawlerService {
    store: Store,
    tmdb: Arc<TmdbClient>,
    config: CrawlerConfig,
    filter: ImportanceFilter,
}

impl CrawlerService {
    #[must_use]
    pub fn new(store: Store, tmdb: Arc<TmdbClient>, config: CrawlerConfig) -> Self {
        let filter = ImportanceFilter::new(
            config.billing_order_cutoff,
            config.important_jobs.clone(),
        );
        Self {
            store,
            tmdb,
            config,
            filter,
        }
    }

    /// Expands a root series: ingest it, follow its important people, ingest
    /// the series they worked on. A failure on the root aborts the whole
    /// expansion; a failure inside a batch aborts that batch and surfaces
    /// the underlying error.
    pub async fn expand(&self, series_id: i64) -> Result<Series, CrawlError> {
        self.crawl(series_id, EXPANSION_DEPTH).await
    }

    /// One crawl step with an explicit remaining-depth parameter. Depth 0
    /// ingests detail only; anything above also fans out into people and
    /// recurses one level shallower over their related series.
    fn crawl(&self, series_id: i64, depth: u8) -> BoxFuture<'_, Result<Series, CrawlError>> {
        async move {
            let details = self.tmdb.tv_series_details(series_id).await?;
            let (series, cast, crew) = normalize_details(&details);
            self.store.normalize(&series, &cast, &crew).await?;

            if depth == 0 {
                return Ok(series);
            }

            let people = self.important_people(&cast, &crew);
            info!(
                "Series {} ({}): following {} important people",
                series.id,
                series.name,
                people.len()
            );

            let mut credit_sets: Vec<PersonTvCredits> = Vec::new();
            for batch in people.chunks(self.config.rate_limit) {
                debug!("Fetching credits for {} people", batch.len());
                let requests = batch.iter().map(|&id| self.tmdb.person_tv_credits(id));
                credit_sets.extend(try_join_all(requests).await?);
                self.backoff().await;
            }

            let mut visited: HashSet<i64> = HashSet::from([series_id]);
            let related = related_series_ids(&credit_sets, &mut visited);
            info!(
                "Series {}: {} related series discovered",
                series.id,
                related.len()
            );

            for batch in related.chunks(self.config.rate_limit) {
                debug!("Ingesting {} related series", batch.len());
                let requests = batch.iter().map(|&id| self.crawl(id, depth - 1));
                try_join_all(requests).await?;
                self.backoff().await;
            }

            Ok(series)
        }
        .boxed()
    }

    /// Cast within the billing cutoff plus crew on the job allow-list, in
    /// credit order. Creators qualify through their pseudo-crew rows.
    fn important_people(&self, cast: &[CastAppearance], crew: &[CrewAppearance]) -> Vec<i64> {
        cast.iter()
            .filter(|c| self.filter.important_cast(c))
            .map(|c| c.person_id)
            .chain(
                crew.iter()
                    .filter(|c| self.filter.important_crew(c))
                    .map(|c| c.person_id),
            )
            .collect()
    }

    /// Uniformly random pause between batches, keeping request bursts under
    /// the remote service's rate ceiling.
    async fn backoff(&self) {
        let span = self
            .config
            .backoff_max_ms
            .saturating_sub(self.config.backoff_min_ms)
            .max(1);
        let millis = self.config.backoff_min_ms + rand::rng().random_range(0..span);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

/// Splits a series detail response into the store's normalized shape. The
/// creator list becomes pseudo-crew rows appended after the real crew, so an
/// existing crew credit for the same person wins the merge.
#[must_use]
pub fn normalize_details(
    details: &SeriesDetails,
) -> (Series, Vec<CastAppearance>, Vec<CrewAppearance>) {
    let series = Series {
        id: details.id,
        name: details.name.clone(),
        original_name: details.original_name.clone(),
        overview: details.overview.clone(),
        genre_ids: details.genres.iter().map(|g| g.id).collect(),
        popularity: details.popularity,
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        poster_path: details.poster_path.clone(),
        backdrop_path: details.backdrop_path.clone(),
        first_air_date: details.first_air_date.clone(),
        origin_country: details.origin_country.clone(),
        original_language: details.original_language.clone(),
        added_at: chrono::Utc::now().to_rfc3339(),
    };

    let cast = details
        .credits
        .cast
        .iter()
        .map(|c| CastAppearance {
            person_id: c.id,
            series_id: details.id,
            name: c.name.clone(),
            character: c.character.clone(),
            billing_order: c.order,
            profile_path: c.profile_path.clone(),
        })
        .collect();

    let crew = details
        .credits
        .crew
        .iter()
        .map(|c| CrewAppearance {
            person_id: c.id,
            series_id: details.id,
            name: c.name.clone(),
            job: c.job.clone(),
            department: c.department.clone(),
            profile_path: c.profile_path.clone(),
        })
        .chain(details.created_by.iter().map(|c| CrewAppearance {
            person_id: c.id,
            series_id: details.id,
            name: c.name.clone(),
            job: CREATOR_JOB.to_string(),
            department: Some(CREATOR_JOB.to_string()),
            profile_path: c.profile_path.clone(),
        }))
        .collect();

    (series, cast, crew)
}

/// Flattens every credit across all person responses into related series
/// ids, deduplicated in first-seen order and excluding already-visited ids.
/// Every returned id is marked visited.
#[must_use]
pub fn related_series_ids(
    credit_sets: &[PersonTvCredits],
    visited: &mut HashSet<i64>,
) -> Vec<i64> {
    credit_sets
        .iter()
        .flat_map(|credits| credits.cast.iter().chain(credits.crew.iter()))
        .map(|credit| credit.id)
        .filter(|id| visited.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::tmdb::{CastCredit, Creator, Credits, CrewCredit, PersonCredit};

    fn person_credits(id: i64, series: &[i64]) -> PersonTvCredits {
        PersonTvCredits {
            id,
            cast: series
                .iter()
                .map(|&id| PersonCredit { id, name: None })
                .collect(),
            crew: vec![],
        }
    }

    #[test]
    fn related_ids_deduplicate() {
        let mut visited = HashSet::new();
        let sets = vec![person_credits(1, &[5, 5]), person_credits(2, &[7])];
        assert_eq!(related_series_ids(&sets, &mut visited), vec![5, 7]);
    }

    #[test]
    fn related_ids_skip_visited() {
        let mut visited = HashSet::from([5]);
        let sets = vec![person_credits(1, &[5, 7, 9])];
        assert_eq!(related_series_ids(&sets, &mut visited), vec![7, 9]);
        assert!(visited.contains(&9));
    }

    #[test]
    fn related_ids_span_cast_and_crew() {
        let mut visited = HashSet::new();
        let sets = vec![PersonTvCredits {
            id: 1,
            cast: vec![PersonCredit { id: 3, name: None }],
            crew: vec![
                PersonCredit { id: 4, name: None },
                PersonCredit { id: 3, name: None },
            ],
        }];
        assert_eq!(related_series_ids(&sets, &mut visited), vec![3, 4]);
    }

    #[test]
    fn batching_matches_rate_limit() {
        let people: Vec<i64> = (0..45).collect();
        let batches: Vec<&[i64]> = people.chunks(20).collect();
        assert_eq!(batches.len(), 45_usize.div_ceil(20));
        assert!(batches.iter().all(|b| b.len() <= 20));
        assert_eq!(batches.last().unwrap().len(), 5);
    }

    #[test]
    fn creators_become_pseudo_crew() {
        let details = SeriesDetails {
            id: 100,
            name: "Show".into(),
            original_name: "Show".into(),
            overview: String::new(),
            genres: vec![],
            origin_country: vec![],
            original_language: None,
            popularity: None,
            vote_average: None,
            vote_count: None,
            poster_path: None,
            backdrop_path: None,
            first_air_date: None,
            created_by: vec![Creator {
                id: 9,
                name: "Showmaker".into(),
                profile_path: None,
            }],
            credits: Credits {
                cast: vec![CastCredit {
                    id: 1,
                    name: "Lead".into(),
                    character: Some("Hero".into()),
                    order: 0,
                    profile_path: None,
                }],
                crew: vec![CrewCredit {
                    id: 2,
                    name: "Director".into(),
                    job: "Director".into(),
                    department: Some("Directing".into()),
                    profile_path: None,
                }],
            },
        };

        let (series, cast, crew) = normalize_details(&details);
        assert_eq!(series.id, 100);
        assert_eq!(cast.len(), 1);
        assert_eq!(crew.len(), 2);
        let creator = crew.iter().find(|c| c.person_id == 9).unwrap();
        assert_eq!(creator.job, CREATOR_JOB);
        assert_eq!(creator.series_id, 100);
    }
}
