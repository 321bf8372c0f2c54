use crate::config::Config;
use crate::constants::limits::MAX_SEARCH_RESULTS;
use crate::db::Store;
use crate::services::CrawlerService;

use super::{open_store, parse_series_id, tmdb_client};

pub async fn cmd_add(config: &Config, query: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    if let Some(id) = parse_series_id(query) {
        return add_series(config, &store, id).await;
    }

    let tmdb = tmdb_client(config, &store)?;

    println!("Searching for: {query}");
    let response = tmdb.search_tv(query).await?;
    let results = response.results;

    if results.is_empty() {
        println!("No series found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for (i, series) in results.iter().enumerate().take(MAX_SEARCH_RESULTS) {
        let year = series
            .first_air_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .unwrap_or("?");

        println!("[{}] {} ({})", i + 1, series.name, year);
        if series.original_name != series.name && !series.original_name.is_empty() {
            println!("    Original: {}", series.original_name);
        }
        println!("    ID: {}", series.id);
        println!();
    }

    println!(
        "Enter number to track (1-{}), or 'q' to cancel:",
        results.len().min(MAX_SEARCH_RESULTS)
    );

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("q") || input.is_empty() {
        println!("Cancelled.");
        return Ok(());
    }

    let index: usize = match input.parse::<usize>() {
        Ok(n) if (1..=results.len().min(MAX_SEARCH_RESULTS)).contains(&n) => n - 1,
        _ => {
            println!("Invalid selection.");
            return Ok(());
        }
    };

    add_series(config, &store, results[index].id).await
}

/// Marks the series tracked, then runs the crawl expansion. The membership
/// toggle applies before the crawl, so a crawl failure leaves the series
/// tracked with whatever records made it into the store.
async fn add_series(config: &Config, store: &Store, series_id: i64) -> anyhow::Result<()> {
    if store.is_tracked(series_id).await? {
        println!("Series {series_id} is already tracked.");
        return Ok(());
    }

    let tmdb = tmdb_client(config, store)?;
    store.track(series_id).await?;

    println!("Crawling series {series_id} and its people...");

    let crawler = CrawlerService::new(store.clone(), tmdb, config.crawler.clone());
    let series = crawler.expand(series_id).await?;

    let (cast, crew) = store.credit_counts(series.id).await?;

    println!();
    println!("✓ Tracking: {} (ID: {})", series.name, series.id);
    println!("  Cast: {cast} | Crew: {crew}");
    println!();
    println!("Run 'castgraph graph' to see the picture.");

    Ok(())
}
