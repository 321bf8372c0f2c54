use crate::config::Config;
use crate::constants::limits::MAX_SEARCH_RESULTS;

use super::{open_store, tmdb_client};

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let tmdb = tmdb_client(config, &store)?;

    println!("Searching for: {query}");

    let response = tmdb.search_tv(query).await?;
    if response.results.is_empty() {
        println!("No series found matching '{query}'");
        return Ok(());
    }

    // Refresh the genre table opportunistically so results show names
    // instead of raw ids.
    if let Ok(list) = tmdb.tv_genres().await {
        let pairs: Vec<(i64, String)> = list.genres.into_iter().map(|g| (g.id, g.name)).collect();
        store.put_genres(&pairs).await?;
    }
    let genre_names = store.genre_names().await?;

    println!();
    println!(
        "Search Results ({} of {} total)",
        response.results.len().min(MAX_SEARCH_RESULTS),
        response.total_results
    );
    println!("{:-<70}", "");

    for result in response.results.iter().take(MAX_SEARCH_RESULTS) {
        let tracked = store.is_tracked(result.id).await?;
        let marker = if tracked { "★" } else { " " };
        let year = result
            .first_air_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .unwrap_or("?");

        println!("{} {} ({})", marker, result.name, year);
        if result.original_name != result.name && !result.original_name.is_empty() {
            println!("    Original: {}", result.original_name);
        }

        let genres: Vec<&str> = result
            .genre_ids
            .iter()
            .filter_map(|id| genre_names.get(id).map(String::as_str))
            .collect();
        if !genres.is_empty() {
            println!("    Genres: {}", genres.join(", "));
        }

        println!(
            "    Popularity: {:.1} | Votes: {:.1} ({}) | ID: {}",
            result.popularity.unwrap_or(0.0),
            result.vote_average.unwrap_or(0.0),
            result.vote_count.unwrap_or(0),
            result.id
        );
        println!();
    }

    println!("Track one with: castgraph add <id>");

    Ok(())
}
