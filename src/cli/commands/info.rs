use crate::config::Config;
use crate::services::ImportanceFilter;

use super::{open_store, parse_series_id, tmdb_client};

pub async fn cmd_info(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let Some(id) = parse_series_id(id_str) else {
        println!("Invalid series ID: {id_str}");
        return Ok(());
    };

    let Some(series) = store.get_series(id).await? else {
        println!("Series {id} is not in the local store.");
        println!("Track it first with: castgraph add {id}");
        return Ok(());
    };

    let mut genre_names = store.genre_names().await?;
    if genre_names.is_empty()
        && config.has_api_token()
        && let Ok(tmdb) = tmdb_client(config, &store)
        && let Ok(list) = tmdb.tv_genres().await
    {
        let pairs: Vec<(i64, String)> = list.genres.into_iter().map(|g| (g.id, g.name)).collect();
        store.put_genres(&pairs).await?;
        genre_names = store.genre_names().await?;
    }

    let tracked = store.is_tracked(id).await?;

    println!("{}", series.name);
    if series.original_name != series.name && !series.original_name.is_empty() {
        println!("{}", series.original_name);
    }
    println!("{:-<70}", "");
    println!(
        "ID: {} | Tracked: {} | First aired: {}",
        series.id,
        if tracked { "yes" } else { "no" },
        series.first_air_date.as_deref().unwrap_or("?")
    );

    let genres: Vec<&str> = series
        .genre_ids
        .iter()
        .filter_map(|gid| genre_names.get(gid).map(String::as_str))
        .collect();
    if !genres.is_empty() {
        println!("Genres: {}", genres.join(", "));
    }

    println!(
        "Popularity: {:.1} | Votes: {:.1} ({})",
        series.popularity.unwrap_or(0.0),
        series.vote_average.unwrap_or(0.0),
        series.vote_count.unwrap_or(0)
    );

    if !series.overview.trim().is_empty() {
        println!();
        println!("{}", series.overview.trim());
    }

    let filter = ImportanceFilter::new(
        config.crawler.billing_order_cutoff,
        config.crawler.important_jobs.clone(),
    );

    let cast = store.cast_for_series(id).await?;
    let important_cast: Vec<_> = cast.iter().filter(|c| filter.important_cast(c)).collect();
    if !important_cast.is_empty() {
        println!();
        println!("Top-billed cast:");
        for member in important_cast {
            let role = member.character.as_deref().unwrap_or("?");
            println!("  {} as {}", member.name, role);
        }
    }

    let crew = store.crew_for_series(id).await?;
    let important_crew: Vec<_> = crew.iter().filter(|c| filter.important_crew(c)).collect();
    if !important_crew.is_empty() {
        println!();
        println!("Key crew:");
        for member in important_crew {
            println!("  {} — {}", member.name, member.job);
        }
    }

    Ok(())
}
