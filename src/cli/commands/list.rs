use crate::config::Config;

use super::open_store;

pub async fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let series_list = store.tracked_series().await?;

    if series_list.is_empty() {
        println!("No series tracked yet.");
        println!();
        println!("Track one with: castgraph add \"series name\"");
        return Ok(());
    }

    println!("Tracked Series ({} total)", series_list.len());
    println!("{:-<70}", "");

    for series in series_list {
        let (cast, crew) = store.credit_counts(series.id).await?;
        let year = series
            .first_air_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .unwrap_or("?");

        println!("{} ({})", series.name, year);
        println!(
            "  ID: {} | Cast: {} | Crew: {} | Rating: {:.1}",
            series.id,
            cast,
            crew,
            series.vote_average.unwrap_or(0.0)
        );
    }

    Ok(())
}
