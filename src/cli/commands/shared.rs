use std::collections::HashMap;

use crate::config::Config;

use super::open_store;

struct Row {
    person_id: i64,
    name: String,
    role: String,
    series: String,
}

/// People appearing in more than one tracked series, most-shared first. The
/// tabular cousin of the graph view.
pub async fn cmd_shared(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let tracked = store.tracked_series().await?;

    if tracked.is_empty() {
        println!("No series tracked yet.");
        return Ok(());
    }

    let mut rows_by_person: HashMap<i64, Vec<Row>> = HashMap::new();

    for series in &tracked {
        for cast in store.cast_for_series(series.id).await? {
            rows_by_person.entry(cast.person_id).or_default().push(Row {
                person_id: cast.person_id,
                name: cast.name,
                role: cast.character.unwrap_or_else(|| "?".to_string()),
                series: series.name.clone(),
            });
        }
        for crew in store.crew_for_series(series.id).await? {
            rows_by_person.entry(crew.person_id).or_default().push(Row {
                person_id: crew.person_id,
                name: crew.name,
                role: crew.job,
                series: series.name.clone(),
            });
        }
    }

    let mut groups: Vec<Vec<Row>> = rows_by_person
        .into_values()
        .filter(|rows| rows.len() > 1)
        .collect();
    groups.sort_by_key(|rows| std::cmp::Reverse(rows.len()));

    if groups.is_empty() {
        println!("No shared people across tracked series yet.");
        println!("Track more series to find overlaps.");
        return Ok(());
    }

    println!("People shared across tracked series");
    println!("{:-<70}", "");

    for rows in groups {
        let first = &rows[0];
        println!(
            "{} (ID: {}, {} credits)",
            first.name,
            first.person_id,
            rows.len()
        );
        for row in &rows {
            println!("  {} — {}", row.series, row.role);
        }
        println!();
    }

    Ok(())
}
