use crate::config::Config;

use super::{open_store, parse_series_id};

pub async fn cmd_remove(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let Some(id) = parse_series_id(id_str) else {
        println!("Invalid series ID: {id_str}");
        println!("Use 'castgraph list' to see tracked IDs.");
        return Ok(());
    };

    let name = store
        .get_series(id)
        .await?
        .map_or_else(|| format!("series {id}"), |s| s.name);

    if !store.is_tracked(id).await? {
        println!("{name} is not tracked.");
        return Ok(());
    }

    println!("Untrack '{name}' (ID: {id})?");
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        if store.untrack(id).await? {
            println!("✓ Untracked: {name}");
            println!("  Stored records are kept and reused if you track it again.");
        } else {
            println!("Failed to untrack.");
        }
    } else {
        println!("Cancelled.");
    }

    Ok(())
}
