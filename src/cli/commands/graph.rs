use crate::config::Config;
use crate::services::{GraphService, ImportanceFilter};
use crate::viewer;

use super::open_store;

pub async fn cmd_graph(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let filter = ImportanceFilter::new(
        config.crawler.billing_order_cutoff,
        config.crawler.important_jobs.clone(),
    );
    let graph = GraphService::new(store, filter).synthesize().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
        return Ok(());
    }

    if graph.nodes.is_empty() {
        println!("Nothing to draw yet. Track a series first:");
        println!("  castgraph add \"series name\"");
        return Ok(());
    }

    println!(
        "Rendering {} nodes and {} links...",
        graph.nodes.len(),
        graph.links.len()
    );

    viewer::run(&graph, config.viewer.clone())
        .map_err(|e| anyhow::anyhow!("Viewer failed: {e}"))?;

    Ok(())
}
