//! Derives a nodes/links view of the store, scoped to the tracked list.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::constants::limits::OVERVIEW_SNIPPET_CHARS;
use crate::db::Store;
use crate::models::person::{CastAppearance, CrewAppearance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Series,
    Cast,
    Crew,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => write!(f, "series"),
            Self::Cast => write!(f, "cast"),
            Self::Crew => write!(f, "crew"),
        }
    }
}

/// Stable node identity: entity kind plus external id. Two people sharing a
/// name stay distinct; one person across several series collapses.
#[must_use]
pub fn node_key(kind: NodeKind, entity_id: i64) -> String {
    format!("{kind}:{entity_id}")
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub key: String,
    pub kind: NodeKind,
    pub entity_id: i64,
    pub label: String,
    /// Series in the tracked list. People and merely-related series are not
    /// tracked.
    pub tracked: bool,
    /// Tooltip line; absent when the underlying record had nothing to show.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    /// Edge endpoints per node key.
    pub degree: HashMap<String, usize>,
    /// Degree ignoring connections to degree-1 neighbors; drives node radius
    /// so one-credit people stay small.
    pub filtered_degree: HashMap<String, usize>,
}

/// Billing-order cutoff for cast and job allow-list for crew. Shared between
/// the crawler's people expansion and graph synthesis so both agree on who
/// matters.
#[derive(Debug, Clone)]
pub struct ImportanceFilter {
    billing_order_cutoff: i32,
    important_jobs: HashSet<String>,
}

impl ImportanceFilter {
    #[must_use]
    pub fn new(billing_order_cutoff: i32, important_jobs: Vec<String>) -> Self {
        Self {
            billing_order_cutoff,
            important_jobs: important_jobs.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn important_cast(&self, cast: &CastAppearance) -> bool {
        cast.billing_order <= self.billing_order_cutoff
    }

    #[must_use]
    pub fn important_crew(&self, crew: &CrewAppearance) -> bool {
        self.important_jobs.contains(&crew.job)
    }
}

pub struct GraphService {
    store: Store,
    filter: ImportanceFilter,
}

impl GraphService {
    #[must_use]
    pub const fn new(store: Store, filter: ImportanceFilter) -> Self {
        Self { store, filter }
    }

    /// Recomputes the graph from the store and the tracked list. Pure
    /// derivation: nothing here mutates the store, and the result is never
    /// persisted.
    pub async fn synthesize(&self) -> anyhow::Result<GraphData> {
        let tracked = self.store.tracked_series().await?;

        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut links: Vec<GraphLink> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for series in &tracked {
            let series_key = node_key(NodeKind::Series, series.id);
            if seen.insert(series_key.clone()) {
                nodes.push(GraphNode {
                    key: series_key.clone(),
                    kind: NodeKind::Series,
                    entity_id: series.id,
                    label: series.name.clone(),
                    tracked: true,
                    detail: overview_snippet(&series.overview),
                });
            }

            for cast in self.store.cast_for_series(series.id).await? {
                if !self.filter.important_cast(&cast) {
                    continue;
                }
                let person_key = node_key(NodeKind::Cast, cast.person_id);
                if seen.insert(person_key.clone()) {
                    nodes.push(GraphNode {
                        key: person_key.clone(),
                        kind: NodeKind::Cast,
                        entity_id: cast.person_id,
                        label: cast.name.clone(),
                        tracked: false,
                        detail: cast.character.clone(),
                    });
                }
                links.push(GraphLink {
                    source: series_key.clone(),
                    target: person_key,
                });
            }

            for crew in self.store.crew_for_series(series.id).await? {
                if !self.filter.important_crew(&crew) {
                    continue;
                }
                let person_key = node_key(NodeKind::Crew, crew.person_id);
                if seen.insert(person_key.clone()) {
                    nodes.push(GraphNode {
                        key: person_key.clone(),
                        kind: NodeKind::Crew,
                        entity_id: crew.person_id,
                        label: crew.name.clone(),
                        tracked: false,
                        detail: Some(crew.job.clone()),
                    });
                }
                links.push(GraphLink {
                    source: series_key.clone(),
                    target: person_key,
                });
            }
        }

        let degree = degree_map(&links);
        let filtered_degree = filtered_degree_map(&links, &degree);

        Ok(GraphData {
            nodes,
            links,
            degree,
            filtered_degree,
        })
    }
}

fn overview_snippet(overview: &str) -> Option<String> {
    let trimmed = overview.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() <= OVERVIEW_SNIPPET_CHARS {
        return Some(trimmed.to_string());
    }
    let cut: String = trimmed.chars().take(OVERVIEW_SNIPPET_CHARS).collect();
    Some(format!("{}…", cut.trim_end()))
}

#[must_use]
pub fn degree_map(links: &[GraphLink]) -> HashMap<String, usize> {
    let mut degree: HashMap<String, usize> = HashMap::new();
    for link in links {
        *degree.entry(link.source.clone()).or_default() += 1;
        *degree.entry(link.target.clone()).or_default() += 1;
    }
    degree
}

/// Degree that ignores endpoint contributions from degree-1 neighbors, so a
/// hub's size reflects connections to nodes that are themselves connected.
#[must_use]
pub fn filtered_degree_map(
    links: &[GraphLink],
    degree: &HashMap<String, usize>,
) -> HashMap<String, usize> {
    let mut filtered: HashMap<String, usize> = HashMap::new();
    for link in links {
        if degree.get(&link.target).copied().unwrap_or(0) > 1 {
            *filtered.entry(link.source.clone()).or_default() += 1;
        }
        if degree.get(&link.source).copied().unwrap_or(0) > 1 {
            *filtered.entry(link.target.clone()).or_default() += 1;
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(source: &str, target: &str) -> GraphLink {
        GraphLink {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn node_keys_are_kind_scoped() {
        assert_eq!(node_key(NodeKind::Cast, 42), "cast:42");
        assert_eq!(node_key(NodeKind::Crew, 42), "crew:42");
        assert_ne!(node_key(NodeKind::Cast, 42), node_key(NodeKind::Crew, 42));
    }

    #[test]
    fn degree_counts_endpoints() {
        let links = vec![
            link("series:1", "cast:10"),
            link("series:2", "cast:10"),
            link("series:1", "crew:20"),
        ];
        let degree = degree_map(&links);
        assert_eq!(degree["cast:10"], 2);
        assert_eq!(degree["series:1"], 2);
        assert_eq!(degree["crew:20"], 1);
    }

    #[test]
    fn filtered_degree_ignores_leaves() {
        // crew:20 has one edge, so series:1 gets no credit for it.
        let links = vec![
            link("series:1", "cast:10"),
            link("series:2", "cast:10"),
            link("series:1", "crew:20"),
        ];
        let degree = degree_map(&links);
        let filtered = filtered_degree_map(&links, &degree);
        assert_eq!(filtered["series:1"], 1);
        // cast:10 only gets credit for series:1; series:2 is itself a leaf.
        assert_eq!(filtered["cast:10"], 1);
        assert_eq!(filtered.get("series:2").copied().unwrap_or(0), 1);
    }

    #[test]
    fn importance_filter_matches_cutoff_and_jobs() {
        let filter = ImportanceFilter::new(10, vec!["Director".to_string()]);
        let lead = CastAppearance {
            person_id: 1,
            series_id: 100,
            name: "Lead".into(),
            character: None,
            billing_order: 0,
            profile_path: None,
        };
        let extra = CastAppearance {
            billing_order: 30,
            ..lead.clone()
        };
        assert!(filter.important_cast(&lead));
        assert!(!filter.important_cast(&extra));

        let director = CrewAppearance {
            person_id: 2,
            series_id: 100,
            name: "D".into(),
            job: "Director".into(),
            department: None,
            profile_path: None,
        };
        let gaffer = CrewAppearance {
            job: "Gaffer".into(),
            ..director.clone()
        };
        assert!(filter.important_crew(&director));
        assert!(!filter.important_crew(&gaffer));
    }

    #[test]
    fn overview_snippets_trim_long_text() {
        assert_eq!(overview_snippet("  "), None);
        assert_eq!(overview_snippet("short"), Some("short".to_string()));
        let long = "x".repeat(500);
        let snippet = overview_snippet(&long).unwrap();
        assert!(snippet.chars().count() <= OVERVIEW_SNIPPET_CHARS + 1);
        assert!(snippet.ends_with('…'));
    }
}
