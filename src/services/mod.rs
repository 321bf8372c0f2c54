pub mod crawler;
pub use crawler::{CrawlError, CrawlerService};

pub mod graph;
pub use graph::{GraphData, GraphLink, GraphNode, GraphService, ImportanceFilter, NodeKind};
