//! Interactive force-directed rendering of a synthesized graph.

use std::collections::HashMap;

use eframe::egui::{self, Vec2, vec2};

use crate::config::ViewerConfig;
use crate::services::graph::{GraphData, NodeKind};

mod physics;
mod view;

pub(crate) struct ViewerNode {
    key: String,
    kind: NodeKind,
    label: String,
    tracked: bool,
    detail: Option<String>,
    /// Base radius in world units, scaled from the filtered degree.
    radius: f32,
    world_pos: Vec2,
    velocity: Vec2,
    /// Pointer-pinned position while dragged; released nodes resume free
    /// simulation.
    pinned: Option<Vec2>,
}

pub struct ViewerApp {
    nodes: Vec<ViewerNode>,
    edges: Vec<(usize, usize)>,
    neighbors: Vec<Vec<usize>>,
    pan: Vec2,
    zoom: f32,
    dragged: Option<usize>,
    config: ViewerConfig,
}

impl ViewerApp {
    #[must_use]
    pub fn new(graph: &GraphData, config: ViewerConfig) -> Self {
        let mut index_by_key: HashMap<&str, usize> = HashMap::new();

        let nodes: Vec<ViewerNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                index_by_key.insert(node.key.as_str(), index);
                let filtered = graph.filtered_degree.get(&node.key).copied().unwrap_or(0);
                ViewerNode {
                    key: node.key.clone(),
                    kind: node.kind,
                    label: node.label.clone(),
                    tracked: node.tracked,
                    detail: node.detail.clone(),
                    radius: node_radius(filtered),
                    world_pos: seed_position(index, graph.nodes.len()),
                    velocity: Vec2::ZERO,
                    pinned: None,
                }
            })
            .collect();

        let edges: Vec<(usize, usize)> = graph
            .links
            .iter()
            .filter_map(|link| {
                let from = index_by_key.get(link.source.as_str())?;
                let to = index_by_key.get(link.target.as_str())?;
                Some((*from, *to))
            })
            .collect();

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for &(from, to) in &edges {
            neighbors[from].push(to);
            neighbors[to].push(from);
        }

        Self {
            nodes,
            edges,
            neighbors,
            pan: Vec2::ZERO,
            zoom: 1.0,
            dragged: None,
            config,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }
}

/// Opens a native window and runs the viewer until closed.
pub fn run(graph: &GraphData, config: ViewerConfig) -> eframe::Result<()> {
    let app = ViewerApp::new(graph, config);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native("castgraph", options, Box::new(move |_cc| Ok(Box::new(app))))
}

fn node_radius(filtered_degree: usize) -> f32 {
    (6.0 + (filtered_degree as f32).sqrt() * 3.0).min(26.0)
}

/// Deterministic golden-angle spiral so the simulation starts from a spread
/// state instead of a degenerate pile.
fn seed_position(index: usize, total: usize) -> Vec2 {
    let spread = ((total.max(1) as f32).sqrt() * 60.0).max(120.0);
    let angle = (index as f32) * 2.399_963;
    let distance = spread * ((index as f32 + 0.5) / total.max(1) as f32).sqrt();
    vec2(angle.cos() * distance, angle.sin() * distance)
}
