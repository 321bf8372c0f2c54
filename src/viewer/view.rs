use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use tracing::info;

use super::physics::{PhysicsConfig, step_physics};
use super::{ViewerApp, ViewerNode};
use crate::services::graph::NodeKind;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(110, 116, 128, 160);
const HIGHLIGHT: Color32 = Color32::from_rgb(255, 200, 60);
const LABEL_COLOR: Color32 = Color32::from_rgb(205, 210, 218);

fn node_color(node: &ViewerNode) -> Color32 {
    match node.kind {
        NodeKind::Series if node.tracked => Color32::from_rgb(226, 86, 86),
        NodeKind::Series => Color32::from_rgb(150, 82, 82),
        NodeKind::Cast => Color32::from_rgb(96, 190, 112),
        NodeKind::Crew => Color32::from_rgb(92, 140, 224),
    }
}

fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

impl ViewerApp {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, BACKGROUND);

        self.handle_zoom(ui, rect, &response);

        let moving = step_physics(
            &mut self.nodes,
            &self.edges,
            PhysicsConfig {
                link_distance: self.config.link_distance,
                repulsion: self.config.repulsion,
            },
        );

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = self.hovered_index(rect, pointer);

        self.handle_drag(rect, &response, hovered);

        if moving || self.dragged.is_some() {
            ui.ctx().request_repaint();
        }

        let highlight_active = hovered.is_some();

        for &(from, to) in &self.edges {
            let start = world_to_screen(rect, self.pan, self.zoom, self.nodes[from].world_pos);
            let end = world_to_screen(rect, self.pan, self.zoom, self.nodes[to].world_pos);
            let highlighted = hovered.is_some_and(|h| h == from || h == to);
            let stroke = if highlighted {
                Stroke::new(2.0, HIGHLIGHT)
            } else {
                Stroke::new(1.0, EDGE_COLOR)
            };
            painter.line_segment([start, end], stroke);
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let position = world_to_screen(rect, self.pan, self.zoom, node.world_pos);
            let radius = self.screen_radius(node);

            let neighbor_of_hovered =
                hovered.is_some_and(|h| self.neighbors[h].contains(&index));
            let fill = if hovered == Some(index) || neighbor_of_hovered {
                HIGHLIGHT
            } else {
                node_color(node)
            };

            painter.circle_filled(position, radius, fill);

            let show_label = node.kind == NodeKind::Series
                || hovered == Some(index)
                || (highlight_active && neighbor_of_hovered);
            if show_label && self.zoom > 0.35 {
                painter.text(
                    position + Vec2::new(0.0, radius + 3.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(11.0),
                    LABEL_COLOR,
                );
            }
        }

        if let Some(index) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
            if let Some(pointer) = pointer {
                self.draw_tooltip(&painter, rect, pointer, index);
            }

            if response.clicked() {
                // Placeholder action, mirroring the click-to-inspect stub.
                info!("Selected node {}", self.nodes[index].key);
            }
        }

        if self.nodes.is_empty() {
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Nothing to draw yet. Track a series first.",
                FontId::proportional(15.0),
                LABEL_COLOR,
            );
        }
    }

    fn screen_radius(&self, node: &ViewerNode) -> f32 {
        (node.radius * self.zoom.powf(0.4)).clamp(2.5, 40.0)
    }

    /// Scroll zooms about the pointer, clamped to the configured scale range.
    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(self.config.min_zoom, self.config.max_zoom);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    /// Primary drag on a node pins it to the pointer; dragging the
    /// background pans. Releasing a node lets the simulation take it back.
    fn handle_drag(&mut self, rect: Rect, response: &egui::Response, hovered: Option<usize>) {
        if response.drag_started() {
            self.dragged = hovered;
        }

        if response.dragged() {
            if let Some(index) = self.dragged {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.nodes[index].pinned =
                        Some(screen_to_world(rect, self.pan, self.zoom, pointer));
                }
            } else {
                self.pan += response.drag_delta();
            }
        }

        if response.drag_stopped()
            && let Some(index) = self.dragged.take()
        {
            self.nodes[index].pinned = None;
        }
    }

    fn hovered_index(&self, rect: Rect, pointer: Option<Pos2>) -> Option<usize> {
        let pointer = pointer.filter(|p| rect.contains(*p))?;

        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let position = world_to_screen(rect, self.pan, self.zoom, node.world_pos);
                let distance = position.distance(pointer);
                (distance <= self.screen_radius(node)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Overlay box next to the pointer with the node's label, kind, and
    /// detail line. The detail line is simply left out when the record had
    /// nothing to show.
    fn draw_tooltip(&self, painter: &egui::Painter, rect: Rect, pointer: Pos2, index: usize) {
        let node = &self.nodes[index];
        let kind_line = match node.kind {
            NodeKind::Series => "Series",
            NodeKind::Cast => "Cast",
            NodeKind::Crew => "Crew",
        };

        let mut galleys = vec![
            painter.layout_no_wrap(
                node.label.clone(),
                FontId::proportional(13.0),
                Color32::WHITE,
            ),
            painter.layout_no_wrap(
                kind_line.to_string(),
                FontId::proportional(11.0),
                Color32::from_rgb(170, 175, 184),
            ),
        ];
        if let Some(detail) = &node.detail {
            galleys.push(painter.layout_no_wrap(
                detail.clone(),
                FontId::proportional(11.0),
                LABEL_COLOR,
            ));
        }

        const PADDING: f32 = 6.0;
        let width = galleys
            .iter()
            .map(|g| g.size().x)
            .fold(0.0_f32, f32::max);
        let height: f32 = galleys.iter().map(|g| g.size().y + 2.0).sum();

        let mut origin = pointer + Vec2::new(14.0, 14.0);
        origin.x = origin.x.min(rect.right() - width - 2.0 * PADDING);
        origin.y = origin.y.min(rect.bottom() - height - 2.0 * PADDING);

        let box_rect = Rect::from_min_size(
            origin,
            Vec2::new(width + 2.0 * PADDING, height + 2.0 * PADDING),
        );
        painter.rect_filled(box_rect, 4.0, Color32::from_rgb(34, 39, 48));
        painter.rect_stroke(
            box_rect,
            4.0,
            Stroke::new(1.0, Color32::from_rgb(70, 78, 90)),
            egui::StrokeKind::Inside,
        );

        let mut cursor = origin + Vec2::new(PADDING, PADDING);
        for galley in galleys {
            let advance = galley.size().y + 2.0;
            painter.galley(cursor, galley, Color32::WHITE);
            cursor.y += advance;
        }
    }
}
