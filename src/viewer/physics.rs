use eframe::egui::{Vec2, vec2};

use super::ViewerNode;

const SPRING_STRENGTH: f32 = 0.02;
const CENTER_PULL: f32 = 0.002;
const SOFTENING: f32 = 120.0;
const DAMPING: f32 = 0.85;
const MAX_SPEED: f32 = 28.0;
const SLEEP_SPEED_SQ: f32 = 0.02 * 0.02;

#[derive(Clone, Copy)]
pub(super) struct PhysicsConfig {
    pub(super) link_distance: f32,
    pub(super) repulsion: f32,
}

/// One simulation tick: link attraction toward the target distance, pairwise
/// repulsion, centering pull. A pinned node holds its pinned position and
/// contributes forces without receiving them. Returns whether anything still
/// moves, so the caller knows when the layout has visually converged.
pub(super) fn step_physics(
    nodes: &mut [ViewerNode],
    edges: &[(usize, usize)],
    config: PhysicsConfig,
) -> bool {
    let node_count = nodes.len();
    if node_count < 2 {
        return false;
    }

    let mut forces = vec![Vec2::ZERO; node_count];

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = nodes[i].world_pos - nodes[j].world_pos;
            let distance_sq = delta.length_sq();
            let direction = if distance_sq > 0.0001 {
                delta / distance_sq.sqrt()
            } else {
                // Coincident nodes get a deterministic push-apart direction.
                let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214)
                    * std::f32::consts::TAU;
                vec2(angle.cos(), angle.sin())
            };
            let push = direction * (config.repulsion / (distance_sq + SOFTENING));
            forces[i] += push;
            forces[j] -= push;
        }
    }

    for &(from, to) in edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let delta = nodes[from].world_pos - nodes[to].world_pos;
        let distance_sq = delta.length_sq();
        if distance_sq <= 0.0001 {
            continue;
        }
        let distance = distance_sq.sqrt();
        let direction = delta / distance;
        let correction = direction * ((distance - config.link_distance) * SPRING_STRENGTH);

        forces[from] -= correction;
        forces[to] += correction;
    }

    for (index, force) in forces.iter_mut().enumerate() {
        *force -= nodes[index].world_pos * CENTER_PULL;
    }

    let mut any_motion = false;
    for (index, force) in forces.iter().enumerate() {
        if let Some(pinned) = nodes[index].pinned {
            nodes[index].world_pos = pinned;
            nodes[index].velocity = Vec2::ZERO;
            continue;
        }

        let mut velocity = (nodes[index].velocity + *force) * DAMPING;
        let speed_sq = velocity.length_sq();
        if speed_sq > MAX_SPEED * MAX_SPEED {
            velocity *= MAX_SPEED / speed_sq.sqrt();
        }
        if velocity.length_sq() < SLEEP_SPEED_SQ {
            velocity = Vec2::ZERO;
        }

        nodes[index].velocity = velocity;
        nodes[index].world_pos += velocity;
        if velocity.length_sq() > 0.000_001 {
            any_motion = true;
        }
    }

    any_motion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::graph::NodeKind;

    fn node(x: f32, y: f32) -> ViewerNode {
        ViewerNode {
            key: format!("cast:{x}"),
            kind: NodeKind::Cast,
            label: String::new(),
            tracked: false,
            detail: None,
            radius: 8.0,
            world_pos: vec2(x, y),
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }

    const CONFIG: PhysicsConfig = PhysicsConfig {
        link_distance: 100.0,
        repulsion: 300.0,
    };

    #[test]
    fn pinned_node_never_moves() {
        let mut nodes = vec![node(0.0, 0.0), node(5.0, 0.0)];
        nodes[0].pinned = Some(vec2(0.0, 0.0));

        for _ in 0..50 {
            step_physics(&mut nodes, &[(0, 1)], CONFIG);
        }

        assert_eq!(nodes[0].world_pos, vec2(0.0, 0.0));
        assert_ne!(nodes[1].world_pos, vec2(5.0, 0.0));
    }

    #[test]
    fn linked_pair_settles_near_target_distance() {
        let mut nodes = vec![node(-300.0, 0.0), node(300.0, 0.0)];

        for _ in 0..600 {
            step_physics(&mut nodes, &[(0, 1)], CONFIG);
        }

        let distance = (nodes[0].world_pos - nodes[1].world_pos).length();
        assert!(
            (distance - CONFIG.link_distance).abs() < 35.0,
            "settled at {distance}"
        );
    }

    #[test]
    fn coincident_nodes_push_apart() {
        let mut nodes = vec![node(0.0, 0.0), node(0.0, 0.0)];
        step_physics(&mut nodes, &[], CONFIG);
        assert!((nodes[0].world_pos - nodes[1].world_pos).length() > 0.0);
    }

    #[test]
    fn single_node_reports_no_motion() {
        let mut nodes = vec![node(10.0, 10.0)];
        assert!(!step_physics(&mut nodes, &[], CONFIG));
    }
}
