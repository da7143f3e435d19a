use eframe::egui::Vec2;

use crate::util::fallback_direction;

use super::quadtree::QuadNode;
use super::{SimLink, SimNode};

const JIGGLE: f32 = 1e-6;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
    pub(super) distance_max_sq: f32,
}

fn charge_between(delta: Vec2, charge: f32, params: ChargeParams) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq >= params.distance_max_sq {
        return Vec2::ZERO;
    }
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    delta * (charge / distance_sq)
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strengths: &[f32],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.strength == 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let mut delta = positions[other_index] - point;
            if delta.length_sq() == 0.0 {
                delta = fallback_direction(index, other_index) * JIGGLE;
            }
            *velocity += charge_between(delta, strengths[other_index] * params.alpha, params);
        }
        return;
    }

    let delta = node.center_of_charge - point;
    let width = node.bounds.side_length();
    let can_approximate =
        !node.bounds.contains(point) && (width * width) / params.theta_sq < delta.length_sq();

    if can_approximate {
        *velocity += charge_between(delta, node.strength * params.alpha, params);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strengths, params, velocity);
    }
}

pub(super) struct LinkTerms {
    pub(super) strength: f32,
    pub(super) bias: f32,
}

pub(super) fn link_terms(node_count: usize, links: &[SimLink]) -> Vec<LinkTerms> {
    let mut degree = vec![0usize; node_count];
    for link in links {
        degree[link.source] += 1;
        degree[link.target] += 1;
    }

    links
        .iter()
        .map(|link| {
            let source = degree[link.source] as f32;
            let target = degree[link.target] as f32;
            LinkTerms {
                strength: 1.0 / source.min(target),
                bias: source / (source + target),
            }
        })
        .collect()
}

// Springs every link toward `distance`, reading positions one step ahead.
// Velocities are updated in link order, so later links see earlier corrections.
pub(super) fn apply_link_force(
    nodes: &mut [SimNode],
    links: &[SimLink],
    terms: &[LinkTerms],
    distance: f32,
    alpha: f32,
) {
    for (link, term) in links.iter().zip(terms) {
        let (source, target) = (link.source, link.target);
        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta.length_sq() == 0.0 {
            delta = fallback_direction(source, target) * JIGGLE;
        }

        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * term.strength);

        nodes[target].velocity -= correction * term.bias;
        nodes[source].velocity += correction * (1.0 - term.bias);
    }
}

pub(super) fn apply_center_force(nodes: &mut [SimNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let shift = centroid - center;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}
