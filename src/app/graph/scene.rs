use eframe::egui::{Color32, Vec2};

use crate::network::Network;

use super::super::physics::{SimLink, SimNode};
use super::super::render_utils::{link_stroke_width, node_radius, parse_css_color};

#[derive(Clone, Debug)]
pub(crate) struct NodeShape {
    pub(crate) id: String,
    pub(crate) center: Vec2,
    pub(crate) radius: f32,
    pub(crate) fill: Color32,
    pub(crate) pinned: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct LinkShape {
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) stroke_width: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scene {
    pub(crate) nodes: Vec<NodeShape>,
    pub(crate) links: Vec<LinkShape>,
}

impl Scene {
    pub(crate) fn bind(network: &Network) -> Self {
        let nodes = network
            .nodes
            .iter()
            .map(|record| NodeShape {
                id: record.id.clone(),
                center: Vec2::ZERO,
                radius: node_radius(record.n_appears),
                // SVG paints an unparseable fill as black.
                fill: parse_css_color(&record.colors).unwrap_or(Color32::BLACK),
                pinned: false,
            })
            .collect();

        let links = network
            .links
            .iter()
            .map(|link| LinkShape {
                from: Vec2::ZERO,
                to: Vec2::ZERO,
                stroke_width: link_stroke_width(link.record.proportion_coappearances),
            })
            .collect();

        Self { nodes, links }
    }

    pub(crate) fn sync(&mut self, nodes: &[SimNode], links: &[SimLink]) {
        for (shape, node) in self.nodes.iter_mut().zip(nodes) {
            shape.center = node.position;
            shape.pinned = node.is_pinned();
        }
        for (shape, link) in self.links.iter_mut().zip(links) {
            if let (Some(source), Some(target)) = (nodes.get(link.source), nodes.get(link.target)) {
                shape.from = source.position;
                shape.to = target.position;
            }
        }
    }

    // Topmost node whose circle contains `point`; later nodes are drawn on top.
    pub(crate) fn node_at(&self, point: Vec2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, shape)| (shape.center - point).length() <= shape.radius)
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::network::parse_network;

    fn network() -> Network {
        parse_network(
            r#"{
                "nodes": [
                    {"id": "A", "n_appears": 20, "colors": "rgb(10, 20, 30)"},
                    {"id": "B", "n_appears": 20, "colors": "mystery"}
                ],
                "links": [
                    {"source": "A", "target": "B",
                     "proportion_coappearances": 0.5, "number_coappearances": 3}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn binds_static_attributes_from_records() {
        let scene = Scene::bind(&network());
        assert!((scene.nodes[0].radius - 3.0 * 20.0_f32.ln()).abs() < 1e-4);
        assert_eq!(scene.nodes[0].fill, Color32::from_rgb(10, 20, 30));
        assert_eq!(scene.nodes[1].fill, Color32::BLACK);
        assert!((scene.links[0].stroke_width - 22.0 * 0.5_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn sync_copies_node_and_endpoint_positions() {
        let mut scene = Scene::bind(&network());
        let mut a = SimNode::new("A");
        a.position = vec2(100.0, 50.0);
        let mut b = SimNode::new("B");
        b.position = vec2(300.0, 250.0);
        b.pin(b.position);

        scene.sync(&[a, b], &[SimLink { source: 0, target: 1 }]);

        assert_eq!(scene.nodes[0].center, vec2(100.0, 50.0));
        assert!(!scene.nodes[0].pinned);
        assert!(scene.nodes[1].pinned);
        assert_eq!(scene.links[0].from, vec2(100.0, 50.0));
        assert_eq!(scene.links[0].to, vec2(300.0, 250.0));
    }

    #[test]
    fn hit_test_prefers_the_topmost_circle() {
        let mut scene = Scene::bind(&network());
        let mut a = SimNode::new("A");
        a.position = vec2(100.0, 100.0);
        let mut b = SimNode::new("B");
        b.position = vec2(104.0, 100.0);
        scene.sync(&[a, b], &[SimLink { source: 0, target: 1 }]);

        assert_eq!(scene.node_at(vec2(102.0, 100.0)), Some(1));
        assert_eq!(scene.node_at(vec2(93.0, 100.0)), Some(0));
        assert_eq!(scene.node_at(vec2(400.0, 400.0)), None);
    }
}
