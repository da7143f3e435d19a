mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use forces::{
    ChargeParams, LinkTerms, accumulate_charge_for_node, apply_center_force, apply_link_force,
    link_terms,
};
use quadtree::QuadNode;

use super::render_utils::VIEWBOX;

const INITIAL_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
pub(crate) struct SimulationConfig {
    pub(crate) charge: f32,
    pub(crate) theta: f32,
    pub(crate) distance_min: f32,
    pub(crate) distance_max: f32,
    pub(crate) link_distance: f32,
    pub(crate) center: Vec2,
    pub(crate) velocity_decay: f32,
    pub(crate) alpha_min: f32,
    pub(crate) alpha_decay: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            charge: -800.0,
            theta: 0.9,
            distance_min: 1.0,
            distance_max: f32::INFINITY,
            link_distance: 30.0,
            center: VIEWBOX * 0.5,
            velocity_decay: 0.6,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SimNode {
    pub(crate) id: String,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) fx: Option<f32>,
    pub(crate) fy: Option<f32>,
}

impl SimNode {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            fx: None,
            fy: None,
        }
    }

    pub(crate) fn pin(&mut self, at: Vec2) {
        self.fx = Some(at.x);
        self.fy = Some(at.y);
    }

    pub(crate) fn unpin(&mut self) {
        self.fx = None;
        self.fy = None;
    }

    pub(crate) fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SimLink {
    pub(crate) source: usize,
    pub(crate) target: usize,
}

pub(crate) type TickListener = Box<dyn FnMut(&[SimNode], &[SimLink])>;

pub(crate) struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    link_terms: Vec<LinkTerms>,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    ticks: u64,
    listeners: Vec<TickListener>,
    positions: Vec<Vec2>,
    strengths: Vec<f32>,
}

impl Simulation {
    pub(crate) fn new(mut nodes: Vec<SimNode>, links: Vec<SimLink>, config: SimulationConfig) -> Self {
        place_on_spiral(&mut nodes);
        let link_terms = link_terms(nodes.len(), &links);
        let strengths = vec![config.charge; nodes.len()];

        Self {
            nodes,
            links,
            link_terms,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            ticks: 0,
            listeners: Vec::new(),
            positions: Vec::new(),
            strengths,
        }
    }

    pub(crate) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(crate) fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut SimNode> {
        self.nodes.get_mut(index)
    }

    pub(crate) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(crate) fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub(crate) fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub(crate) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn restart(&mut self) {
        if !self.running {
            debug!(alpha = self.alpha, "simulation restarted");
        }
        self.running = true;
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn on_tick(&mut self, listener: impl FnMut(&[SimNode], &[SimLink]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn tick(&mut self) {
        let alpha = self.alpha;

        apply_link_force(
            &mut self.nodes,
            &self.links,
            &self.link_terms,
            self.config.link_distance,
            alpha,
        );
        self.apply_charge(alpha);
        apply_center_force(&mut self.nodes, self.config.center);

        let decay = self.config.velocity_decay;
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.position.x = fx;
                    node.velocity.x = 0.0;
                }
                None => {
                    node.velocity.x *= decay;
                    node.position.x += node.velocity.x;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.position.y = fy;
                    node.velocity.y = 0.0;
                }
                None => {
                    node.velocity.y *= decay;
                    node.position.y += node.velocity.y;
                }
            }
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.alpha = self.alpha.clamp(0.0, 1.0);
        self.ticks += 1;
    }

    // One scheduled step: tick, notify, then stop once alpha falls below the
    // minimum. Returns false without doing anything while stopped.
    pub(crate) fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        for listener in &mut self.listeners {
            listener(&self.nodes, &self.links);
        }

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(ticks = self.ticks, "simulation settled");
        }
        true
    }

    fn apply_charge(&mut self, alpha: f32) {
        if self.nodes.len() < 2 {
            return;
        }

        self.positions.clear();
        self.positions
            .extend(self.nodes.iter().map(|node| node.position));
        let Some(tree) = QuadNode::build(&self.positions, &self.strengths) else {
            return;
        };

        let params = ChargeParams {
            alpha,
            theta_sq: self.config.theta * self.config.theta,
            distance_min_sq: self.config.distance_min * self.config.distance_min,
            distance_max_sq: self.config.distance_max * self.config.distance_max,
        };
        for (index, node) in self.nodes.iter_mut().enumerate() {
            accumulate_charge_for_node(
                &tree,
                index,
                &self.positions,
                &self.strengths,
                params,
                &mut node.velocity,
            );
        }
    }
}

fn place_on_spiral(nodes: &mut [SimNode]) {
    let angle_step = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    for (index, node) in nodes.iter_mut().enumerate() {
        let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
        let angle = index as f32 * angle_step;
        node.position = vec2(radius * angle.cos(), radius * angle.sin());
        node.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn simulation(node_count: usize, links: &[(usize, usize)], charge: f32) -> Simulation {
        let nodes = (0..node_count)
            .map(|index| SimNode::new(format!("n{index}")))
            .collect();
        let links = links
            .iter()
            .map(|&(source, target)| SimLink { source, target })
            .collect();
        Simulation::new(
            nodes,
            links,
            SimulationConfig {
                charge,
                ..SimulationConfig::default()
            },
        )
    }

    fn spread(sim: &Simulation) -> f32 {
        let center = SimulationConfig::default().center;
        sim.nodes()
            .iter()
            .map(|node| (node.position - center).length())
            .sum::<f32>()
            / sim.nodes().len() as f32
    }

    #[test]
    fn spiral_placement_is_distinct() {
        let sim = simulation(5, &[], -800.0);
        for (index, node) in sim.nodes().iter().enumerate() {
            for other in &sim.nodes()[index + 1..] {
                assert!((node.position - other.position).length() > 1.0);
            }
        }
    }

    #[test]
    fn isolated_node_converges_monotonically_to_center() {
        let mut sim = simulation(1, &[], -800.0);
        sim.node_mut(0).unwrap().position = vec2(10.0, 20.0);
        let center = SimulationConfig::default().center;

        let mut previous = (sim.nodes()[0].position - center).length();
        for _ in 0..50 {
            sim.tick();
            let distance = (sim.nodes()[0].position - center).length();
            assert!(distance <= previous + 1e-4);
            previous = distance;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn pinned_node_sits_exactly_on_its_fixed_position_every_tick() {
        let mut sim = simulation(6, &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5)], -800.0);
        sim.node_mut(2).unwrap().pin(vec2(123.5, 456.25));

        for _ in 0..40 {
            sim.tick();
            let node = &sim.nodes()[2];
            assert_eq!(node.position, vec2(123.5, 456.25));
            assert_eq!(node.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn single_axis_pin_leaves_other_axis_free() {
        let mut sim = simulation(3, &[(0, 1), (1, 2)], -800.0);
        sim.node_mut(1).unwrap().fx = Some(100.0);
        let start_y = sim.nodes()[1].position.y;
        for _ in 0..10 {
            sim.tick();
            assert_eq!(sim.nodes()[1].position.x, 100.0);
        }
        assert_ne!(sim.nodes()[1].position.y, start_y);
    }

    #[test]
    fn alpha_decays_toward_target_and_stops() {
        let mut sim = simulation(4, &[(0, 1), (2, 3)], -800.0);
        let mut steps = 0;
        let mut previous = sim.alpha();
        while sim.step() {
            assert!(sim.alpha() < previous);
            assert!((0.0..=1.0).contains(&sim.alpha()));
            previous = sim.alpha();
            steps += 1;
            assert!(steps < 1_000, "simulation never settled");
        }
        assert!(!sim.is_running());
        assert!(sim.alpha() < 0.001);
        // 1 - alpha_min^(1/300) reaches alpha_min in about 300 steps from 1.0.
        assert!((295..=305).contains(&steps), "settled after {steps} steps");
    }

    #[test]
    fn positive_target_keeps_the_simulation_warm() {
        let mut sim = simulation(2, &[(0, 1)], -800.0);
        sim.set_alpha_target(0.3);
        for _ in 0..2_000 {
            assert!(sim.step());
        }
        assert!((sim.alpha() - 0.3).abs() < 1e-3);

        sim.set_alpha_target(0.0);
        let mut steps = 0;
        while sim.step() {
            steps += 1;
            assert!(steps < 1_000);
        }
        assert!(!sim.is_running());
    }

    #[test]
    fn alpha_setters_clamp_to_unit_range() {
        let mut sim = simulation(1, &[], -800.0);
        sim.set_alpha(4.0);
        assert_eq!(sim.alpha(), 1.0);
        sim.set_alpha_target(-2.0);
        assert_eq!(sim.alpha_target(), 0.0);
    }

    #[test]
    fn stopped_simulation_does_not_step_until_restarted() {
        let mut sim = simulation(2, &[(0, 1)], -800.0);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        sim.on_tick(move |nodes, links| {
            assert_eq!(nodes.len(), 2);
            assert_eq!(links.len(), 1);
            counter.set(counter.get() + 1);
        });

        assert!(sim.step());
        sim.stop();
        assert!(!sim.step());
        assert_eq!(calls.get(), 1);
        assert_eq!(sim.ticks(), 1);

        sim.restart();
        assert!(sim.step());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn tick_does_not_notify_listeners() {
        let mut sim = simulation(2, &[], -800.0);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        sim.on_tick(move |_, _| counter.set(counter.get() + 1));
        sim.tick();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn stronger_negative_charge_spreads_the_layout() {
        let links = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)];
        let mut weak = simulation(8, &links, -30.0);
        let mut strong = simulation(8, &links, -800.0);
        for _ in 0..300 {
            weak.tick();
            strong.tick();
        }
        assert!(spread(&strong) > spread(&weak));
    }

    #[test]
    fn linked_pair_settles_near_balanced_separation() {
        let mut sim = simulation(2, &[(0, 1)], -800.0);
        while sim.step() {}
        let separation = (sim.nodes()[0].position - sim.nodes()[1].position).length();
        assert!(separation > 30.0, "repulsion should stretch the link, got {separation}");
        assert!(separation.is_finite());
    }
}
