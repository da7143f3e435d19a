use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 4;
const QUADTREE_MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let half_extent = (span_x.max(span_y) * 0.5) + 1.0;

        Some(Self {
            center,
            half_extent,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let min = self.center - vec2(self.half_extent, self.half_extent);
        let max = self.center + vec2(self.half_extent, self.half_extent);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let upper = point.y >= self.center.y;
        match (right, upper) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }
}

// `strength` is the signed sum of the bodies' charges below the cell and
// `center_of_charge` their mean position weighted by `|strength|`.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_charge: Vec2,
    pub(super) strength: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], strengths: &[f32]) -> Option<Self> {
        if positions.len() != strengths.len() {
            return None;
        }
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, strengths, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        strengths: &[f32],
        depth: usize,
    ) -> Self {
        let mut strength = 0.0;
        let mut weight = 0.0;
        let mut weighted = Vec2::ZERO;
        let mut plain = Vec2::ZERO;
        for &index in &indices {
            let charge = strengths[index];
            strength += charge;
            weight += charge.abs();
            weighted += positions[index] * charge.abs();
            plain += positions[index];
        }

        let center_of_charge = if weight > 0.0 {
            weighted / weight
        } else if indices.is_empty() {
            bounds.center
        } else {
            plain / indices.len() as f32
        };

        let mut node = Self {
            bounds,
            center_of_charge,
            strength,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child_bounds = bounds.child(quadrant);
            node.children[quadrant] = Some(Box::new(Self::build_node(
                child_bounds,
                bucket,
                positions,
                strengths,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|index| vec2((index % 7) as f32 * 13.0, (index / 7) as f32 * 11.0))
            .collect()
    }

    fn count_bodies(node: &QuadNode) -> usize {
        node.indices.len()
            + node
                .children
                .iter()
                .flatten()
                .map(|child| count_bodies(child))
                .sum::<usize>()
    }

    #[test]
    fn every_body_lands_in_exactly_one_leaf() {
        let positions = grid(40);
        let root = QuadNode::build(&positions, &vec![-800.0; 40]).unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.strength, -32_000.0);
        assert_eq!(count_bodies(&root), 40);
    }

    #[test]
    fn equal_charges_put_the_center_at_the_mean() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0), vec2(0.0, 10.0)];
        let root = QuadNode::build(&positions, &[-30.0; 4]).unwrap();
        assert!((root.center_of_charge - vec2(5.0, 5.0)).length() < 1e-5);
        for point in &positions {
            assert!(root.bounds.contains(*point));
        }
    }

    #[test]
    fn center_is_weighted_by_charge_magnitude() {
        let positions = vec![vec2(0.0, 0.0), vec2(12.0, 0.0)];
        let root = QuadNode::build(&positions, &[-30.0, 10.0]).unwrap();
        assert_eq!(root.strength, -20.0);
        assert!((root.center_of_charge - vec2(3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn neutral_bodies_fall_back_to_the_plain_mean() {
        let positions = vec![vec2(0.0, 0.0), vec2(8.0, 4.0)];
        let root = QuadNode::build(&positions, &[0.0, 0.0]).unwrap();
        assert_eq!(root.strength, 0.0);
        assert!((root.center_of_charge - vec2(4.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn coincident_bodies_share_a_leaf() {
        let positions = vec![vec2(3.0, 3.0); 9];
        let root = QuadNode::build(&positions, &[-1.0; 9]).unwrap();
        assert!(root.is_leaf());
        assert_eq!(count_bodies(&root), 9);
    }

    #[test]
    fn empty_mismatched_or_non_finite_input_builds_nothing() {
        assert!(QuadNode::build(&[], &[]).is_none());
        assert!(QuadNode::build(&[vec2(f32::NAN, 0.0)], &[-1.0]).is_none());
        assert!(QuadNode::build(&[vec2(0.0, 0.0)], &[]).is_none());
    }
}
