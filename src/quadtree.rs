//! Region quadtree used to approximate far-field repulsive forces
//! (Barnes–Hut). Nodes live in a flat arena; child and parent links are
//! arena indices rather than owned pointers, so there is no cycle to manage
//! and construction is a pure top-down sequence of writes.

use crate::geometry::{Point, EPSILON};
use rayon::prelude::*;

/// Quadrant a point belongs to relative to a node's midpoint, per the
/// partitioning rule: `x <= midX && y <= midY` is bottom-left, and so on
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Quadrant {
    fn of(p: Point, mid: Point) -> Self {
        match (p.x <= mid.x, p.y <= mid.y) {
            (true, true) => Quadrant::BottomLeft,
            (false, true) => Quadrant::BottomRight,
            (true, false) => Quadrant::TopLeft,
            (false, false) => Quadrant::TopRight,
        }
    }

    fn index(self) -> usize {
        match self {
            Quadrant::BottomLeft => 0,
            Quadrant::BottomRight => 1,
            Quadrant::TopLeft => 2,
            Quadrant::TopRight => 3,
        }
    }
}

/// Rectangle bounds for a node, and the four child rectangles its midpoint
/// partitions it into.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    bottom_left: Point,
    top_right: Point,
}

impl Bounds {
    fn mid(&self) -> Point {
        self.bottom_left.add(self.top_right).scale(0.5)
    }

    /// Side length used as the Barnes–Hut opening-angle numerator. The
    /// rectangle need not be square; the wider side is the conservative
    /// choice (it makes the node look "closer" to its true angular size).
    fn width(&self) -> f64 {
        let d = self.top_right.sub(self.bottom_left);
        d.x.max(d.y)
    }

    fn child(&self, quadrant: Quadrant) -> Bounds {
        let mid = self.mid();
        match quadrant {
            Quadrant::BottomLeft => Bounds {
                bottom_left: self.bottom_left,
                top_right: mid,
            },
            Quadrant::BottomRight => Bounds {
                bottom_left: Point::new(mid.x, self.bottom_left.y),
                top_right: Point::new(self.top_right.x, mid.y),
            },
            Quadrant::TopLeft => Bounds {
                bottom_left: Point::new(self.bottom_left.x, mid.y),
                top_right: Point::new(mid.x, self.top_right.y),
            },
            Quadrant::TopRight => Bounds {
                bottom_left: mid,
                top_right: self.top_right,
            },
        }
    }
}

/// One quadtree node. `centroid` is the mean position of the points in its
/// subtree, used as the mass centroid for far-field force approximation;
/// `count` is the mass proxy.
#[derive(Debug, Clone)]
pub struct QuadNode {
    bounds: Bounds,
    pub centroid: Point,
    pub count: usize,
    pub children: [Option<usize>; 4],
    pub parent: Option<usize>,
    /// Point indices contained directly in this node. Non-empty only for
    /// leaves (`count == 1`) or nodes at the depth cap.
    pub points: Vec<usize>,
}

impl QuadNode {
    fn new(bounds: Bounds, parent: Option<usize>) -> Self {
        Self {
            bounds,
            centroid: Point::zero(),
            count: 0,
            children: [None; 4],
            parent,
            points: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children == [None; 4]
    }
}

/// Arena-allocated region quadtree over a snapshot of vertex positions.
pub struct Quadtree {
    nodes: Vec<QuadNode>,
    root: Option<usize>,
}

/// Recursion halts at this depth as an implementation safety valve, even if
/// a node still holds more than one point (e.g. coincident points).
pub const MAX_DEPTH: u32 = 6;

/// Per-subtree construction is parallelized above this depth; below it,
/// construction proceeds serially. Matches `MAX_DEPTH` by default, meaning
/// only the first level or two of recursion forks — tiles this small do not
/// pay for task spawn overhead.
pub const PARALLEL_DEPTH_THRESHOLD: u32 = 2;

impl Quadtree {
    /// Builds a quadtree over `positions` within `[0, width] x [0, height]`,
    /// using the default depth cap.
    pub fn build(positions: &[Point], width: f64, height: f64) -> Self {
        Self::build_with_depth(positions, width, height, MAX_DEPTH)
    }

    /// As [`Quadtree::build`], with an explicit recursion depth cap.
    /// Construction above `PARALLEL_DEPTH_THRESHOLD` forks via rayon; below
    /// it, recursion is serial.
    pub fn build_with_depth(positions: &[Point], width: f64, height: f64, max_depth: u32) -> Self {
        let bounds = Bounds {
            bottom_left: Point::zero(),
            top_right: Point::new(width, height),
        };

        if positions.is_empty() {
            return Self {
                nodes: Vec::new(),
                root: None,
            };
        }

        let point_indices: Vec<usize> = (0..positions.len()).collect();
        let mut arena = Vec::new();
        let root = build_node(&mut arena, positions, point_indices, bounds, None, 0, max_depth);
        Self {
            nodes: arena,
            root: Some(root),
        }
    }

    pub fn node(&self, index: usize) -> &QuadNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Barnes–Hut force contribution on `p` (not itself a point in the
    /// tree) from the whole tree, with ideal edge length `k` and opening
    /// angle `theta`.
    pub fn force_on(&self, p: Point, k: f64, theta: f64) -> Point {
        match self.root {
            Some(root) => self.force_from(root, p, k, theta),
            None => Point::zero(),
        }
    }

    fn force_from(&self, node_index: usize, p: Point, k: f64, theta: f64) -> Point {
        let node = &self.nodes[node_index];
        if node.count == 0 {
            return Point::zero();
        }
        if node.count == 1 && node.centroid == p {
            return Point::zero();
        }

        let delta = p.sub(node.centroid);
        let d = delta.norm().max(EPSILON);
        let s = node.bounds.width();

        if node.is_leaf() || s / d < theta {
            let magnitude = k * k * node.count as f64 / (d * d);
            return delta.scale(magnitude / d);
        }

        let mut total = Point::zero();
        for child in node.children.iter().flatten() {
            total += self.force_from(*child, p, k, theta);
        }
        total
    }
}

fn build_node(
    arena: &mut Vec<QuadNode>,
    positions: &[Point],
    point_indices: Vec<usize>,
    bounds: Bounds,
    parent: Option<usize>,
    depth: u32,
    max_depth: u32,
) -> usize {
    let mut node = QuadNode::new(bounds, parent);
    node.count = point_indices.len();
    node.centroid = centroid_of(positions, &point_indices);

    if point_indices.len() <= 1 || depth >= max_depth {
        node.points = point_indices;
        let index = arena.len();
        arena.push(node);
        return index;
    }

    let mid = bounds.mid();
    let mut buckets: [Vec<usize>; 4] = Default::default();
    for &i in &point_indices {
        let q = Quadrant::of(positions[i], mid);
        buckets[q.index()].push(i);
    }

    let index = arena.len();
    arena.push(node);

    let quadrants = [
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
        Quadrant::TopLeft,
        Quadrant::TopRight,
    ];

    if depth < PARALLEL_DEPTH_THRESHOLD {
        // Each quadrant's subtree is built into its own private arena so the
        // parallel tasks never touch a shared `Vec` concurrently; the driver
        // splices the sub-arenas in and rebases their indices after join.
        let built: Vec<(usize, Vec<QuadNode>)> = buckets
            .into_par_iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(quadrant_index, bucket)| {
                let q = quadrants[quadrant_index];
                let child_bounds = bounds.child(q);
                let mut sub_arena = Vec::new();
                build_node(&mut sub_arena, positions, bucket, child_bounds, None, depth + 1, max_depth);
                (quadrant_index, sub_arena)
            })
            .collect();

        for (quadrant_index, sub_arena) in built {
            let offset = arena.len();
            for mut n in sub_arena {
                for child in n.children.iter_mut().flatten() {
                    *child += offset;
                }
                n.parent = match n.parent {
                    None => Some(index),
                    Some(p) => Some(p + offset),
                };
                arena.push(n);
            }
            arena[index].children[quadrant_index] = Some(offset);
        }
    } else {
        for (quadrant_index, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let q = quadrants[quadrant_index];
            let child_bounds = bounds.child(q);
            let child_index = build_node(arena, positions, bucket, child_bounds, Some(index), depth + 1, max_depth);
            arena[index].children[quadrant_index] = Some(child_index);
        }
    }

    index
}

fn centroid_of(positions: &[Point], indices: &[usize]) -> Point {
    if indices.is_empty() {
        return Point::zero();
    }
    let sum = indices.iter().fold(Point::zero(), |acc, &i| acc + positions[i]);
    sum.scale(1.0 / indices.len() as f64)
}
