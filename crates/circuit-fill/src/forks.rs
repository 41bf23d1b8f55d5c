//! Fork detection - find where accepted traces meet.
//!
//! Endpoints of placed segments are clustered by the coincidence threshold.
//! A cluster touching two or more distinct segments is a fork; its endpoints
//! are "fork ends" and get no circle of their own.
//!
//! # Algorithm
//!
//! 1. Key every endpoint by its coordinates divided by the threshold, rounded
//! 2. Link endpoints closer than the threshold, checking the 3x3 neighbouring
//!    cells so pairs straddling a cell edge are still found
//! 3. Each connected group becomes a candidate fork
//!
//! Placement guarantees endpoints are either within the threshold of each
//! other or at least the pad clearance apart, so the groups are tight.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::geometry::Point;
use crate::segment::{End, Segment};

/// Kind of junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForkKind {
    /// Exactly two endpoints meet.
    TJunction,
    /// More than two endpoints meet.
    Cross,
}

/// A point where traces meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fork {
    /// Mean of the contributing endpoints.
    pub point: Point,
    /// Indices of the segments meeting here, ascending.
    pub segments: Vec<usize>,
    pub kind: ForkKind,
}

/// One end of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub segment: usize,
    pub end: End,
}

/// Forks of a segment set, plus which endpoints belong to them.
#[derive(Debug, Clone, Default)]
pub struct ForkMap {
    pub forks: Vec<Fork>,
    fork_ends: HashSet<EndpointRef>,
}

impl ForkMap {
    pub fn is_fork_end(&self, segment: usize, end: End) -> bool {
        self.fork_ends.contains(&EndpointRef { segment, end })
    }

    pub fn fork_end_count(&self) -> usize {
        self.fork_ends.len()
    }

    pub fn into_forks(self) -> Vec<Fork> {
        self.forks
    }
}

fn point_to_cell(p: Point, cell_size: f64) -> (i64, i64) {
    ((p.x / cell_size).round() as i64, (p.y / cell_size).round() as i64)
}

/// Minimal union-find over endpoint indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller index wins so roots are stable.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Detect forks among `segments`.
///
/// Forks come out ordered by their lowest contributing endpoint, so the
/// result is deterministic for a given segment list.
pub fn detect_forks(segments: &[Segment], threshold: f64) -> ForkMap {
    let endpoints: Vec<(EndpointRef, Point)> = segments
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            End::BOTH
                .into_iter()
                .map(move |end| (EndpointRef { segment: i, end }, s.endpoint(end)))
        })
        .collect();

    if endpoints.is_empty() {
        return ForkMap::default();
    }

    let cell_size = threshold.max(0.001);
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (_, p)) in endpoints.iter().enumerate() {
        grid.entry(point_to_cell(*p, cell_size)).or_default().push(i);
    }

    let mut sets = DisjointSet::new(endpoints.len());
    for (i, (_, p)) in endpoints.iter().enumerate() {
        let cell = point_to_cell(*p, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = grid.get(&(cell.0 + dx, cell.1 + dy)) else {
                    continue;
                };
                for &j in bucket {
                    if j > i && p.distance(endpoints[j].1) < threshold {
                        sets.union(i, j);
                    }
                }
            }
        }
    }

    // Group by root; roots are the smallest member so ordering by root
    // orders by first endpoint.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    for i in 0..endpoints.len() {
        let root = sets.find(i);
        let g = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
    }

    let mut map = ForkMap::default();
    for members in groups {
        let mut seg_ids: Vec<usize> = members.iter().map(|&m| endpoints[m].0.segment).collect();
        seg_ids.sort_unstable();
        seg_ids.dedup();
        if seg_ids.len() < 2 {
            continue;
        }

        let sum = members
            .iter()
            .fold(Point::default(), |acc, &m| acc + endpoints[m].1);
        let point = sum * (1.0 / members.len() as f64);
        let kind = if members.len() > 2 { ForkKind::Cross } else { ForkKind::TJunction };

        map.fork_ends.extend(members.iter().map(|&m| endpoints[m].0));
        map.forks.push(Fork { point, segments: seg_ids, kind });
    }

    tracing::debug!(forks = map.forks.len(), fork_ends = map.fork_ends.len(), "forks detected");
    map
}
