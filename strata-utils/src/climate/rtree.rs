//! R-tree over biome hypercubes, matching vanilla's `Climate.RTree`.

use std::cmp::{Ordering, Reverse};

use super::types::{Parameter, ParameterPoint, TargetPoint};
use super::{ClimateError, PARAMETER_COUNT};

/// Maximum children per tree node.
const CHILDREN_PER_NODE: usize = 6;

type Space = [Parameter; PARAMETER_COUNT];

/// R-tree node for spatial biome lookup.
#[derive(Debug, Clone)]
enum RTreeNode {
    /// A single biome entry.
    Leaf { space: Space, value_index: usize },
    /// Children with their bounding box.
    SubTree {
        space: Space,
        children: Vec<RTreeNode>,
    },
}

/// Squared distance from `target` to a hypercube.
fn distance(space: &Space, target: &[i64; PARAMETER_COUNT]) -> i64 {
    space
        .iter()
        .zip(target)
        .fold(0_i64, |acc, (p, t)| {
            let d = p.distance(*t);
            acc.saturating_add(d.saturating_mul(d))
        })
}

impl RTreeNode {
    const fn space(&self) -> &Space {
        match self {
            Self::Leaf { space, .. } | Self::SubTree { space, .. } => space,
        }
    }

    /// Branch-and-bound search below this node, improving on `best`.
    ///
    /// `best` is a `(distance, value_index)` pair ordered lexicographically, so
    /// equally distant entries resolve to the lowest index. A child is entered
    /// when its box is no farther than the incumbent.
    fn search(&self, target: &[i64; PARAMETER_COUNT], best: &mut (i64, usize)) {
        match self {
            Self::Leaf { space, value_index } => {
                let candidate = (distance(space, target), *value_index);
                if candidate < *best {
                    *best = candidate;
                }
            }
            Self::SubTree { children, .. } => {
                for child in children {
                    if distance(child.space(), target) <= best.0 {
                        child.search(target, best);
                    }
                }
            }
        }
    }
}

/// Per-axis envelope of a non-empty set of boxes.
fn envelope<'a>(mut spaces: impl Iterator<Item = &'a Space>) -> Option<Space> {
    let first = *spaces.next()?;
    Some(spaces.fold(first, |mut acc, space| {
        for (a, p) in acc.iter_mut().zip(space) {
            *a = a.union(p);
        }
        acc
    }))
}

/// Summed span of a box.
fn cost(space: &Space) -> i64 {
    space.iter().map(|p| (p.max - p.min).abs()).sum()
}

/// Bucket size for `total` entries: `6^floor(log6(total - 0.01))`.
fn bucket_size(total: usize) -> usize {
    let per_node = CHILDREN_PER_NODE as f64;
    let exponent = ((total as f64 - 0.01).ln() / per_node.ln()).floor();
    per_node.powf(exponent) as usize
}

/// Order by midpoint on `axis`, breaking ties on the following axes cyclically.
fn compare_on_axis(a: &Space, b: &Space, axis: usize, absolute: bool) -> Ordering {
    for offset in 0..PARAMETER_COUNT {
        let d = (axis + offset) % PARAMETER_COUNT;
        let (ma, mb) = (a[d].midpoint(), b[d].midpoint());
        let cmp = if absolute {
            ma.abs().cmp(&mb.abs())
        } else {
            ma.cmp(&mb)
        };
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Total cost of bucketing `leaves` in `order`.
fn bucketed_cost(leaves: &[RTreeNode], order: &[usize]) -> i64 {
    order
        .chunks(bucket_size(order.len()))
        .filter_map(|bucket| envelope(bucket.iter().map(|&i| leaves[i].space())))
        .map(|space| cost(&space))
        .sum()
}

/// Build a subtree from leaves. `leaves` is non-empty.
fn build(mut leaves: Vec<RTreeNode>) -> RTreeNode {
    if leaves.len() == 1
        && let Some(leaf) = leaves.pop()
    {
        return leaf;
    }

    if leaves.len() <= CHILDREN_PER_NODE {
        leaves.sort_by_key(|leaf| {
            Reverse(leaf.space().iter().map(|p| p.midpoint().abs()).sum::<i64>())
        });
        return wrap(leaves);
    }

    // Each axis sort starts from the previous axis' order; the cheapest
    // ordering is kept as-is for bucketing.
    let mut order: Vec<usize> = (0..leaves.len()).collect();
    let mut best_order = order.clone();
    let mut best_axis = 0;
    let mut min_cost = i64::MAX;
    for axis in 0..PARAMETER_COUNT {
        order.sort_by(|&a, &b| compare_on_axis(leaves[a].space(), leaves[b].space(), axis, false));
        let cost = bucketed_cost(&leaves, &order);
        if cost < min_cost {
            min_cost = cost;
            best_axis = axis;
            best_order.clone_from(&order);
        }
    }

    let size = bucket_size(leaves.len());
    let mut slots: Vec<Option<RTreeNode>> = leaves.into_iter().map(Some).collect();
    let mut buckets: Vec<(Space, Vec<RTreeNode>)> = Vec::new();
    for chunk in best_order.chunks(size) {
        let bucket: Vec<RTreeNode> = chunk.iter().filter_map(|&i| slots[i].take()).collect();
        if let Some(space) = envelope(bucket.iter().map(RTreeNode::space)) {
            buckets.push((space, bucket));
        }
    }
    buckets.sort_by(|a, b| compare_on_axis(&a.0, &b.0, best_axis, true));

    wrap(buckets.into_iter().map(|(_, bucket)| build(bucket)).collect())
}

/// Wrap non-empty children in a node bounded by their envelope.
fn wrap(children: Vec<RTreeNode>) -> RTreeNode {
    let space = envelope(children.iter().map(RTreeNode::space))
        .unwrap_or([Parameter::new(0, 0); PARAMETER_COUNT]);
    RTreeNode::SubTree { space, children }
}

/// Biome entries indexed for nearest-hypercube lookup.
#[derive(Debug, Clone)]
pub struct ParameterList<T> {
    values: Vec<(ParameterPoint, T)>,
    root: RTreeNode,
}

impl<T> ParameterList<T> {
    /// Build the index.
    ///
    /// # Errors
    /// [`ClimateError::EmptyTree`] when `values` is empty.
    pub fn new(values: Vec<(ParameterPoint, T)>) -> Result<Self, ClimateError> {
        if values.is_empty() {
            return Err(ClimateError::EmptyTree);
        }
        let leaves = values
            .iter()
            .enumerate()
            .map(|(value_index, (point, _))| RTreeNode::Leaf {
                space: point.parameter_space(),
                value_index,
            })
            .collect();
        Ok(Self {
            root: build(leaves),
            values,
        })
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn values(&self) -> &[(ParameterPoint, T)] {
        &self.values
    }

    /// Nearest entry to `target`.
    ///
    /// `hint` carries the previous winner between calls and is updated with this
    /// call's winner. It only seeds the incumbent; the result does not depend on it.
    /// Equally distant entries resolve to the one inserted first.
    #[must_use]
    pub fn find_value(&self, target: &TargetPoint, hint: &mut Option<usize>) -> &T {
        let target = target.to_parameter_array();
        let mut best = match *hint {
            Some(index) if index < self.values.len() => {
                (distance(&self.values[index].0.parameter_space(), &target), index)
            }
            _ => (i64::MAX, usize::MAX),
        };
        self.root.search(&target, &mut best);
        *hint = Some(best.1);
        &self.values[best.1].1
    }

    /// Linear scan for the entry with the lowest fitness; first wins ties.
    #[must_use]
    pub fn find_value_brute_force(&self, target: &TargetPoint) -> &T {
        let mut best = &self.values[0];
        let mut best_fitness = best.0.fitness(target);
        for entry in &self.values[1..] {
            let fitness = entry.0.fitness(target);
            if fitness < best_fitness {
                best = entry;
                best_fitness = fitness;
            }
        }
        &best.1
    }
}
