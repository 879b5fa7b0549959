//! Guide tree construction by neighbour joining.

use crate::distance::DistanceMatrix;
use crate::errors::SplitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode {
    Leaf(usize),
    Internal { left: usize, right: usize },
}

/// A rooted binary tree over sequence ids, stored as an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl GuideTree {
    #[inline(always)]
    pub fn root(&self) -> usize {
        self.root
    }

    #[inline]
    pub fn node(&self, ix: usize) -> TreeNode {
        self.nodes[ix]
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, TreeNode::Leaf(_))).count()
    }

    /// Children before parents, ending with the root
    pub fn postorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];

        while let Some((ix, expanded)) = stack.pop() {
            match self.nodes[ix] {
                TreeNode::Internal { left, right } if !expanded => {
                    stack.push((ix, true));
                    stack.push((right, false));
                    stack.push((left, false));
                },
                _ => order.push(ix),
            }
        }

        order
    }

    /// Sequence ids below the given tree node
    pub fn leaves(&self, ix: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![ix];

        while let Some(curr) = stack.pop() {
            match self.nodes[curr] {
                TreeNode::Leaf(seq_id) => leaves.push(seq_id),
                TreeNode::Internal { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        leaves
    }

    /// Partition the sequences into the largest subtrees holding at most `max_size` leaves.
    pub fn groups(&self, max_size: usize) -> Vec<Vec<usize>> {
        let mut groups = Vec::new();
        let mut stack = vec![self.root];

        while let Some(ix) = stack.pop() {
            let leaves = self.leaves(ix);
            match self.nodes[ix] {
                TreeNode::Internal { left, right } if leaves.len() > max_size => {
                    stack.push(right);
                    stack.push(left);
                },
                _ => groups.push(leaves),
            }
        }

        groups
    }
}

/// Saitou-Nei neighbour joining; the last two clusters are joined under the root.
pub fn neighbour_joining(distance_matrix: DistanceMatrix) -> Result<GuideTree, SplitError> {
    let n = distance_matrix.size();
    if n == 0 {
        return Err(SplitError::AlignmentError("cannot build a guide tree without sequences".to_string()));
    }

    let mut nodes: Vec<TreeNode> = (0..n).map(TreeNode::Leaf).collect();

    // Distances between active clusters, indexed by position in `active`
    let mut active: Vec<usize> = (0..n).collect();
    let mut dist: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| distance_matrix.get(i, j)).collect())
        .collect();

    while active.len() > 2 {
        let m = active.len();
        let row_sums: Vec<f64> = dist.iter().map(|row| row.iter().sum()).collect();

        let mut best = (0, 1);
        let mut best_q = f64::INFINITY;
        for i in 0..m {
            for j in i + 1..m {
                let q = (m as f64 - 2.0) * dist[i][j] - row_sums[i] - row_sums[j];
                if q < best_q {
                    best_q = q;
                    best = (i, j);
                }
            }
        }

        let (i, j) = best;
        nodes.push(TreeNode::Internal { left: active[i], right: active[j] });
        let joined = nodes.len() - 1;

        let new_row: Vec<f64> = (0..m)
            .filter(|k| *k != i && *k != j)
            .map(|k| (dist[i][k] + dist[j][k] - dist[i][j]) / 2.0)
            .collect();

        // j > i, so removing j first keeps i valid
        for ix in [j, i] {
            active.remove(ix);
            dist.remove(ix);
            for row in dist.iter_mut() {
                row.remove(ix);
            }
        }

        for (row, d) in dist.iter_mut().zip(&new_row) {
            row.push(*d);
        }
        let mut last_row = new_row;
        last_row.push(0.0);
        dist.push(last_row);
        active.push(joined);
    }

    let root = if let [left, right] = active[..] {
        nodes.push(TreeNode::Internal { left, right });
        nodes.len() - 1
    } else {
        active[0]
    };

    Ok(GuideTree { nodes, root })
}
