use super::IntervalNodeIndex;

/// Maps alignment fragments to the interval graph node currently representing them.
///
/// Contracting a node redirects its whole set of fragments to the surviving node, so
/// fragments merged earlier never point at a removed node.
#[derive(Debug, Default)]
pub struct NodeRedirect {
    parent: Vec<usize>,
    nodes: Vec<IntervalNodeIndex>,
}

impl NodeRedirect {
    pub fn with_capacity(capacity: usize) -> Self {
        NodeRedirect {
            parent: Vec::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Register the node of the next fragment; returns the fragment's slot.
    pub fn push(&mut self, node: IntervalNodeIndex) -> usize {
        let slot = self.parent.len();
        self.parent.push(slot);
        self.nodes.push(node);

        slot
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }

        slot
    }

    pub fn node_of(&mut self, slot: usize) -> IntervalNodeIndex {
        let root = self.find(slot);
        self.nodes[root]
    }

    /// Point every fragment of `from`'s node to the node of `to`.
    pub fn redirect(&mut self, from: usize, to: usize) {
        let from_root = self.find(from);
        let to_root = self.find(to);

        if from_root != to_root {
            self.parent[from_root] = to_root;
        }
    }
}
