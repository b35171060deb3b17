//! Node positions for drawing a tree.

use super::DecisionNode;

/// Horizontal span given to the root.
pub const ROOT_WIDTH: f64 = 10.0;

/// Factor applied to each child's share of its parent's width.
pub const WIDTH_SHRINK: f64 = 0.8;

/// Position of one node; `y` equals the node's depth.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub level: u32,
}

/// Balanced layout: children share the parent's width evenly and are
/// centred under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    positions: Vec<NodePosition>,
}

impl TreeLayout {
    pub fn compute(root: &DecisionNode) -> Self {
        let mut layout = Self::default();
        layout.place(root, 0.0, 0.0, 0, ROOT_WIDTH);
        layout
    }

    fn place(&mut self, node: &DecisionNode, x: f64, y: f64, level: u32, width: f64) {
        self.positions.push(NodePosition {
            id: node.id.clone(),
            x,
            y,
            level,
        });

        if node.children.is_empty() {
            return;
        }

        let child_width = width / node.children.len() as f64;
        let start_x = x - width / 2.0 + child_width / 2.0;
        for (i, child) in node.children.iter().enumerate() {
            let child_x = start_x + i as f64 * child_width;
            self.place(child, child_x, y + 1.0, level + 1, child_width * WIDTH_SHRINK);
        }
    }

    /// Positions in depth-first order, root first.
    pub fn positions(&self) -> &[NodePosition] {
        &self.positions
    }

    pub fn get(&self, id: &str) -> Option<&NodePosition> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Parent/child coordinate pairs for drawing edges.
    pub fn edges<'a>(&'a self, root: &'a DecisionNode) -> Vec<(&'a NodePosition, &'a NodePosition)> {
        let mut edges = Vec::new();
        self.collect_edges(root, &mut edges);
        edges
    }

    fn collect_edges<'a>(
        &'a self,
        node: &'a DecisionNode,
        edges: &mut Vec<(&'a NodePosition, &'a NodePosition)>,
    ) {
        let Some(parent) = self.get(&node.id) else {
            return;
        };
        for child in &node.children {
            if let Some(position) = self.get(&child.id) {
                edges.push((parent, position));
            }
            self.collect_edges(child, edges);
        }
    }
}
