//! Row-by-row tree construction: spine, crossings, elites, links, boss.

use crate::rng::RandomSource;
use crate::types::NodeKind;

use super::layout::{TreeLayout, predecessors, row_columns};
use super::model::{Tree, TreeNode};

pub struct TreeGenerator {
    layout: TreeLayout,
    rng: RandomSource,
}

impl TreeGenerator {
    pub fn new(layout: TreeLayout, seed: u64) -> Self {
        Self::with_rng(layout, RandomSource::from_seed(seed))
    }

    pub fn with_rng(layout: TreeLayout, rng: RandomSource) -> Self {
        Self { layout, rng }
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn generate(&mut self) -> Tree {
        let boss_row = self.layout.boss_row();
        let mut nodes: Vec<TreeNode> = Vec::new();

        let mut previous: Vec<TreeNode> = self
            .layout
            .main_columns
            .iter()
            .map(|&col| TreeNode::new(0, col, NodeKind::Basic, Vec::new()))
            .collect();
        previous.sort_by_key(|node| node.col);

        for row in 1..boss_row {
            let mut current = Vec::new();
            for col in row_columns(&self.layout, &mut self.rng) {
                let kind = if row >= self.layout.elite_min_row
                    && self.rng.chance(self.layout.elite_chance)
                {
                    NodeKind::Elite
                } else {
                    NodeKind::Basic
                };
                let links = predecessors(col, &previous, &self.layout, &mut self.rng);
                current.push(TreeNode::new(row, col, kind, links));
            }
            nodes.append(&mut previous);
            previous = current;
        }

        let boss_links = previous.iter().map(|node| node.id).collect();
        nodes.append(&mut previous);
        nodes.push(TreeNode::new(boss_row, self.layout.boss_column(), NodeKind::Boss, boss_links));

        Tree::from_nodes(nodes)
    }
}
