//! Tunable tree shape plus the per-row column and predecessor selection rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::RandomSource;
use crate::types::NodeId;

use super::model::TreeNode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayout {
    /// Total rows including the boss row.
    pub rows: u8,
    /// Grid width; columns are `0..columns`.
    pub columns: u8,
    /// Spine present on every non-boss row.
    pub main_columns: Vec<u8>,
    /// Optional crossing columns sampled per row.
    pub intersection_columns: Vec<u8>,
    pub max_intersections: u8,
    pub elite_chance: f64,
    pub elite_min_row: u8,
    /// Chance that a node also links to predecessors two columns away.
    pub far_link_chance: f64,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 7,
            main_columns: vec![0, 2, 4, 6],
            intersection_columns: vec![1, 3, 5],
            max_intersections: 2,
            elite_chance: 0.15,
            elite_min_row: 4,
            far_link_chance: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    #[error("a tree needs at least 3 rows (got {0})")]
    TooFewRows(u8),
    #[error("main column spine is empty")]
    EmptySpine,
    #[error("column {col} lies outside a grid of width {columns}")]
    ColumnOutOfRange { col: u8, columns: u8 },
    #[error("{field} must be within [0, 1] (got {value})")]
    ChanceOutOfRange { field: &'static str, value: f64 },
}

impl TreeLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.rows < 3 {
            return Err(LayoutError::TooFewRows(self.rows));
        }
        if self.main_columns.is_empty() {
            return Err(LayoutError::EmptySpine);
        }
        if let Some(&col) = self
            .main_columns
            .iter()
            .chain(self.intersection_columns.iter())
            .find(|&&col| col >= self.columns)
        {
            return Err(LayoutError::ColumnOutOfRange { col, columns: self.columns });
        }
        for (field, value) in
            [("elite_chance", self.elite_chance), ("far_link_chance", self.far_link_chance)]
        {
            if !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::ChanceOutOfRange { field, value });
            }
        }
        Ok(())
    }

    pub fn boss_row(&self) -> u8 {
        self.rows - 1
    }

    pub fn boss_column(&self) -> u8 {
        self.columns.saturating_sub(1) / 2
    }
}

/// Spine columns plus a random subset of intersections, capped by one draw per row.
pub(super) fn row_columns(layout: &TreeLayout, rng: &mut RandomSource) -> Vec<u8> {
    let mut columns = layout.main_columns.clone();

    let cap = rng.range_inclusive(0, u32::from(layout.max_intersections)) as usize;
    let mut crossings = layout.intersection_columns.clone();
    rng.shuffle(&mut crossings);
    columns.extend(crossings.into_iter().take(cap));

    columns.sort_unstable();
    columns.dedup();
    columns
}

/// Predecessors for a node at `col`: every previous-row node within distance 1, those at
/// distance 2 with `far_link_chance`, and the nearest node when nothing else qualifies.
pub(super) fn predecessors(
    col: u8,
    previous_row: &[TreeNode],
    layout: &TreeLayout,
    rng: &mut RandomSource,
) -> Vec<NodeId> {
    let mut links = Vec::new();
    for node in previous_row {
        match col.abs_diff(node.col) {
            0 | 1 => links.push(node.id),
            2 if rng.chance(layout.far_link_chance) => links.push(node.id),
            _ => {}
        }
    }

    if links.is_empty()
        && let Some(nearest) = previous_row.iter().min_by_key(|node| (col.abs_diff(node.col), node.col))
    {
        links.push(nearest.id);
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn default_layout_is_valid() {
        assert_eq!(TreeLayout::default().validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_broken_layouts() {
        let short = TreeLayout { rows: 2, ..TreeLayout::default() };
        assert_eq!(short.validate(), Err(LayoutError::TooFewRows(2)));

        let no_spine = TreeLayout { main_columns: vec![], ..TreeLayout::default() };
        assert_eq!(no_spine.validate(), Err(LayoutError::EmptySpine));

        let wide = TreeLayout { intersection_columns: vec![9], ..TreeLayout::default() };
        assert_eq!(wide.validate(), Err(LayoutError::ColumnOutOfRange { col: 9, columns: 7 }));

        let odds = TreeLayout { elite_chance: 1.5, ..TreeLayout::default() };
        assert!(matches!(odds.validate(), Err(LayoutError::ChanceOutOfRange { .. })));
    }

    #[test]
    fn row_columns_always_contain_the_spine() {
        let layout = TreeLayout::default();
        let mut rng = RandomSource::from_seed(5);
        for _ in 0..200 {
            let columns = row_columns(&layout, &mut rng);
            for main in &layout.main_columns {
                assert!(columns.contains(main));
            }
            let extra = columns.len() - layout.main_columns.len();
            assert!(extra <= usize::from(layout.max_intersections));
        }
    }

    #[test]
    fn isolated_node_falls_back_to_nearest_predecessor() {
        let layout = TreeLayout { far_link_chance: 0.0, ..TreeLayout::default() };
        let previous = vec![
            TreeNode::new(3, 0, NodeKind::Basic, vec![]),
            TreeNode::new(3, 6, NodeKind::Basic, vec![]),
        ];
        let mut rng = RandomSource::from_seed(1);
        let links = predecessors(3, &previous, &layout, &mut rng);
        assert_eq!(links, vec![NodeId { row: 3, col: 0 }]);

        let links = predecessors(5, &previous, &layout, &mut rng);
        assert_eq!(links, vec![NodeId { row: 3, col: 6 }]);
    }

    #[test]
    fn layout_reads_partial_toml_style_overrides() {
        let layout: TreeLayout =
            serde_json::from_str(r#"{ "rows": 6, "elite_chance": 0.5 }"#).expect("parse layout");
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.main_columns, TreeLayout::default().main_columns);
    }
}
