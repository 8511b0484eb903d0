//! Procedural generation of a run's branching encounter tree.

pub mod model;

mod generator;
mod layout;

pub use generator::TreeGenerator;
pub use layout::{LayoutError, TreeLayout};
pub use model::{Tree, TreeNode};

pub fn generate_tree(seed: u64) -> Tree {
    TreeGenerator::new(TreeLayout::default(), seed).generate()
}

#[cfg(test)]
mod tests {
    use super::{TreeGenerator, TreeLayout};

    #[test]
    fn generate_tree_matches_tree_generator_output() {
        let seed = 123_u64;
        let from_helper = super::generate_tree(seed);
        let from_generator = TreeGenerator::new(TreeLayout::default(), seed).generate();
        assert_eq!(from_helper, from_generator);
    }
}
