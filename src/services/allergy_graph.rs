// ABOUTME: Transitive allergy closure over the sub-ingredient graph, independent of storage
// ABOUTME: Cycle-safe depth-first traversal with a caller-supplied visited set and per-batch memo
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Allergy Graph
//!
//! Ingredients reference sub-ingredients by id and the data layer does not
//! prevent cycles. An ingredient's full allergy set is the union of the direct
//! allergies of every ingredient reachable from it. A node already visited in
//! the current traversal contributes nothing further, which is what breaks
//! cycles; a dangling reference contributes nothing at all.
//!
//! Results are returned in first-seen order (the root's direct allergies, then
//! depth-first through sub-ingredients in list order) so responses are stable,
//! but only set membership is meaningful.

use std::collections::{HashMap, HashSet};

use crate::database::ingredients::Ingredient;

/// Completed closures keyed by ingredient id, shared across one batch
pub type AllergyMemo = HashMap<String, Vec<String>>;

/// Traversal-relevant view of one ingredient
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphNode {
    /// Display name
    pub name: String,
    /// Directly declared allergy ids
    pub direct_allergies: Vec<String>,
    /// Ordered sub-ingredient ids
    pub sub_ingredients: Vec<String>,
    /// Owning restaurant
    pub restaurant_id: String,
}

impl From<&Ingredient> for GraphNode {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.ingredient_name.clone(),
            direct_allergies: ingredient.ingredient_allergies.clone(),
            sub_ingredients: ingredient.sub_ingredients.clone(),
            restaurant_id: ingredient.restaurant_id.clone(),
        }
    }
}

/// In-memory ingredient map the closure runs against
#[derive(Debug, Clone, Default)]
pub struct IngredientGraph {
    nodes: HashMap<String, GraphNode>,
}

impl IngredientGraph {
    /// Empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from loaded ingredients
    pub fn from_ingredients<'a>(ingredients: impl IntoIterator<Item = &'a Ingredient>) -> Self {
        let mut graph = Self::new();
        for ingredient in ingredients {
            graph.insert_ingredient(ingredient);
        }
        graph
    }

    /// Add or replace a node
    pub fn insert(&mut self, id: impl Into<String>, node: GraphNode) {
        self.nodes.insert(id.into(), node);
    }

    /// Add or replace a node from a stored ingredient
    pub fn insert_ingredient(&mut self, ingredient: &Ingredient) {
        self.insert(ingredient.ingredient_id.clone(), GraphNode::from(ingredient));
    }

    /// Whether `id` has been loaded
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Loaded node for `id`
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Display name for `id`, if loaded
    #[must_use]
    pub fn name(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    /// Number of loaded nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Full allergy set for `root`, with a fresh visited set
    pub fn all_allergies(&self, root: &str, memo: &mut AllergyMemo) -> Vec<String> {
        let mut visited = HashSet::new();
        self.all_allergies_with(root, &mut visited, memo)
    }

    /// Full allergy set for `root`
    ///
    /// `visited` marks nodes already expanded; they are skipped, which
    /// terminates cycles. A memoized node other than `root` contributes its
    /// stored closure without being expanded again. The completed result for
    /// `root` is stored in `memo`.
    pub fn all_allergies_with(
        &self,
        root: &str,
        visited: &mut HashSet<String>,
        memo: &mut AllergyMemo,
    ) -> Vec<String> {
        if let Some(cached) = memo.get(root) {
            return cached.clone();
        }

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id.to_owned()) {
                continue;
            }

            if id != root {
                if let Some(cached) = memo.get(id) {
                    push_unique(&mut result, &mut seen, cached);
                    continue;
                }
            }

            // dangling reference
            let Some(node) = self.nodes.get(id) else {
                continue;
            };

            push_unique(&mut result, &mut seen, &node.direct_allergies);
            for sub in node.sub_ingredients.iter().rev() {
                if !visited.contains(sub.as_str()) {
                    stack.push(sub.as_str());
                }
            }
        }

        memo.insert(root.to_owned(), result.clone());
        result
    }

    /// Allergies reached only through sub-ingredients: closure minus direct
    pub fn derived_allergies(&self, root: &str, memo: &mut AllergyMemo) -> Vec<String> {
        let all = self.all_allergies(root, memo);
        let direct: HashSet<&str> = self
            .nodes
            .get(root)
            .map(|n| n.direct_allergies.iter().map(String::as_str).collect())
            .unwrap_or_default();
        all.into_iter()
            .filter(|a| !direct.contains(a.as_str()))
            .collect()
    }
}

fn push_unique(result: &mut Vec<String>, seen: &mut HashSet<String>, values: &[String]) {
    for value in values {
        if seen.insert(value.clone()) {
            result.push(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(direct: &[&str], subs: &[&str]) -> GraphNode {
        GraphNode {
            name: String::new(),
            direct_allergies: direct.iter().map(|s| (*s).to_owned()).collect(),
            sub_ingredients: subs.iter().map(|s| (*s).to_owned()).collect(),
            restaurant_id: "RST-000001".to_owned(),
        }
    }

    fn graph(nodes: &[(&str, GraphNode)]) -> IngredientGraph {
        let mut g = IngredientGraph::new();
        for (id, n) in nodes {
            g.insert(*id, n.clone());
        }
        g
    }

    fn as_set(values: Vec<String>) -> HashSet<String> {
        values.into_iter().collect()
    }

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_bun_with_sesame() {
        let g = graph(&[
            ("ING-000001", node(&["ALG-000001"], &["ING-000002"])),
            ("ING-000002", node(&["ALG-000002"], &[])),
        ]);
        let mut memo = AllergyMemo::new();

        assert_eq!(
            g.all_allergies("ING-000001", &mut memo),
            vec!["ALG-000001".to_owned(), "ALG-000002".to_owned()]
        );
        assert_eq!(
            g.derived_allergies("ING-000001", &mut memo),
            vec!["ALG-000002".to_owned()]
        );
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let g = graph(&[
            ("A", node(&["ALG-A"], &["B"])),
            ("B", node(&["ALG-B"], &["A"])),
        ]);
        let mut memo = AllergyMemo::new();

        assert_eq!(as_set(g.all_allergies("A", &mut memo)), set(&["ALG-A", "ALG-B"]));
        assert_eq!(as_set(g.all_allergies("B", &mut memo)), set(&["ALG-A", "ALG-B"]));
    }

    #[test]
    fn test_self_reference_terminates() {
        let g = graph(&[("A", node(&["ALG-A"], &["A", "A"]))]);
        assert_eq!(g.all_allergies("A", &mut AllergyMemo::new()), vec!["ALG-A".to_owned()]);
    }

    #[test]
    fn test_dag_closure_is_union_of_children() {
        let g = graph(&[
            ("A", node(&["x"], &["B", "C"])),
            ("B", node(&["y"], &["D"])),
            ("C", node(&["z"], &["D"])),
            ("D", node(&["w", "x"], &[])),
        ]);
        let mut memo = AllergyMemo::new();

        let mut expected = set(&["x"]);
        for child in ["B", "C"] {
            expected.extend(g.all_allergies(child, &mut AllergyMemo::new()));
        }
        assert_eq!(as_set(g.all_allergies("A", &mut memo)), expected);
        assert_eq!(expected, set(&["x", "y", "z", "w"]));
    }

    #[test]
    fn test_order_independence() {
        let forward = graph(&[
            ("A", node(&["a"], &["B", "C", "D"])),
            ("B", node(&["b"], &["C"])),
            ("C", node(&["c"], &["A"])),
            ("D", node(&["d"], &[])),
        ]);
        let reversed = graph(&[
            ("A", node(&["a"], &["D", "C", "B"])),
            ("B", node(&["b"], &["C"])),
            ("C", node(&["c"], &["A"])),
            ("D", node(&["d"], &[])),
        ]);

        for root in ["A", "B", "C", "D"] {
            assert_eq!(
                as_set(forward.all_allergies(root, &mut AllergyMemo::new())),
                as_set(reversed.all_allergies(root, &mut AllergyMemo::new())),
                "root {root}"
            );
        }
    }

    #[test]
    fn test_dangling_reference_contributes_nothing() {
        let g = graph(&[("A", node(&["a"], &["MISSING"]))]);
        assert_eq!(g.all_allergies("A", &mut AllergyMemo::new()), vec!["a".to_owned()]);
        assert!(g.all_allergies("MISSING", &mut AllergyMemo::new()).is_empty());
    }

    #[test]
    fn test_memoized_batch_matches_unmemoized() {
        let g = graph(&[
            ("A", node(&["a"], &["B"])),
            ("B", node(&["b"], &["C"])),
            ("C", node(&["c"], &["B"])),
            ("E", node(&["e"], &["B", "A"])),
        ]);

        let mut shared = AllergyMemo::new();
        for root in ["B", "A", "E", "C"] {
            let memoized = as_set(g.all_allergies(root, &mut shared));
            let fresh = as_set(g.all_allergies(root, &mut AllergyMemo::new()));
            assert_eq!(memoized, fresh, "root {root}");
        }
        assert_eq!(shared.len(), 4);
    }

    #[test]
    fn test_caller_supplied_visited_set_is_respected() {
        let g = graph(&[("A", node(&["a"], &["B"])), ("B", node(&["b"], &[]))]);
        let mut visited: HashSet<String> = ["B".to_owned()].into_iter().collect();
        let result = g.all_allergies_with("A", &mut visited, &mut AllergyMemo::new());
        assert_eq!(result, vec!["a".to_owned()]);
        assert!(visited.contains("A"));
    }
}
