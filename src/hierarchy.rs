//! Manager/subordinate hierarchy service.
//!
//! The tree is built with an explicit breadth-first traversal over the
//! manager -> subordinates adjacency relation, with a visited set so a
//! cyclic `manager_id` chain in the data cannot loop the traversal.

use anyhow::Result;
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::{HashMap, HashSet, VecDeque};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
pub struct TrainerSummary {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "permanent")]
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HierarchyNode {
    pub trainer: TrainerSummary,
    pub subordinates: Vec<HierarchyNode>,
}

/// Fetches the subordinate tree rooted at `root_id`. Returns `None` when the
/// root trainer does not exist.
pub async fn subordinate_tree(pool: &MySqlPool, root_id: u64) -> Result<Option<HierarchyNode>> {
    let root = sqlx::query_as::<_, TrainerSummary>(
        "SELECT id, first_name, last_name, email, category FROM trainers WHERE id = ?",
    )
    .bind(root_id)
    .fetch_optional(pool)
    .await?;

    let Some(root) = root else {
        return Ok(None);
    };

    // Level-by-level fetch; each trainer's reports are read exactly once.
    let mut visited: HashSet<u64> = HashSet::from([root.id]);
    let mut queue: VecDeque<u64> = VecDeque::from([root.id]);
    let mut summaries: HashMap<u64, TrainerSummary> = HashMap::from([(root.id, root)]);
    let mut adjacency: HashMap<u64, Vec<u64>> = HashMap::new();
    let mut order: Vec<u64> = vec![root_id];

    while let Some(manager_id) = queue.pop_front() {
        let reports = sqlx::query_as::<_, TrainerSummary>(
            "SELECT id, first_name, last_name, email, category \
             FROM trainers WHERE manager_id = ? ORDER BY id",
        )
        .bind(manager_id)
        .fetch_all(pool)
        .await?;

        for report in reports {
            if !visited.insert(report.id) {
                tracing::warn!(
                    trainer_id = report.id,
                    manager_id,
                    "Cycle in manager hierarchy, skipping repeated trainer"
                );
                continue;
            }
            adjacency.entry(manager_id).or_default().push(report.id);
            order.push(report.id);
            queue.push_back(report.id);
            summaries.insert(report.id, report);
        }
    }

    Ok(assemble(root_id, &order, &mut summaries, &mut adjacency))
}

/// Builds the nested tree from the flat BFS output without recursion: in
/// reverse BFS order every trainer's subordinates are already assembled.
fn assemble(
    root_id: u64,
    order: &[u64],
    summaries: &mut HashMap<u64, TrainerSummary>,
    adjacency: &mut HashMap<u64, Vec<u64>>,
) -> Option<HierarchyNode> {
    let mut built: HashMap<u64, HierarchyNode> = HashMap::with_capacity(order.len());

    for id in order.iter().rev() {
        let subordinates = adjacency
            .remove(id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| built.remove(&child))
            .collect();
        let trainer = summaries.remove(id)?;
        built.insert(*id, HierarchyNode { trainer, subordinates });
    }

    built.remove(&root_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64) -> TrainerSummary {
        TrainerSummary {
            id,
            first_name: format!("T{}", id),
            last_name: "Trainer".to_string(),
            email: format!("t{}@company.com", id),
            category: "permanent".to_string(),
        }
    }

    fn setup(
        edges: &[(u64, u64)],
        ids: &[u64],
    ) -> (Vec<u64>, HashMap<u64, TrainerSummary>, HashMap<u64, Vec<u64>>) {
        let order = ids.to_vec();
        let summaries = ids.iter().map(|&id| (id, summary(id))).collect();
        let mut adjacency: HashMap<u64, Vec<u64>> = HashMap::new();
        for &(manager, report) in edges {
            adjacency.entry(manager).or_default().push(report);
        }
        (order, summaries, adjacency)
    }

    #[test]
    fn assembles_single_node() {
        let (order, mut summaries, mut adjacency) = setup(&[], &[1]);
        let tree = assemble(1, &order, &mut summaries, &mut adjacency).unwrap();
        assert_eq!(tree.trainer.id, 1);
        assert!(tree.subordinates.is_empty());
    }

    #[test]
    fn assembles_two_levels_preserving_order() {
        // 1 -> (2, 3), 2 -> (4)
        let (order, mut summaries, mut adjacency) =
            setup(&[(1, 2), (1, 3), (2, 4)], &[1, 2, 3, 4]);
        let tree = assemble(1, &order, &mut summaries, &mut adjacency).unwrap();

        assert_eq!(tree.trainer.id, 1);
        assert_eq!(tree.subordinates.len(), 2);
        assert_eq!(tree.subordinates[0].trainer.id, 2);
        assert_eq!(tree.subordinates[1].trainer.id, 3);
        assert_eq!(tree.subordinates[0].subordinates[0].trainer.id, 4);
    }

    #[test]
    fn deep_chain_assembles_without_recursion() {
        let ids: Vec<u64> = (1..=500).collect();
        let edges: Vec<(u64, u64)> = (1..500).map(|i| (i, i + 1)).collect();
        let (order, mut summaries, mut adjacency) = setup(&edges, &ids);

        let tree = assemble(1, &order, &mut summaries, &mut adjacency).unwrap();
        let mut depth = 0;
        let mut node = &tree;
        while let Some(next) = node.subordinates.first() {
            node = next;
            depth += 1;
        }
        assert_eq!(depth, 499);
    }

    #[test]
    fn each_trainer_appears_once() {
        // BFS dedup means adjacency never lists a visited id twice; assemble
        // tolerates a stale edge by skipping ids that were never summarised.
        let (order, mut summaries, mut adjacency) = setup(&[(1, 2), (2, 1)], &[1, 2]);
        let tree = assemble(1, &order, &mut summaries, &mut adjacency).unwrap();

        assert_eq!(tree.subordinates.len(), 1);
        let child = &tree.subordinates[0];
        assert_eq!(child.trainer.id, 2);
        // The back-edge to 1 must not re-materialize the root under its report.
        assert!(child.subordinates.is_empty());
    }
}
