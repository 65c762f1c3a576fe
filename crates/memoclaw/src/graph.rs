//! Breadth-first traversal over memory relations.

use std::collections::HashMap;
use std::future::Future;

use tracing::debug;

use crate::error::Result;
use crate::types::{Direction, RelationType, RelationWithMemory};

/// Memory ID → relations listed for it.
pub type RelationGraph = HashMap<String, Vec<RelationWithMemory>>;

/// Walk relations from `root` for up to `max_depth` hops.
///
/// Each node is fetched at most once: the result map doubles as the visited
/// set, so cycles and convergent paths cost no extra calls. Stops early when a
/// level produces no unvisited neighbors. `max_depth == 0` fetches nothing.
pub async fn traverse<F, Fut>(root: &str, max_depth: u32, mut fetch: F) -> Result<RelationGraph>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<RelationWithMemory>>>,
{
    let mut visited = RelationGraph::new();
    let mut frontier = vec![root.to_string()];

    for depth in 0..max_depth {
        let mut next = Vec::new();
        for id in frontier {
            if visited.contains_key(&id) {
                continue;
            }
            let relations = fetch(id.clone()).await?;
            next.extend(
                relations
                    .iter()
                    .map(|rel| &rel.memory.id)
                    .filter(|neighbor| **neighbor != id && !visited.contains_key(*neighbor))
                    .cloned(),
            );
            visited.insert(id, relations);
        }
        debug!(depth, visited = visited.len(), frontier = next.len(), "Graph level done");
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    Ok(visited)
}

/// Keep relations matching the given type and/or direction.
pub fn filter_relations(
    relations: Vec<RelationWithMemory>,
    relation_type: Option<RelationType>,
    direction: Option<Direction>,
) -> Vec<RelationWithMemory> {
    relations
        .into_iter()
        .filter(|rel| relation_type.map_or(true, |t| rel.relation_type == t))
        .filter(|rel| direction.map_or(true, |d| rel.direction == d))
        .collect()
}
