use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::shared::sensor_frames::normalize_frame_id;
use crate::transform::domain::rigid_transform::RigidTransform;
use crate::transform::domain::transform_resolver::{TransformError, TransformResolver};

type Edges = HashMap<(String, String), RigidTransform>;

/// In-memory transform tree that lookups can block on.
///
/// Edges may be inserted from any thread at any time; a waiting lookup wakes
/// on every insert and re-searches the tree. Lookups chain edges in either
/// direction, inverting where needed.
pub struct TransformBuffer {
    edges: Mutex<Edges>,
    updated: Condvar,
}

impl TransformBuffer {
    pub fn new() -> Self {
        Self {
            edges: Mutex::new(HashMap::new()),
            updated: Condvar::new(),
        }
    }

    /// Records the transform mapping `source` points into `target`.
    pub fn insert(&self, source: &str, target: &str, transform: RigidTransform) {
        let key = (
            normalize_frame_id(source).to_string(),
            normalize_frame_id(target).to_string(),
        );
        self.edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, transform);
        self.updated.notify_all();
    }

    pub fn len(&self) -> usize {
        self.edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TransformBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformResolver for TransformBuffer {
    fn lookup(
        &self,
        source: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<RigidTransform, TransformError> {
        let source = normalize_frame_id(source);
        let target = normalize_frame_id(target);
        // A timeout too large to represent as an instant waits without limit.
        let deadline = Instant::now().checked_add(timeout);

        let mut edges = self.edges.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(transform) = find_chain(&edges, source, target) {
                return Ok(transform);
            }
            edges = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(TransformError::Timeout {
                            source_frame: source.to_string(),
                            target_frame: target.to_string(),
                            timeout,
                        });
                    }
                    self.updated
                        .wait_timeout(edges, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .updated
                    .wait(edges)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

/// Breadth-first search from `source` to `target`, accumulating transforms.
fn find_chain(edges: &Edges, source: &str, target: &str) -> Option<RigidTransform> {
    if source == target {
        return Some(RigidTransform::identity());
    }

    let mut visited: HashSet<&str> = HashSet::from([source]);
    let mut queue: VecDeque<(&str, RigidTransform)> =
        VecDeque::from([(source, RigidTransform::identity())]);

    while let Some((frame, to_frame)) = queue.pop_front() {
        for ((from, to), edge) in edges {
            let (next, step) = if from == frame {
                (to.as_str(), *edge)
            } else if to == frame {
                (from.as_str(), edge.inverse())
            } else {
                continue;
            };
            if !visited.insert(next) {
                continue;
            }
            let accumulated = step.compose(&to_frame);
            if next == target {
                return Some(accumulated);
            }
            queue.push_back((next, accumulated));
        }
    }
    None
}
