//! Split point search
//!
//! The split point of two tips is the common ancestor closest to them.
//! Distances are measured breadth-first from each tip along both parent
//! links, so an ancestor reached through a merge parent is found at its true
//! distance.
//!
//! Among the common ancestors the winner is the one nearest to the head tip;
//! ties go to the smallest sum of both distances and then to the smallest id,
//! which keeps the answer stable for a fixed graph.

use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    struct VisitState: u8 {
        const VISITED_FROM_HEAD = 0b01;
        const VISITED_FROM_GIVEN = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_HEAD.bits() | Self::VISITED_FROM_GIVEN.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_HEAD) {
            flags.push("HEAD");
        }
        if self.contains(VisitState::VISITED_FROM_GIVEN) {
            flags.push("GIVEN");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Visit {
    state: VisitState,
    head_distance: usize,
    given_distance: usize,
}

pub struct SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: ParentsLoaderFn,
}

impl<ParentsLoaderFn> SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(load_parents: ParentsLoaderFn) -> Self {
        Self { load_parents }
    }

    /// Shortest edge count from `tip` to each of its ancestors
    fn distances(&self, tip: &ObjectId) -> anyhow::Result<HashMap<ObjectId, usize>> {
        let mut distances = HashMap::from([(tip.clone(), 0)]);
        let mut queue = VecDeque::from([tip.clone()]);

        while let Some(commit_oid) = queue.pop_front() {
            let distance = distances[&commit_oid];

            for parent in (self.load_parents)(&commit_oid)? {
                if !distances.contains_key(&parent) {
                    distances.insert(parent.clone(), distance + 1);
                    queue.push_back(parent);
                }
            }
        }

        Ok(distances)
    }

    pub fn find(&self, head: &ObjectId, given: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut visits = HashMap::<ObjectId, Visit>::new();

        for (commit_oid, distance) in self.distances(head)? {
            let visit = visits.entry(commit_oid).or_default();
            visit.state |= VisitState::VISITED_FROM_HEAD;
            visit.head_distance = distance;
        }
        for (commit_oid, distance) in self.distances(given)? {
            let visit = visits.entry(commit_oid).or_default();
            visit.state |= VisitState::VISITED_FROM_GIVEN;
            visit.given_distance = distance;
        }

        let split_point = visits
            .into_iter()
            .filter(|(_, visit)| visit.state == VisitState::VISITED_FROM_BOTH)
            .min_by(|(left_oid, left), (right_oid, right)| {
                left.head_distance
                    .cmp(&right.head_distance)
                    .then_with(|| {
                        (left.head_distance + left.given_distance)
                            .cmp(&(right.head_distance + right.given_distance))
                    })
                    .then_with(|| left_oid.cmp(right_oid))
            });

        if let Some((commit_oid, visit)) = &split_point {
            tracing::debug!(
                head = %head.to_short_oid(),
                given = %given.to_short_oid(),
                split = %commit_oid.to_short_oid(),
                state = ?visit.state,
                head_distance = visit.head_distance,
                given_distance = visit.given_distance,
                "found split point"
            );
        }

        Ok(split_point.map(|(commit_oid, _)| commit_oid))
    }
}
