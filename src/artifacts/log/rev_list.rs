use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Commits along the primary parent chain, newest first
pub struct RevList<'r> {
    database: &'r Database,
    current_commit_oid: Option<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, start: ObjectId) -> Self {
        Self {
            database,
            current_commit_oid: Some(start),
        }
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.get_commit(&commit_oid) {
            Ok(commit) => {
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Every commit reachable from a tip, the tip included
///
/// Both parent links are followed breadth-first and each commit is yielded
/// exactly once, however many paths lead to it. A fresh walk starts over
/// from the tip.
pub struct Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: ParentsLoaderFn,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<ParentsLoaderFn> Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(load_parents: ParentsLoaderFn, tip: ObjectId) -> Self {
        Self {
            load_parents,
            seen: HashSet::from([tip.clone()]),
            queue: VecDeque::from([tip]),
        }
    }
}

impl<ParentsLoaderFn> Iterator for Ancestors<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.queue.pop_front()?;

        match (self.load_parents)(&commit_oid) {
            Ok(parents) => {
                for parent in parents {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent);
                    }
                }
                Some(Ok(commit_oid))
            }
            Err(error) => {
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}

/// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor)
pub fn is_ancestor<ParentsLoaderFn>(
    load_parents: ParentsLoaderFn,
    ancestor: &ObjectId,
    descendant: &ObjectId,
) -> anyhow::Result<bool>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    for commit_oid in Ancestors::new(load_parents, descendant.clone()) {
        if &commit_oid? == ancestor {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::artifacts::objects::commit::TrackedFiles;
    use crate::artifacts::objects::object::digest;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    /// In-memory commit graph keyed by readable names
    #[derive(Debug, Clone, Default)]
    pub(crate) struct InMemoryGraph {
        parents: HashMap<ObjectId, Vec<ObjectId>>,
    }

    impl InMemoryGraph {
        pub(crate) fn oid(name: &str) -> ObjectId {
            digest(name.as_bytes())
        }

        pub(crate) fn add(&mut self, name: &str, parents: &[&str]) -> &mut Self {
            self.parents.insert(
                Self::oid(name),
                parents.iter().map(|parent| Self::oid(parent)).collect(),
            );
            self
        }

        pub(crate) fn loader(&self) -> impl Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>> + '_ {
            |oid: &ObjectId| {
                self.parents
                    .get(oid)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("unknown commit {oid}"))
            }
        }
    }

    //   root - a - b - m
    //      \         /
    //       c ----- d
    #[fixture]
    fn diamond() -> InMemoryGraph {
        let mut graph = InMemoryGraph::default();
        graph
            .add("root", &[])
            .add("a", &["root"])
            .add("b", &["a"])
            .add("c", &["root"])
            .add("d", &["c"])
            .add("m", &["b", "d"]);
        graph
    }

    #[rstest]
    fn ancestors_visit_each_commit_once(diamond: InMemoryGraph) {
        let visited = Ancestors::new(diamond.loader(), InMemoryGraph::oid("m"))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(visited.len(), 6);
        assert_eq!(visited.iter().collect::<HashSet<_>>().len(), 6);
        assert_eq!(visited.first(), Some(&InMemoryGraph::oid("m")));
        assert_eq!(visited.last(), Some(&InMemoryGraph::oid("root")));
    }

    #[rstest]
    fn ancestors_walk_is_restartable(diamond: InMemoryGraph) {
        let first = Ancestors::new(diamond.loader(), InMemoryGraph::oid("m"))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();
        let second = Ancestors::new(diamond.loader(), InMemoryGraph::oid("m"))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    #[case("d", "m", true)]
    #[case("root", "b", true)]
    #[case("m", "m", true)]
    #[case("c", "b", false)]
    #[case("m", "d", false)]
    fn ancestry_follows_both_parents(
        diamond: InMemoryGraph,
        #[case] ancestor: &str,
        #[case] descendant: &str,
        #[case] expected: bool,
    ) {
        let actual = is_ancestor(
            diamond.loader(),
            &InMemoryGraph::oid(ancestor),
            &InMemoryGraph::oid(descendant),
        )
        .unwrap();

        assert_eq!(actual, expected);
    }

    #[test]
    fn broken_links_surface_as_errors() {
        let mut graph = InMemoryGraph::default();
        graph.add("orphan", &["missing"]);

        let results =
            Ancestors::new(graph.loader(), InMemoryGraph::oid("orphan")).collect::<Vec<_>>();

        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }

    #[test]
    fn rev_list_follows_first_parents_only() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        let stamp = "Mon Mar 03 10:00:00 2025 +0200".to_string();

        let commit = |message: &str, parent: &ObjectId, merge_parent: Option<ObjectId>| {
            Commit::new(
                message.to_string(),
                stamp.clone(),
                Some(parent.clone()),
                merge_parent,
                TrackedFiles::new(),
            )
        };

        let root_id = database.put_commit(&Commit::initial()).unwrap();
        let side_id = database.put_commit(&commit("side", &root_id, None)).unwrap();
        let main_id = database.put_commit(&commit("main", &root_id, None)).unwrap();
        let merge_id = database
            .put_commit(&commit("merge", &main_id, Some(side_id)))
            .unwrap();

        let history = RevList::new(&database, merge_id.clone())
            .map(|entry| entry.map(|(oid, _)| oid))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(history, vec![merge_id, main_id, root_id]);
    }
}
