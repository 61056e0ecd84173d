//! Dependency graph over discovered entry points
//!
//! Nodes are entry points keyed by package name. An edge exists from A
//! to B when A names B as a dependency and B was itself discovered.
//! Dependency names that match no discovered entry point refer to
//! plain packages outside our scope and produce no edge.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

use crate::domain::entities::EntryPoint;
use crate::error::{RefitError, RefitResult};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, EntryPoint>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }

    pub fn from_entry_points(entry_points: impl IntoIterator<Item = EntryPoint>) -> Self {
        let mut graph = Self::new();
        for ep in entry_points {
            graph.insert(ep);
        }
        graph
    }

    pub fn insert(&mut self, entry_point: EntryPoint) {
        self.nodes.insert(entry_point.name().to_string(), entry_point);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&EntryPoint> {
        self.nodes.get(name)
    }

    /// Entry points in name order
    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.nodes.values()
    }

    /// Entry point whose directory is `path`, if any
    pub fn find_by_path(&self, path: &Path) -> Option<&EntryPoint> {
        self.nodes.values().find(|ep| ep.path() == path)
    }

    /// Resolve one declared dependency string to a node name.
    ///
    /// Exact match first, then successively shorter segment prefixes:
    /// a deep specifier like `@scope/pkg/sub/helper` is a dependency on
    /// entry point `@scope/pkg/sub` when that exists, else `@scope/pkg`.
    fn match_dependency(&self, specifier: &str) -> Option<&str> {
        let mut candidate = specifier;
        loop {
            if let Some((name, _)) = self.nodes.get_key_value(candidate) {
                return Some(name.as_str());
            }
            match candidate.rfind('/') {
                Some(idx) => candidate = &candidate[..idx],
                None => return None,
            }
        }
    }

    /// Node names `ep` depends on, deduplicated
    pub fn internal_deps(&self, ep: &EntryPoint) -> BTreeSet<&str> {
        ep.dependencies()
            .filter_map(|dep| self.match_dependency(dep))
            .collect()
    }

    /// Entry points ordered so every dependency precedes its dependents.
    ///
    /// Kahn's algorithm over name-sorted nodes; ties release in name
    /// order, so the result is stable across runs. Fails with the
    /// offending cycle when no valid order exists.
    pub fn compilation_order(&self) -> RefitResult<Vec<&EntryPoint>> {
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (name, ep) in &self.nodes {
            in_degree.entry(name).or_insert(0);
            for dep in self.internal_deps(ep) {
                *in_degree.entry(name).or_insert(0) += 1;
                dependents.entry(dep).or_default().push(name);
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(name) = ready.iter().next().copied() {
            ready.remove(name);
            order.push(&self.nodes[name]);

            for &dependent in dependents.get(name).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() < self.nodes.len() {
            // Kahn stalls only when at least one cycle exists.
            let cycle = self.find_cycle().unwrap_or_default();
            return Err(RefitError::CyclicDependency { cycle });
        }

        Ok(order)
    }

    /// Locate one dependency cycle and return it as a closed path
    /// (first node repeated at the end).
    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit<'a>(
            graph: &'a DependencyGraph,
            name: &'a str,
            marks: &mut BTreeMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(name) {
                Some(Mark::Done) => return None,
                Some(Mark::InProgress) => {
                    let start = path.iter().position(|n| *n == name)?;
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(name.to_string());
                    return Some(cycle);
                }
                None => {}
            }

            marks.insert(name, Mark::InProgress);
            path.push(name);
            let ep = &graph.nodes[name];
            for dep in graph.internal_deps(ep) {
                if let Some(cycle) = visit(graph, dep, marks, path) {
                    return Some(cycle);
                }
            }
            path.pop();
            marks.insert(name, Mark::Done);
            None
        }

        let mut marks = BTreeMap::new();
        let mut path = Vec::new();
        for name in self.nodes.keys() {
            if let Some(cycle) = visit(self, name, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    /// Names reachable from `root` through dependency edges, `root`
    /// included. `None` when `root` is not a node.
    pub fn dependency_closure(&self, root: &str) -> Option<BTreeSet<String>> {
        let root_ep = self.nodes.get(root)?;

        let mut closure = BTreeSet::new();
        closure.insert(root.to_string());
        let mut queue: VecDeque<&EntryPoint> = VecDeque::new();
        queue.push_back(root_ep);

        while let Some(ep) = queue.pop_front() {
            for dep in self.internal_deps(ep) {
                if closure.insert(dep.to_string()) {
                    queue.push_back(&self.nodes[dep]);
                }
            }
        }

        Some(closure)
    }

    /// Sub-graph containing `root` and everything it transitively
    /// depends on. `None` when `root` is not a node.
    pub fn restricted_to(&self, root: &str) -> Option<DependencyGraph> {
        let closure = self.dependency_closure(root)?;
        let nodes = self
            .nodes
            .iter()
            .filter(|(name, _)| closure.contains(*name))
            .map(|(name, ep)| (name.clone(), ep.clone()))
            .collect();
        Some(DependencyGraph { nodes })
    }
}
