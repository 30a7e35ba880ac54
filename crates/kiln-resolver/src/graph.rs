//! The resolved dependency graph and a petgraph view of it for display.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::candidate::PackageId;

/// Final resolution output: each selected package and its direct
/// dependencies, already pinned to concrete versions. At most one entry per
/// package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedGraph {
    packages: BTreeMap<PackageId, Vec<PackageId>>,
    /// Package name to its selected id.
    by_name: HashMap<String, PackageId>,
}

/// Flat, serializable form of one [`ResolvedGraph`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<PackageId>,
}

impl ResolvedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package. Returns the already-present id if another version
    /// of the same name is in the graph, leaving the graph unchanged.
    pub fn insert(&mut self, id: PackageId, deps: Vec<PackageId>) -> Result<(), PackageId> {
        if let Some(existing) = self.by_name.get(&id.name) {
            if *existing != id {
                return Err(existing.clone());
            }
        } else {
            self.by_name.insert(id.name.clone(), id.clone());
        }
        self.packages.insert(id, deps);
        Ok(())
    }

    /// The selected id for a package name.
    pub fn find(&self, name: &str) -> Option<&PackageId> {
        self.by_name.get(name)
    }

    pub fn dependencies(&self, id: &PackageId) -> Option<&[PackageId]> {
        self.packages.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageId, &[PackageId])> {
        self.packages.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn to_entries(&self) -> Vec<ResolvedPackage> {
        self.packages
            .iter()
            .map(|(id, deps)| ResolvedPackage {
                name: id.name.clone(),
                version: id.version.clone(),
                dependencies: deps.clone(),
            })
            .collect()
    }

    /// Rebuild a graph from flat entries, e.g. a lockfile. Fails with the
    /// clashing id if two entries share a name.
    pub fn from_entries<I>(entries: I) -> Result<Self, PackageId>
    where
        I: IntoIterator<Item = ResolvedPackage>,
    {
        let mut graph = Self::new();
        for entry in entries {
            graph.insert(PackageId::new(entry.name, entry.version), entry.dependencies)?;
        }
        Ok(graph)
    }
}

/// A resolved graph hung under a project root node, for tree rendering and
/// path queries.
pub struct DependencyGraph {
    graph: DiGraph<PackageId, ()>,
    /// Package name to node index.
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl DependencyGraph {
    /// Build the display graph. `roots` are the names the project depends
    /// on directly; names missing from `resolved` are skipped.
    pub fn build<'a, I>(project: PackageId, resolved: &ResolvedGraph, roots: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let root = graph.add_node(project);

        for (id, _) in resolved.iter() {
            let idx = graph.add_node(id.clone());
            index.insert(id.name.clone(), idx);
        }
        for (id, deps) in resolved.iter() {
            let from = index[&id.name];
            for dep in deps {
                if let Some(&to) = index.get(&dep.name) {
                    graph.update_edge(from, to, ());
                }
            }
        }
        for name in roots {
            if let Some(&to) = index.get(name) {
                graph.update_edge(root, to, ());
            }
        }

        Self { graph, index, root }
    }

    pub fn find(&self, name: &str) -> Option<&PackageId> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Direct dependencies of a node, sorted by name for stable output.
    fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted(self.graph.edges_directed(idx, Direction::Outgoing).map(|e| e.target()))
    }

    fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted(self.graph.edges_directed(idx, Direction::Incoming).map(|e| e.source()))
    }

    fn sorted(&self, nodes: impl Iterator<Item = NodeIndex>) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = nodes.collect();
        nodes.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        nodes
    }

    /// Render the tree below the project root. Packages already on the
    /// current path are printed once more and marked `(*)` instead of being
    /// descended into again.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[self.root]);
        let mut on_path = HashSet::from([self.root]);
        let children = self.children(self.root);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                &mut output,
                child,
                "",
                i == count - 1,
                1,
                max_depth,
                &mut on_path,
            );
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        on_path: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if on_path.contains(&idx) {
            output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }

        on_path.insert(idx);
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.children(idx);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                on_path,
            );
        }
        on_path.remove(&idx);
    }

    /// Shortest path from the project root to `name`, root first.
    pub fn find_path(&self, name: &str) -> Option<Vec<&PackageId>> {
        let target = *self.index.get(name)?;
        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = std::collections::VecDeque::from([self.root]);
        let mut seen = HashSet::from([self.root]);

        while let Some(current) = queue.pop_front() {
            if current == target {
                let mut path = vec![&self.graph[current]];
                let mut cursor = current;
                while let Some(&prev) = came_from.get(&cursor) {
                    path.push(&self.graph[prev]);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.children(current) {
                if seen.insert(next) {
                    came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Render everything that depends on `name`, transitively, up to the
    /// project root.
    pub fn print_inverted_tree(&self, name: &str) -> String {
        let mut output = String::new();
        let Some(&idx) = self.index.get(name) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut on_path = HashSet::from([idx]);
        let parents = self.parents(idx);
        let count = parents.len();
        for (i, parent) in parents.into_iter().enumerate() {
            self.print_inverted_subtree(&mut output, parent, "", i == count - 1, &mut on_path);
        }
        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        on_path: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if !on_path.insert(idx) {
            output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let parents = self.parents(idx);
        let count = parents.len();
        for (i, parent) in parents.into_iter().enumerate() {
            self.print_inverted_subtree(output, parent, &child_prefix, i == count - 1, on_path);
        }
        on_path.remove(&idx);
    }

    /// Number of resolved packages (excluding the project root).
    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
