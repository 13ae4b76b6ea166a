use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::{ExecutionOrder, RequestSpec};
use crate::error::ChainError;

/// Single-parent dependency forest over one config's requests.
#[derive(Debug)]
pub struct DependencyGraph<'cfg> {
    names: Vec<&'cfg str>,
    requests: HashMap<&'cfg str, &'cfg RequestSpec>,
    parents: HashMap<&'cfg str, &'cfg str>,
    children: HashMap<&'cfg str, Vec<&'cfg str>>,
}

impl<'cfg> DependencyGraph<'cfg> {
    /// Indexes `requests` by name and links each to its parent.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownDependency`] when a parent is missing and
    /// [`ChainError::CyclicDependency`] when a parent chain closes on itself.
    pub fn build(requests: &'cfg [RequestSpec]) -> Result<Self, ChainError> {
        let graph = Self::link(requests)?;
        graph.detect_cycles()?;
        Ok(graph)
    }

    /// Links requests without the cycle check, so ordering can be exercised
    /// on a closed chain.
    #[cfg(test)]
    pub(crate) fn build_unchecked(requests: &'cfg [RequestSpec]) -> Result<Self, ChainError> {
        Self::link(requests)
    }

    fn link(requests: &'cfg [RequestSpec]) -> Result<Self, ChainError> {
        let mut graph = Self {
            names: Vec::with_capacity(requests.len()),
            requests: HashMap::with_capacity(requests.len()),
            parents: HashMap::new(),
            children: HashMap::new(),
        };
        for request in requests {
            if graph
                .requests
                .insert(request.name.as_str(), request)
                .is_none()
            {
                graph.names.push(request.name.as_str());
            }
        }

        for request in requests {
            let Some(parent) = request.dependency() else {
                continue;
            };
            if !graph.requests.contains_key(parent) {
                return Err(ChainError::UnknownDependency {
                    name: request.name.clone(),
                    dependency: parent.to_owned(),
                });
            }
            graph.parents.insert(request.name.as_str(), parent);
            graph
                .children
                .entry(parent)
                .or_default()
                .push(request.name.as_str());
        }
        Ok(graph)
    }

    fn detect_cycles(&self) -> Result<(), ChainError> {
        for &start in &self.names {
            let mut seen = HashSet::new();
            let mut current = start;
            while let Some(&parent) = self.parents.get(current) {
                if !seen.insert(current) {
                    return Err(ChainError::CyclicDependency {
                        name: start.to_owned(),
                    });
                }
                current = parent;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn request(&self, name: &str) -> Option<&'cfg RequestSpec> {
        self.requests.get(name).copied()
    }

    #[must_use]
    pub fn parent(&self, name: &str) -> Option<&'cfg str> {
        self.parents.get(name).copied()
    }

    #[must_use]
    pub fn children(&self, name: &str) -> &[&'cfg str] {
        self.children.get(name).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every request name exactly once, in the requested order.
    ///
    /// Both orders start from a parent-first walk over the config order.
    /// [`ExecutionOrder::Compat`] then reverses it, so dependents come first.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::CyclicDependency`] when the walk re-enters a
    /// request it is still visiting.
    pub fn execution_order(&self, order: ExecutionOrder) -> Result<Vec<String>, ChainError> {
        let mut result = Vec::with_capacity(self.names.len());
        let mut visited = HashSet::with_capacity(self.names.len());
        let mut visiting = HashSet::new();
        for &name in &self.names {
            self.visit(name, &mut visited, &mut visiting, &mut result)?;
        }
        if order == ExecutionOrder::Compat {
            result.reverse();
        }
        debug!("Execution order ({:?}): {:?}", order, result);
        Ok(result.into_iter().map(str::to_owned).collect())
    }

    fn visit(
        &self,
        name: &'cfg str,
        visited: &mut HashSet<&'cfg str>,
        visiting: &mut HashSet<&'cfg str>,
        result: &mut Vec<&'cfg str>,
    ) -> Result<(), ChainError> {
        if visiting.contains(name) {
            return Err(ChainError::CyclicDependency {
                name: name.to_owned(),
            });
        }
        if visited.contains(name) {
            return Ok(());
        }
        visiting.insert(name);
        if let Some(parent) = self.parent(name) {
            self.visit(parent, visited, visiting, result)?;
        }
        visiting.remove(name);
        visited.insert(name);
        result.push(name);
        Ok(())
    }
}
