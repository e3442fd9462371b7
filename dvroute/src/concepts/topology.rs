use crate::feedback::RoutingError;
use crate::framework::{LinkCosts, Metric, NodeId, INF};
use std::cell::RefCell;
use std::rc::Rc;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The environment's view of the network: a symmetric matrix of direct link costs.
///
/// Routers never write to this, they only read their own row through [`LinkCosts`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostMatrix {
    costs: Vec<Vec<Metric>>,
}

/// A cost matrix shared between a single-threaded environment and its routers
pub type SharedTopology = Rc<RefCell<CostMatrix>>;

impl CostMatrix {
    /// no links at all, each node is at distance 0 from itself
    pub fn new(node_count: usize) -> Self {
        let mut costs = vec![vec![INF; node_count]; node_count];
        for (i, row) in costs.iter_mut().enumerate() {
            row[i] = 0;
        }
        Self { costs }
    }

    pub fn from_links(node_count: usize, links: &[(NodeId, NodeId, Metric)]) -> Result<Self, RoutingError> {
        let mut matrix = Self::new(node_count);
        for (a, b, cost) in links {
            matrix.set_link(*a, *b, *cost)?;
        }
        Ok(matrix)
    }

    pub fn node_count(&self) -> usize {
        self.costs.len()
    }

    fn check(&self, node: NodeId) -> Result<(), RoutingError> {
        if node >= self.node_count() {
            return Err(RoutingError::UnknownNode {
                node,
                node_count: self.node_count(),
            });
        }
        Ok(())
    }

    /// sets the cost in both directions, INF takes the link down
    pub fn set_link(&mut self, a: NodeId, b: NodeId, cost: Metric) -> Result<(), RoutingError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(RoutingError::SelfLink { node: a });
        }
        self.costs[a][b] = cost;
        self.costs[b][a] = cost;
        Ok(())
    }

    pub fn cost(&self, a: NodeId, b: NodeId) -> Metric {
        self.costs
            .get(a)
            .and_then(|row| row.get(b).copied())
            .unwrap_or(INF)
    }

    /// every node with a finite direct link to `node`
    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        (0..self.node_count())
            .filter(|other| *other != node && self.cost(node, *other) != INF)
            .collect()
    }

    pub fn into_shared(self) -> SharedTopology {
        Rc::new(RefCell::new(self))
    }
}

impl LinkCosts for CostMatrix {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric {
        self.cost(from, to)
    }
}
