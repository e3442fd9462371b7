use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Identity of a node on the routing network, in `0..node_count`
pub type NodeId = usize;
/// Cost of a link or path, [`INF`] for no route. Lower is better.
pub type Metric = u16;

/// No link, or no known route
pub const INF: Metric = 0xFFFF;

pub trait RoutingSystem {
    /// Read-only view of the direct link costs, owned and mutated by the environment
    type LinkCosts: LinkCosts;
    fn config() -> ProtocolParams {
        Default::default()
    }
}

/// A read-only cost oracle.
///
/// The router only ever queries links where `from` is its own address.
pub trait LinkCosts {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric;
}

impl<L: LinkCosts + ?Sized> LinkCosts for &L {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric {
        (**self).link_cost(from, to)
    }
}

impl<L: LinkCosts + ?Sized> LinkCosts for Rc<L> {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric {
        (**self).link_cost(from, to)
    }
}

impl<L: LinkCosts + ?Sized> LinkCosts for Arc<L> {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric {
        (**self).link_cost(from, to)
    }
}

/// The environment must not hold a mutable borrow while a trigger is running on a node.
impl<L: LinkCosts> LinkCosts for RefCell<L> {
    fn link_cost(&self, from: NodeId, to: NodeId) -> Metric {
        self.borrow().link_cost(from, to)
    }
}

pub struct ProtocolParams {
    /// re-check the table invariants after every trigger, failing the trigger if they do not hold
    pub verify_invariants: bool,
}
impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            verify_invariants: cfg!(debug_assertions),
        }
    }
}
