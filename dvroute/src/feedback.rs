use thiserror::Error;
use crate::framework::NodeId;

/// Contract violations by the environment, or a broken table invariant.
///
/// Contract violations are rejected before the table is touched. An invariant violation is reported after the mutation that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Node {node} does not exist in a network of {node_count} nodes.")]
    UnknownNode {
        node: NodeId,
        node_count: usize
    },
    #[error("A network must contain at least one node.")]
    EmptyNetwork,
    /// A node should never hear its own vector over a link
    #[error("Node {node} received an advertisement from itself.")]
    SelfAdvertisement {
        node: NodeId
    },
    #[error("Advertisement addressed to {dest} was delivered to {node}.")]
    MisaddressedAdvertisement {
        node: NodeId,
        dest: NodeId
    },
    #[error("Distance vector from {sender} has {got} entries, expected {expected}.")]
    VectorLengthMismatch {
        sender: NodeId,
        expected: usize,
        got: usize
    },
    #[error("Node {node} has no predecessor towards itself.")]
    PredecessorOfSelf {
        node: NodeId
    },
    #[error("Node {node} cannot have a link to itself.")]
    SelfLink {
        node: NodeId
    },
    /// The table is internally inconsistent, this is a bug in the router or in the cost oracle
    #[error("Invariant {invariant} violated at node {node}: {detail}")]
    InvariantViolated {
        node: NodeId,
        invariant: &'static str,
        detail: String
    }
}
