use crate::framework::{Metric, NodeId};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A full snapshot of the sender's distance vector, addressed to one neighbour.
///
/// Once queued, the sender keeps no claim on it. The receiver copies the vector into its own table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Advertisement {
    /// the node whose vector this is
    pub source: NodeId,
    /// the neighbour this should be delivered to
    pub dest: NodeId,
    /// cost from `source` to every node, indexed by node id
    pub vector: Vec<Metric>,
}

impl Advertisement {
    pub fn new(source: NodeId, dest: NodeId, vector: Vec<Metric>) -> Self {
        Self {
            source,
            dest,
            vector,
        }
    }

    /// number of entries in the vector, should equal the node count
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}
