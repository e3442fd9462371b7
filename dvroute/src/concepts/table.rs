use crate::framework::{Metric, NodeId, INF};
use crate::util::format_metric;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything a node knows: its own vector, the last vector heard from each peer, and the next hop per destination.
#[cfg_attr(feature = "serde", serde_with::serde_as)]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceTable {
    /// this node's own distance vector, the only row computed locally
    pub own: Vec<Metric>,
    /// peer -> last vector received from that peer, peers never heard from have no entry (read as all INF)
    #[cfg_attr(feature = "serde", serde_as(as = "Vec<(_, _)>"))]
    pub peers: BTreeMap<NodeId, Vec<Metric>>,
    /// destination -> next hop, None if unreachable or for the node itself
    pub predecessors: Vec<Option<NodeId>>,
    /// whether a relaxation pass has run, before that the own row is the raw link-cost seed
    pub relaxed: bool,
}

impl DistanceTable {
    /// an empty table, every entry INF and no next hops
    pub fn new(node_count: usize) -> Self {
        Self {
            own: vec![INF; node_count],
            peers: BTreeMap::new(),
            predecessors: vec![None; node_count],
            relaxed: false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.own.len()
    }

    pub fn peer_row(&self, peer: NodeId) -> Option<&[Metric]> {
        self.peers.get(&peer).map(|row| row.as_slice())
    }

    /// the cost from `peer` to `dest` as last reported by `peer`
    pub fn peer_metric(&self, peer: NodeId, dest: NodeId) -> Metric {
        self.peers
            .get(&peer)
            .and_then(|row| row.get(dest).copied())
            .unwrap_or(INF)
    }

    /// whether `vector` is exactly what is already stored for `peer`
    pub fn matches_peer_row(&self, peer: NodeId, vector: &[Metric]) -> bool {
        match self.peers.get(&peer) {
            Some(row) => row.as_slice() == vector,
            None => vector.iter().all(|m| *m == INF),
        }
    }

    /// replaces the whole row for `peer`, nothing is merged
    pub fn store_peer_row(&mut self, peer: NodeId, vector: &[Metric]) {
        let row = self.peers.entry(peer).or_default();
        row.clear();
        row.extend_from_slice(vector);
    }

    /// the row for node `r`, as seen from `address`
    pub fn metric_at(&self, address: NodeId, r: NodeId, dest: NodeId) -> Metric {
        if r == address {
            self.own.get(dest).copied().unwrap_or(INF)
        } else {
            self.peer_metric(r, dest)
        }
    }
}

/// Prints the full table held at one node, one row per node in the network
pub struct TableDump<'a> {
    pub address: NodeId,
    pub table: &'a DistanceTable,
}

impl Display for TableDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let n = self.table.node_count();
        write!(f, "{:>5}", format!("D{}|", self.address))?;
        for i in 0..n {
            write!(f, "{:>5}", i)?;
        }
        writeln!(f)?;
        writeln!(f, "----+{}", "-----".repeat(n))?;
        for r in 0..n {
            write!(f, "{:4}|", r)?;
            for d in 0..n {
                write!(f, "{:>5}", format_metric(self.table.metric_at(self.address, r, d)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
