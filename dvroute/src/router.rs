use crate::concepts::packet::Advertisement;
use crate::concepts::table::{DistanceTable, TableDump};
use crate::feedback::RoutingError;
use crate::framework::{LinkCosts, Metric, NodeId, RoutingSystem, INF};
use crate::util::{is_finite, sum_inf};
use educe::Educe;
use log::{debug, error, trace, warn};

/// A single node running distance-vector routing.
///
/// The router performs no I/O. Every advertisement it wants to send is queued in `outbound_packets`,
/// and the environment is responsible for draining and delivering them.
#[derive(Educe)]
#[educe(Debug(bound()))]
pub struct Router<T: RoutingSystem + ?Sized> {
    pub address: NodeId,
    pub table: DistanceTable,
    pub outbound_packets: Vec<Advertisement>,
    #[educe(Debug(ignore))]
    costs: T::LinkCosts,
}

impl<T: RoutingSystem + ?Sized> Router<T> {
    /// Creates the node, seeds its own vector from the direct link costs and queues the
    /// bootstrap advertisement for every neighbour.
    pub fn new(address: NodeId, node_count: usize, costs: T::LinkCosts) -> Result<Self, RoutingError> {
        if node_count == 0 {
            return Err(RoutingError::EmptyNetwork);
        }
        if address >= node_count {
            return Err(RoutingError::UnknownNode { node: address, node_count });
        }
        let mut router = Self {
            address,
            table: DistanceTable::new(node_count),
            outbound_packets: Vec::new(),
            costs,
        };
        for other in 0..node_count {
            if other == address {
                continue;
            }
            let cost = router.link_cost(other);
            router.table.own[other] = cost;
            if is_finite(cost) {
                router.table.predecessors[other] = Some(other);
            }
        }
        router.table.own[address] = 0;

        debug!("node {} starting with {} neighbours", address, router.neighbours().count());
        router.broadcast_vector();
        router.verify_if_configured()?;
        Ok(router)
    }

    /// Rebuilds a node from a previously saved table, nothing is sent.
    pub fn restore(address: NodeId, table: DistanceTable, costs: T::LinkCosts) -> Result<Self, RoutingError> {
        let router = Self {
            address,
            table,
            outbound_packets: Vec::new(),
            costs,
        };
        router.check_node(address)?;
        router.verify_invariants()?;
        Ok(router)
    }

    // region Introspection
    pub fn node_count(&self) -> usize {
        self.table.node_count()
    }

    /// this node's current belief of the cost to every node
    pub fn distance_vector(&self) -> &[Metric] {
        &self.table.own
    }

    /// The next hop towards `dest`, None if `dest` is currently unreachable
    pub fn predecessor(&self, dest: NodeId) -> Result<Option<NodeId>, RoutingError> {
        self.check_node(dest)?;
        if dest == self.address {
            return Err(RoutingError::PredecessorOfSelf { node: self.address });
        }
        Ok(self.table.predecessors[dest])
    }

    /// cost of the direct link to `other`, INF if there is none
    pub fn link_cost(&self, other: NodeId) -> Metric {
        self.costs.link_cost(self.address, other)
    }

    /// every node with a finite direct link to us
    pub fn neighbours(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).filter(|other| *other != self.address && is_finite(self.link_cost(*other)))
    }

    pub fn dump_table(&self) -> TableDump<'_> {
        TableDump {
            address: self.address,
            table: &self.table,
        }
    }

    /// hands all queued advertisements over to the environment
    pub fn take_outbound(&mut self) -> Vec<Advertisement> {
        std::mem::take(&mut self.outbound_packets)
    }
    // endregion

    // region Triggers
    /// handle a distance vector received from a neighbour
    pub fn handle_advertisement(&mut self, packet: &Advertisement) -> Result<(), RoutingError> {
        if let Err(err) = self.validate(packet) {
            error!("Rejected advertisement {} -> {} at node {}: {}", packet.source, packet.dest, self.address, err);
            return Err(err);
        }

        if self.table.matches_peer_row(packet.source, &packet.vector) {
            trace!("node {} ignoring unchanged vector from {}", self.address, packet.source);
            return Ok(());
        }

        trace!("node {} got vector {:?} from {}", self.address, packet.vector, packet.source);
        self.table.store_peer_row(packet.source, &packet.vector);
        self.recompute();
        self.verify_if_configured()
    }

    /// The environment has changed the cost of our link to `neighbour`, `new_cost` may be INF for a link that went down.
    ///
    /// The cost oracle must already reflect the change.
    pub fn handle_link_cost_change(&mut self, neighbour: NodeId, new_cost: Metric) -> Result<(), RoutingError> {
        self.check_node(neighbour)?;
        if neighbour == self.address {
            return Err(RoutingError::SelfLink { node: self.address });
        }
        let observed = self.link_cost(neighbour);
        if observed != new_cost {
            warn!(
                "node {} notified of cost {} to {}, but the link currently costs {}",
                self.address, new_cost, neighbour, observed
            );
        }

        self.recompute();
        self.verify_if_configured()
    }
    // endregion

    // region Route Selection
    /// Relaxes the own row, then broadcasts it if anything changed. Returns whether it changed.
    pub fn recompute(&mut self) -> bool {
        let changed = self.update_routes();
        if changed {
            debug!("node {} has a new vector {:?}", self.address, self.table.own);
            self.broadcast_vector();
        }
        changed
    }

    /// Recalculates every destination from the current peer rows and link costs, does not broadcast.
    ///
    /// When several neighbours tie, the lowest id wins.
    pub fn update_routes(&mut self) -> bool {
        let previous = self.table.own.clone();
        let link_costs: Vec<Metric> = (0..self.node_count()).map(|v| self.link_cost(v)).collect();

        for dest in 0..self.node_count() {
            if dest == self.address {
                continue;
            }
            let (best, next_hop) = self.best_route(&link_costs, dest);
            self.table.own[dest] = best;
            self.table.predecessors[dest] = next_hop;
        }
        self.table.own[self.address] = 0;
        self.table.predecessors[self.address] = None;
        self.table.relaxed = true;

        previous != self.table.own
    }

    fn best_route(&self, link_costs: &[Metric], dest: NodeId) -> (Metric, Option<NodeId>) {
        let mut best = INF;
        let mut next_hop = None;
        for (v, cost) in link_costs.iter().enumerate() {
            if v == self.address {
                continue;
            }
            let metric = sum_inf(*cost, self.table.peer_metric(v, dest));
            if metric < best {
                best = metric;
                next_hop = Some(v);
            }
        }
        (best, next_hop)
    }

    /// queues a fresh snapshot of the own row for every neighbour
    pub fn broadcast_vector(&mut self) {
        let neighbours: Vec<NodeId> = self.neighbours().collect();
        for neigh in neighbours {
            self.outbound_packets.push(Advertisement::new(self.address, neigh, self.table.own.clone()));
        }
    }
    // endregion

    // region Validation
    fn check_node(&self, node: NodeId) -> Result<(), RoutingError> {
        if node >= self.node_count() {
            return Err(RoutingError::UnknownNode {
                node,
                node_count: self.node_count(),
            });
        }
        Ok(())
    }

    fn validate(&self, packet: &Advertisement) -> Result<(), RoutingError> {
        self.check_node(packet.source)?;
        if packet.source == self.address {
            return Err(RoutingError::SelfAdvertisement { node: self.address });
        }
        if packet.dest != self.address {
            return Err(RoutingError::MisaddressedAdvertisement {
                node: self.address,
                dest: packet.dest,
            });
        }
        if packet.len() != self.node_count() {
            return Err(RoutingError::VectorLengthMismatch {
                sender: packet.source,
                expected: self.node_count(),
                got: packet.len(),
            });
        }
        Ok(())
    }

    fn verify_if_configured(&self) -> Result<(), RoutingError> {
        if T::config().verify_invariants {
            self.verify_invariants()
        } else {
            Ok(())
        }
    }

    fn violation(&self, invariant: &'static str, detail: String) -> RoutingError {
        RoutingError::InvariantViolated {
            node: self.address,
            invariant,
            detail,
        }
    }

    /// Checks that the table is a fixed point of the last relaxation, against the current link costs.
    ///
    /// A link change the environment has applied but not yet signalled will show up as a violation.
    pub fn verify_invariants(&self) -> Result<(), RoutingError> {
        let n = self.node_count();
        if self.table.predecessors.len() != n {
            return Err(self.violation("shape", format!("{} predecessors for {} nodes", self.table.predecessors.len(), n)));
        }
        for (peer, row) in &self.table.peers {
            if *peer >= n || *peer == self.address {
                return Err(self.violation("peer rows", format!("unexpected row for node {peer}")));
            }
            if row.len() != n {
                return Err(self.violation("shape", format!("row of {peer} has {} entries", row.len())));
            }
        }
        if self.table.own[self.address] != 0 {
            return Err(self.violation("self-distance", format!("distance to self is {}", self.table.own[self.address])));
        }
        if self.table.predecessors[self.address].is_some() {
            return Err(self.violation("predecessor", "a predecessor is set towards self".to_string()));
        }
        if !self.table.relaxed {
            return Ok(());
        }

        let link_costs: Vec<Metric> = (0..n).map(|v| self.link_cost(v)).collect();
        for dest in 0..n {
            if dest == self.address {
                continue;
            }
            let (best, _) = self.best_route(&link_costs, dest);
            let own = self.table.own[dest];
            if own != best {
                return Err(self.violation("relaxation", format!("cost to {dest} is {own}, best available is {best}")));
            }
            match self.table.predecessors[dest] {
                Some(hop) if is_finite(own) => {
                    let via = sum_inf(link_costs[hop], self.table.peer_metric(hop, dest));
                    if via != own {
                        return Err(self.violation("predecessor", format!("next hop {hop} to {dest} costs {via}, not {own}")));
                    }
                }
                None if is_finite(own) => {
                    return Err(self.violation("predecessor", format!("no next hop to reachable {dest}")));
                }
                _ => {}
            }
        }
        Ok(())
    }
    // endregion
}
