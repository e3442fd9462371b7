use std::collections::{BTreeMap, VecDeque};
use rand::Rng;
use serde::{Deserialize, Serialize};
use dvroute::concepts::packet::Advertisement;
use dvroute::concepts::table::DistanceTable;
use dvroute::concepts::topology::{CostMatrix, SharedTopology};
use dvroute::framework::{Metric, NodeId, ProtocolParams, RoutingSystem};
use dvroute::router::Router;

/// A lockstep network: every router, the shared link costs, and a FIFO queue per directed link.
pub struct VirtualSystem {
    pub topology: SharedTopology,
    pub routers: Vec<Router<VirtualSystem>>,
    pub packets: BTreeMap<(NodeId, NodeId), VecDeque<Advertisement>>,
    pub delivered: usize,
}

#[derive(Serialize, Deserialize)]
struct Frozen {
    topology: CostMatrix,
    tables: Vec<DistanceTable>,
    packets: Vec<Advertisement>,
}

impl VirtualSystem {
    pub fn create(node_count: usize, links: &[(NodeId, NodeId, Metric)]) -> VirtualSystem {
        let topology = CostMatrix::from_links(node_count, links).unwrap().into_shared();
        let routers = (0..node_count)
            .map(|id| Router::new(id, node_count, topology.clone()).unwrap())
            .collect();
        let mut network = VirtualSystem {
            topology,
            routers,
            packets: Default::default(),
            delivered: 0,
        };
        network.flush_packets();
        network
    }

    /// changes the link in the environment, then tells both endpoints
    pub fn update_edge(&mut self, a: NodeId, b: NodeId, metric: Metric) {
        self.topology.borrow_mut().set_link(a, b, metric).unwrap();
        self.routers[a].handle_link_cost_change(b, metric).unwrap();
        self.routers[b].handle_link_cost_change(a, metric).unwrap();
        self.flush_packets();
    }

    pub fn get_node(&mut self, node: NodeId) -> &mut Router<Self> {
        &mut self.routers[node]
    }

    pub fn get_next_hop(&self, cur: NodeId, dest: NodeId) -> Option<NodeId> {
        self.routers[cur].predecessor(dest).unwrap()
    }

    pub fn get_metric_to(&self, cur: NodeId, dest: NodeId) -> Metric {
        self.routers[cur].distance_vector()[dest]
    }

    pub fn vector(&self, cur: NodeId) -> Vec<Metric> {
        self.routers[cur].distance_vector().to_vec()
    }

    pub fn pending(&self) -> usize {
        self.packets.values().map(|q| q.len()).sum()
    }

    pub fn flush_packets(&mut self) {
        for router in &mut self.routers {
            for packet in router.take_outbound() {
                self.packets
                    .entry((packet.source, packet.dest))
                    .or_default()
                    .push_back(packet);
            }
        }
    }

    pub fn deliver(&mut self, packet: &Advertisement) {
        self.routers[packet.dest].handle_advertisement(packet).unwrap();
        self.delivered += 1;
    }

    /// delivers everything that was queued at the start of the tick, returns how many packets that was
    pub fn tick(&mut self) -> usize {
        let queued = std::mem::take(&mut self.packets);
        let mut count = 0;
        for (_link, packets) in queued {
            for packet in packets {
                self.deliver(&packet);
                count += 1;
            }
        }
        self.flush_packets();
        count
    }

    pub fn tick_n(&mut self, times: usize) {
        for _ in 0..times {
            self.tick();
        }
    }

    /// ticks until no packets are in flight, None if that takes more than `max_ticks`
    pub fn run_until_quiet(&mut self, max_ticks: usize) -> Option<usize> {
        for ticks in 0..=max_ticks {
            if self.pending() == 0 {
                return Some(ticks);
            }
            self.tick();
        }
        None
    }

    /// Delivers a single packet from a randomly chosen link. Links never reorder their own packets.
    pub fn step_random(&mut self, rng: &mut impl Rng) -> bool {
        let busy: Vec<(NodeId, NodeId)> = self
            .packets
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(link, _)| *link)
            .collect();
        if busy.is_empty() {
            return false;
        }
        let link = busy[rng.gen_range(0..busy.len())];
        let packet = self.packets.get_mut(&link).and_then(|q| q.pop_front()).unwrap();
        self.deliver(&packet);
        self.flush_packets();
        true
    }

    /// runs random single deliveries until quiet, returns the number of deliveries or None past `max_steps`
    pub fn run_random(&mut self, rng: &mut impl Rng, max_steps: usize) -> Option<usize> {
        for steps in 0..=max_steps {
            if !self.step_random(rng) {
                return Some(steps);
            }
        }
        None
    }

    pub fn freeze(&self) -> String {
        let frozen = Frozen {
            topology: self.topology.borrow().clone(),
            tables: self.routers.iter().map(|r| r.table.clone()).collect(),
            packets: self.packets.values().flatten().cloned().collect(),
        };
        serde_json::to_string(&frozen).unwrap()
    }

    pub fn restore(state: &str) -> VirtualSystem {
        let frozen: Frozen = serde_json::from_str(state).unwrap();
        let topology = frozen.topology.into_shared();
        let routers = frozen
            .tables
            .into_iter()
            .enumerate()
            .map(|(id, table)| Router::restore(id, table, topology.clone()).unwrap())
            .collect();
        let mut packets: BTreeMap<(NodeId, NodeId), VecDeque<Advertisement>> = BTreeMap::new();
        for packet in frozen.packets {
            packets.entry((packet.source, packet.dest)).or_default().push_back(packet);
        }
        VirtualSystem {
            topology,
            routers,
            packets,
            delivered: 0,
        }
    }
}

impl RoutingSystem for VirtualSystem {
    type LinkCosts = SharedTopology;
    fn config() -> ProtocolParams {
        ProtocolParams {
            verify_invariants: true,
        }
    }
}
