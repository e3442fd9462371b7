use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use anyhow::bail;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use dvroute::concepts::packet::Advertisement;
use dvroute::concepts::table::DistanceTable;
use dvroute::concepts::topology::{CostMatrix, SharedTopology};
use dvroute::framework::{Metric, NodeId, RoutingSystem};
use dvroute::router::Router;
use crate::graph_parse::{Graph, LinkChange};

pub struct SimSystem {}
impl RoutingSystem for SimSystem {
    type LinkCosts = SharedTopology;
}

enum Event {
    Deliver(Advertisement),
    LinkChange(LinkChange),
}

struct Scheduled {
    time: u64,
    seq: u64,
    event: Event,
}

// BinaryHeap is a max-heap, earliest (time, seq) must come out first
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.time, other.seq).cmp(&(self.time, self.seq))
    }
}
impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        (self.time, self.seq) == (other.time, other.seq)
    }
}
impl Eq for Scheduled {}

pub enum Outcome {
    /// nothing left to deliver
    Quiescent { events: usize, time: u64 },
    /// stopped at the event limit, most likely counting to infinity
    Truncated { events: usize, time: u64 },
}

#[derive(Serialize)]
pub struct NodeReport {
    pub address: NodeId,
    pub vector: Vec<Metric>,
    pub predecessors: Vec<Option<NodeId>>,
    pub table: DistanceTable,
}

pub struct Simulation {
    pub topology: SharedTopology,
    pub routers: Vec<Router<SimSystem>>,
    queue: BinaryHeap<Scheduled>,
    rng: StdRng,
    max_delay: u64,
    now: u64,
    seq: u64,
    /// latest arrival time per directed link, later packets never overtake it
    last_arrival: HashMap<(NodeId, NodeId), u64>,
    pub delivered: usize,
}

impl Simulation {
    pub fn new(graph: &Graph, seed: u64, max_delay: u64) -> anyhow::Result<Self> {
        if max_delay == 0 {
            bail!("max delay must be at least 1");
        }
        let topology = CostMatrix::from_links(graph.node_count, &graph.links)?.into_shared();
        let routers = (0..graph.node_count)
            .map(|id| Router::new(id, graph.node_count, topology.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut sim = Simulation {
            topology,
            routers,
            queue: BinaryHeap::new(),
            rng: StdRng::seed_from_u64(seed),
            max_delay,
            now: 0,
            seq: 0,
            last_arrival: HashMap::new(),
            delivered: 0,
        };
        sim.collect_outbound();
        Ok(sim)
    }

    fn push(&mut self, time: u64, event: Event) {
        self.seq += 1;
        self.queue.push(Scheduled {
            time,
            seq: self.seq,
            event,
        });
    }

    pub fn schedule_change(&mut self, change: LinkChange) -> anyhow::Result<()> {
        let n = self.routers.len();
        if change.a >= n || change.b >= n || change.a == change.b {
            bail!("cannot change link {} - {} in a network of {} nodes", change.a, change.b, n);
        }
        self.push(change.at, Event::LinkChange(change));
        Ok(())
    }

    /// moves every queued advertisement onto the event queue with a random delay
    fn collect_outbound(&mut self) {
        let mut packets = Vec::new();
        for router in &mut self.routers {
            packets.extend(router.take_outbound());
        }
        for packet in packets {
            let delay = self.rng.gen_range(1..=self.max_delay);
            let link = (packet.source, packet.dest);
            let arrival = (self.now + delay).max(self.last_arrival.get(&link).copied().unwrap_or(0));
            self.last_arrival.insert(link, arrival);
            self.push(arrival, Event::Deliver(packet));
        }
    }

    fn handle(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Deliver(packet) => {
                debug!("[{}] delivering {} -> {}", self.now, packet.source, packet.dest);
                self.routers[packet.dest].handle_advertisement(&packet)?;
                self.delivered += 1;
            }
            Event::LinkChange(LinkChange { a, b, cost, .. }) => {
                info!("[{}] link {a} - {b} now costs {}", self.now, dvroute::util::format_metric(cost));
                self.topology.borrow_mut().set_link(a, b, cost)?;
                self.routers[a].handle_link_cost_change(b, cost)?;
                self.routers[b].handle_link_cost_change(a, cost)?;
            }
        }
        Ok(())
    }

    pub fn run(&mut self, max_events: usize) -> anyhow::Result<Outcome> {
        let mut events = 0;
        while let Some(next) = self.queue.pop() {
            if events >= max_events {
                self.queue.push(next);
                return Ok(Outcome::Truncated { events, time: self.now });
            }
            self.now = next.time;
            self.handle(next.event)?;
            self.collect_outbound();
            events += 1;
        }
        Ok(Outcome::Quiescent { events, time: self.now })
    }

    pub fn report(&self) -> Vec<NodeReport> {
        self.routers
            .iter()
            .map(|router| NodeReport {
                address: router.address,
                vector: router.distance_vector().to_vec(),
                predecessors: router.table.predecessors.clone(),
                table: router.table.clone(),
            })
            .collect()
    }
}
