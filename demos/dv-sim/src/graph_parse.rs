use std::str::FromStr;
use anyhow::{anyhow, bail, Context};
use dvroute::framework::{Metric, NodeId, INF};

#[derive(Debug)]
pub struct Graph {
    pub node_count: usize,
    pub links: Vec<(NodeId, NodeId, Metric)>,
}

/// `inf` (any case) or a plain integer
pub fn parse_metric(value: &str) -> anyhow::Result<Metric> {
    if value.eq_ignore_ascii_case("inf") {
        return Ok(INF);
    }
    let metric = value
        .parse::<Metric>()
        .with_context(|| format!("invalid cost {value:?}"))?;
    if metric == INF {
        bail!("cost {metric} is reserved for infinity, write inf instead");
    }
    Ok(metric)
}

/// Reads one `a b cost` link per line. Blank lines and `#` comments are skipped.
pub fn parse(input: &str) -> anyhow::Result<Graph> {
    let mut links = Vec::new();
    let mut node_count = 0;

    for (line_no, line) in input.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split_whitespace().collect();
        let [a, b, cost] = values[..] else {
            bail!("line {}: expected `a b cost`, got {:?}", line_no + 1, line);
        };
        let a: NodeId = a.parse().with_context(|| format!("line {}: invalid node {a:?}", line_no + 1))?;
        let b: NodeId = b.parse().with_context(|| format!("line {}: invalid node {b:?}", line_no + 1))?;
        if a == b {
            bail!("line {}: node {a} cannot link to itself", line_no + 1);
        }
        let cost = parse_metric(cost).with_context(|| format!("line {}", line_no + 1))?;
        node_count = node_count.max(a + 1).max(b + 1);
        links.push((a, b, cost));
    }

    if node_count == 0 {
        bail!("graph has no links");
    }
    Ok(Graph { node_count, links })
}

/// A link cost change scheduled at a simulated time, written `time:a:b:cost`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkChange {
    pub at: u64,
    pub a: NodeId,
    pub b: NodeId,
    pub cost: Metric,
}

impl FromStr for LinkChange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [at, a, b, cost] = parts[..] else {
            return Err(anyhow!("expected time:a:b:cost, got {s:?}"));
        };
        Ok(LinkChange {
            at: at.parse().with_context(|| format!("invalid time {at:?}"))?,
            a: a.parse().with_context(|| format!("invalid node {a:?}"))?,
            b: b.parse().with_context(|| format!("invalid node {b:?}"))?,
            cost: parse_metric(cost)?,
        })
    }
}
