use crate::framework::{Metric, INF};

/// Adds two metrics, where INF absorbs everything.
///
/// A sum that does not fit below INF is INF as well, so an over-long path reads as unreachable.
///
/// # Examples
///
/// ```
/// use dvroute::framework::INF;
/// use dvroute::util::sum_inf;
///
/// assert_eq!(sum_inf(3, 4), 7);
/// assert_eq!(sum_inf(INF, 0), INF);
/// assert_eq!(sum_inf(INF - 1, 5), INF);
/// ```
pub fn sum_inf(cost_a: Metric, cost_b: Metric) -> Metric {
    let sum = cost_a as u32 + cost_b as u32;
    if sum >= INF as u32 {
        INF
    } else {
        sum as Metric
    }
}

pub fn is_finite(metric: Metric) -> bool {
    metric != INF
}

/// `inf` for [`INF`], the decimal value otherwise
pub fn format_metric(metric: Metric) -> String {
    if metric == INF {
        "inf".to_string()
    } else {
        metric.to_string()
    }
}
