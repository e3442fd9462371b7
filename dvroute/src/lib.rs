//! An I/O free distance-vector routing node.
//!
//! Each [`router::Router`] owns its distance table and queues [`concepts::packet::Advertisement`]s
//! for the environment to deliver. Link costs are read through an injected [`framework::LinkCosts`] oracle.

pub mod concepts {
    pub mod packet;
    pub mod table;
    pub mod topology;
}
pub mod feedback;
pub mod framework;
pub mod router;
pub mod util;
