pub mod balancer;
pub mod builder;
pub mod lease;
pub mod node;
pub mod strategies;
pub mod types;

pub use balancer::Balancer;
pub use builder::BalancerBuilder;
pub use lease::NodeLease;
pub use node::{Node, NodeId, NodeOptions, NodeState};
pub use types::{DispatchRequest, DispatchResult, NodeInfo};
