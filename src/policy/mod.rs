//! Message routing policy: crisis detection and response categorization.

pub mod router;
pub mod table;

pub use router::{RoutingDecision, RoutingPolicy};
pub use table::{FallbackRule, PolicyTable, ResponseCategory, ResponseRule};
