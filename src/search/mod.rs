//! Branch-and-bound search model
//!
//! A node holds a partition of the vertices into forced-same classes, a set
//! of forced-different class pairs and the bound pair computed for that
//! state. Branching clones before mutating, so siblings never share state.

pub mod bounds;
pub mod branch;
pub mod constraints;
pub mod node;
pub mod partition;

pub use bounds::{BoundOracle, Bounds};
pub use branch::Brancher;
pub use constraints::ConstraintSet;
pub use node::SearchNode;
pub use partition::Partition;
