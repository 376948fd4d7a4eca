pub mod author;
pub mod graph;
pub mod registry;

pub use author::AuthorRecord;
pub use graph::{InfluenceEdge, InfluenceGraph};
pub use registry::Registry;
