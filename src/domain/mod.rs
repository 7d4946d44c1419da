// Domain layer: entities, the universe arena, report types and ports.
// Only std/serde/chrono here; adapters live under config/ and core/.

pub mod ideology;
pub mod model;
pub mod ports;
pub mod region;
pub mod report;
