// Domain layer: statement rows, records, outcomes and the ports the pipeline talks through.

pub mod model;
pub mod ports;
