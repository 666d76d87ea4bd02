// Domain layer: module description, lifecycle state and the supervision port.

pub mod model;
pub mod ports;
