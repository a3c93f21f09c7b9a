// Domain layer: table model, column roles and ports. No IO here.

pub mod model;
pub mod ports;
pub mod schema;
