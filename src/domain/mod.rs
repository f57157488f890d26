// Domain layer: request-scoped models and the ports the pipelines call through.

pub mod model;
pub mod ports;
