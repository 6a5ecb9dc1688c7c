// Domain layer: API models and the test-case port.

pub mod model;
pub mod ports;
