// Domain layer: core models and ports (interfaces). No network or storage code here.

pub mod model;
pub mod ports;
