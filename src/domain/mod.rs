// Domain layer: value model and the fixture port. No harness logic lives here.

pub mod model;
pub mod ports;
