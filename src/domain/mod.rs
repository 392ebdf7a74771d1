// Domain layer: outcome models and the capability ports the mirror is written against.

pub mod model;
pub mod ports;
