// Domain layer: data model and ports. Concrete collaborators live in adapters/ and config/.

pub mod model;
pub mod ports;
