pub mod gate;
pub mod routes;

pub use gate::{check_access, GateDecision, RoleGate};
pub use routes::Route;
