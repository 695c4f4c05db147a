pub mod domain;
pub mod gate;
pub mod ports;

pub use domain::{AuthState, Credentials, GateDecision, NewPost, Post, SystemMetrics, ValidationError};
pub use gate::{AuthError, SessionGate};
pub use ports::{
    GreetingSource, MetricsSource, PortError, PortResult, PostStore, SessionStore, TimeSource,
};
