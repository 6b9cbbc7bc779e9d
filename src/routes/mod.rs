mod deals;
mod health_check;
mod subscriptions;

pub use deals::*;
pub use health_check::*;
pub use subscriptions::*;
