//! Dashboard infrastructure module

mod service;
mod source;

pub use service::DashboardService;
#[cfg(test)]
pub use source::MockDashboardSource;
pub use source::{DashboardSource, ServiceDashboardSource};
