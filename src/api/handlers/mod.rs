pub mod health;
pub mod home;
pub mod metrics;
pub mod pool;

pub use health::*;
pub use home::*;
pub use metrics::*;
pub use pool::*;
