pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;
pub mod types;

pub use server::{build_router, start_api_server};
pub use state::ApiState;
