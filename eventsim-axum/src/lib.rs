pub mod error;
pub mod routes;
pub mod server;

pub use error::{Error, Result};
pub use routes::ServerState;
pub use server::{EventServer, EventServerBuilder};
