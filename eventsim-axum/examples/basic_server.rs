//! Minimal event service bound to localhost.
//!
//! ```sh
//! cargo run --example basic_server
//! curl -X POST 'localhost:3000/events/submit?wait=false' \
//!     -H 'content-type: application/json' -d '{"type": "SHORT"}'
//! curl 'localhost:3000/events?ongoing_only=true'
//! ```

use eventsim::{observability, Settings};
use eventsim_axum::EventServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_logging();

    let settings = Settings::from_env()?;
    let server = EventServer::builder().with_settings(settings).build();
    server.serve("127.0.0.1:3000").await?;
    Ok(())
}
