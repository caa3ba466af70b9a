//! Showcase relay HTTP server.
//!
//! Fetches a codepen.io profile's showcase feed past its anti-bot cookie
//! challenge and re-serves the extracted posts as JSON.
//!
//! # Architecture
//!
//! - **Core** (`relay-core`): challenge-aware fetching and HTML extraction
//! - **Transport**: reqwest client with a bounded timeout
//! - **Routes**: axum handlers, CORS and request logging
//!
//! # Routes
//!
//! ```text
//! GET /         -> "Nothing to see here."
//! GET /codepen  -> [ShowcaseRecord, ...] | {"status": 500, "error": "..."}
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod transport;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
