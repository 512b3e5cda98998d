//! Async client for the TVmaze API.
//!
//! # Overview
//! `TvMaze` exposes every TVmaze endpoint as an `async fn` resolving to the
//! response JSON or an `ApiError`. Request building and response parsing
//! come from `tvmaze-core`; this crate adds the I/O.
//!
//! # Design
//! - `Transport` is the only I/O seam. `ReqwestTransport` is the default;
//!   tests and embedders can supply their own.
//! - `TvMaze` holds no mutable state, so one instance can serve any number
//!   of concurrent calls. Dropping a returned future cancels the call.
//!
//! ```no_run
//! # async fn run() -> Result<(), tvmaze::ApiError> {
//! let tvmaze = tvmaze::TvMaze::new();
//! let results = tvmaze.show_search("breaking bad").await?;
//! println!("{results}");
//! # Ok(())
//! # }
//! ```

pub mod service;
pub mod transport;

pub use service::TvMaze;
pub use transport::{ReqwestTransport, Transport};
pub use tvmaze_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, LookupSource, TransportError, TvMazeClient,
    DEFAULT_BASE_URL, NETWORK_ERROR,
};
