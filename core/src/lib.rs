//! Screen core for the public-API showcase app.
//!
//! # Overview
//! Six independent screens (gender, age, universities, weather, creature
//! lookup, blog feed) each wrap one public REST API with the same
//! "fetch, map, display, recover" pattern. This crate implements that pattern
//! once as a generic controller and supplies one `Source` per provider.
//!
//! # Design
//! - Host-does-IO: controllers hand out `Ticket`s holding plain-data
//!   `HttpRequest`s; the host executes them and calls `settle` with the
//!   response or a `TransportError`. The core stays deterministic.
//! - Each `submit` mints a monotonic `RequestToken`; only the latest token
//!   may settle, so stale responses are dropped.
//! - Raw failure detail is logged through `tracing`; screens only ever show
//!   the fixed messages from `ApiError::user_message`.
//! - Types use owned `String` / `Vec` fields to keep FFI mapping simple.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod playback;
pub mod source;
pub mod sources;

pub use app::App;
pub use config::{Config, Endpoints};
pub use controller::{Phase, QueryController, QueryState, RequestToken, ScreenController, Settlement, Ticket};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome, TransportError};
pub use playback::{AudioBackend, CryPlayer, PlaybackError};
pub use source::{InputPolicy, Screen, Source};
