//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. Request ID (assign `x-request-id`)
//! 3. `TraceLayer` (request span carrying the request ID)
//! 4. Session layer (tower-sessions, in-memory store)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, RequestId, make_request_span, request_id_middleware};
pub use session::create_session_layer;
