//! HTTP middleware for the storefront.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, make_span, request_id_header, sentry_request_id};
