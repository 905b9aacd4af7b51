//! Request correlation for logs.

mod request_id;

pub use request_id::{RequestId, request_id};
