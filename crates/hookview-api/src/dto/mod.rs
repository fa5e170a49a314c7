//! Request and response shapes.

pub mod response;
