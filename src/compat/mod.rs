//! Client compatibility layer.
//!
//! Different execution clients expose different subsets of the JSON-RPC
//! surface, and different tracer implementations. This module detects which
//! client sits behind an endpoint and filters the candidate method/tracer
//! set down to the ones meaningful to compare on both.

pub mod detect;
pub mod matrix;

pub use detect::{detect_client_type, ClientInfo, ClientType};
pub use matrix::{
    filter_methods, filter_tracers, is_method_supported, is_tracer_supported, tracer_name,
    CompatOverrides,
};
