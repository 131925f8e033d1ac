//! Core library for the zoning scenario service: planar geometry
//! primitives, footprint placement, compliance evaluation, and the HTTP
//! surface that exposes them.

pub mod config;
pub mod error;
pub mod geometry;
pub mod scenario;
pub mod telemetry;
