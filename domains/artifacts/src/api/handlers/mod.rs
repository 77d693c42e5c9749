//! HTTP handlers for the Artifacts domain

pub mod capabilities;
pub mod narratives;
