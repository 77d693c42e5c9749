//! Domain layer for the Artifacts domain

pub mod capability;
pub mod entities;
pub mod paths;
pub mod state;
