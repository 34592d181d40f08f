//! Core services: platform primitives, canonical paths, traversal, and marker placement

pub mod canonical;
pub mod marker;
pub mod platform;
pub mod recorder;
pub mod walk;
