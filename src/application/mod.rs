//! Application layer containing the lending policy orchestration.
//!
//! This module defines the `LendingEngine`, the single entry point for every
//! catalog, circulation, and fee operation. The engine is stateless: all
//! shared state lives behind the injected store port.

pub mod engine;
