//! Unit tests for the converge CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod mocks;
mod orchestrator_service;
