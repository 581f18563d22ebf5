//! Common test utilities for generator scenario tests

pub mod fixtures;

pub use fixtures::TestFixtures;
