//! Tests for authority resolution

mod registry_tests;
mod lookup_tests;
