//! Tests for operation resolution
