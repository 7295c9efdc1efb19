//! Geodesic solver tests

mod calculator_tests;
