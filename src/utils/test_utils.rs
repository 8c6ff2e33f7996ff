//! Test utilities for item construction tests.
