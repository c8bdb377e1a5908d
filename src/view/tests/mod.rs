//! Unit tests for the presentation hook layer.
