//! Tests for the catalog adapter against a mock HTTP server
