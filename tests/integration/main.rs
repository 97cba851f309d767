//! HTTP-level tests, run against the in-memory store

mod catalog_tests;
