//! Test Module
//!
//! Scenario tests for the StudyBuddy backend.
//!
//! ## Test Categories
//! - `brain_tests`: intent order, reply tables, study plans, calculations
//! - `chat_tests`: transcript ordering, reset, empty input, concurrency, rate limits
//! - `routes_tests`: HTTP API round trips

pub mod brain_tests;
