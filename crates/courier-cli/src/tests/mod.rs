//! Test suites for the courier CLI runtime.

mod support;
