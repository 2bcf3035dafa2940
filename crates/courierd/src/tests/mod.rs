//! Test suites for the courier daemon.

mod support;
