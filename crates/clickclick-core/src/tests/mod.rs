//! Test suites for request dispatch.

mod support;
