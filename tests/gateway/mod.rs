//! Gateway event tests.

mod dispatch_tests;
mod handler_tests;
