//! Repository and cache graph tests.

mod graph_tests;
mod repository_tests;
