//! tests/mod.rs

mod personalize_tests;
mod template_tests;
