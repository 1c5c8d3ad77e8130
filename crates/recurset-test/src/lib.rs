//! Recurset - integration test support.
//!
//! Re-exports the workspace crates so integration tests can reach every
//! layer through `recurset_test::` paths.

pub mod component {
    pub use recurset_core::config;
    pub use recurset_core::error as core_error;
    pub use recurset_rfc::error;
    pub use recurset_rfc::rfc::ical::build;
    pub use recurset_rfc::rfc::ical::expand;
    pub use recurset_rfc::rfc::ical::recur;
}

pub mod app {
    pub use recurset_app::job;
}
