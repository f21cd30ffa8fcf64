//! Test doubles and fixtures shared by unit and integration tests.

mod fixtures;
mod mocks;

pub use fixtures::{entry, item};
pub use mocks::{MockBestsellerSource, MockLibraryStore};
