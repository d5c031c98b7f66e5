#[cfg(feature = "fs_bucket")]
mod fs_tests;
