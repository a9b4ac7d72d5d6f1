//! Common test utilities for netpalm-client integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod live;
#[allow(dead_code)]
pub mod server;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use live::*;
#[allow(unused_imports)]
pub use server::*;
