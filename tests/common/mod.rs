//! Integration test common infrastructure.
//!
//! Provides a replica driven through its log interface, plus clients that
//! read their share of the output stream the way a delivery front-end
//! would.

pub mod client;
pub mod network;

#[allow(unused_imports)]
pub use client::{TestClient, find, has};
#[allow(unused_imports)]
pub use network::{TestNetwork, test_config};
