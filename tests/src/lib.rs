//! # Facet Router Test Suite
//!
//! Cross-crate flows over the execution host, the selector registry and
//! the deployment factory.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs          # TestContract, linked router fixture
//! │   └── integration/
//! │       ├── erc1538_routing.rs
//! │       ├── generic_factory.rs
//! │       └── service_flows.rs
//! └── benches/
//!     └── router_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fr-tests
//! cargo test -p fr-tests integration::generic_factory
//! cargo bench -p fr-tests
//! ```

pub mod fixtures;
