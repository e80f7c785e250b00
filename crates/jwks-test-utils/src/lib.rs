//! # JWKS Test Utilities
//!
//! Shared test utilities for the JWKS fixture server.
//!
//! This crate provides:
//! - Cached RSA key fixtures (2048-bit keys are generated once per process)
//! - Fixture registries with one valid and one expired key
//! - Server test harness (TestJwksServer for end-to-end tests)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwks_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestJwksServer::spawn().await?;
//!     let token = server.issue_token(false).await?;
//!
//!     token
//!         .assert_valid_jwt()
//!         .assert_for_subject("fakeuser")
//!         .assert_lifetime(3600);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
