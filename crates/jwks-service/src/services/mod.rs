pub mod jwks_service;
pub mod key_registry;
pub mod token_service;
