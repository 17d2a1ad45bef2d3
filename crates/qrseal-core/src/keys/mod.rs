//! Key pair lifecycle.
//!
//! - **pair**: the matched RSA pair and its PEM/export forms
//! - **store**: `KeyStore` persistence trait with file and memory backends
//! - **manager**: `KeyManager`, the sole owner of the key pair slot

pub mod manager;
pub mod pair;
pub mod store;

pub use manager::{ClearOutcome, Confirmation, InitOutcome, KeyManager, KeyOrigin};
pub use pair::{parse_private_pem, parse_public_pem, KeyPair, KEY_BITS};
pub use store::{FileKeyStore, KeyStore, MemoryKeyStore, PRIVATE_SLOT, PUBLIC_SLOT};
