//! # Keyprobe JWK
//!
//! JSON Web Key record model and X.509 certificate key import.
//!
//! ## Features
//!
//! - **KeyRecord**: immutable, validated JWK attribute map
//! - **Typed decode**: JSON text or values become a `KeyRecord` or a `JwkError`
//! - **RFC 7638 thumbprints**
//! - **Certificate import**: RSA, EC and OKP public keys from PEM or DER certificates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyprobe_jwk::{CertificateImporter, ImportOverrides, KeyRecord};
//!
//! let key = KeyRecord::from_json(r#"{"kty":"oct","k":"AAAA"}"#)?;
//! assert_eq!(key.kty(), "oct");
//!
//! let pem = std::fs::read("server.pem")?;
//! let imported = CertificateImporter::import_from_bytes(
//!     &pem,
//!     &ImportOverrides::new().with_use("sig").with_alg("RS256"),
//! )?;
//! ```

#![forbid(unsafe_code)]

pub mod encoding;
pub mod error;
pub mod record;
pub mod x509;

pub use error::{JwkError, JwkResult};
pub use record::{KeyRecord, KeyType};
pub use x509::{CertificateImporter, ImportOverrides};
