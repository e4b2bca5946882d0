//! Object identifiers for SubjectPublicKeyInfo algorithms and named curves

use der::asn1::ObjectIdentifier;

/// rsaEncryption (RFC 8017)
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey (RFC 5480)
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// id-X25519 (RFC 8410)
pub const X25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.110");
/// id-X448 (RFC 8410)
pub const X448: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.111");
/// id-Ed25519 (RFC 8410)
pub const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
/// id-Ed448 (RFC 8410)
pub const ED448: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.113");

/// secp256r1, JWK curve `P-256`
pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// secp384r1, JWK curve `P-384`
pub const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
/// secp521r1, JWK curve `P-521`
pub const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
/// secp256k1, JWK curve `secp256k1` (RFC 8812)
pub const SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// id-ce-keyUsage (RFC 5280)
pub const KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");

/// Key family selected by the SubjectPublicKeyInfo algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    /// RSA public key, PKCS#1 encoded
    Rsa,
    /// Elliptic curve point on a named curve
    Ec,
    /// Octet key pair; carries the JWK `crv` name and raw key length
    Okp {
        /// JWK curve name
        crv: &'static str,
        /// Public key length in bytes
        len: usize,
    },
}

/// Named curve details: JWK `crv` and the byte length of one coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedCurve {
    /// JWK curve name
    pub crv: &'static str,
    /// Field element size in bytes
    pub coordinate_len: usize,
}

const ALGORITHMS: &[(ObjectIdentifier, KeyFamily)] = &[
    (RSA_ENCRYPTION, KeyFamily::Rsa),
    (EC_PUBLIC_KEY, KeyFamily::Ec),
    (ED25519, KeyFamily::Okp { crv: "Ed25519", len: 32 }),
    (ED448, KeyFamily::Okp { crv: "Ed448", len: 57 }),
    (X25519, KeyFamily::Okp { crv: "X25519", len: 32 }),
    (X448, KeyFamily::Okp { crv: "X448", len: 56 }),
];

const CURVES: &[(ObjectIdentifier, NamedCurve)] = &[
    (SECP256R1, NamedCurve { crv: "P-256", coordinate_len: 32 }),
    (SECP384R1, NamedCurve { crv: "P-384", coordinate_len: 48 }),
    (SECP521R1, NamedCurve { crv: "P-521", coordinate_len: 66 }),
    (SECP256K1, NamedCurve { crv: "secp256k1", coordinate_len: 32 }),
];

/// Map an algorithm OID onto a key family
#[must_use]
pub fn key_family(algorithm: &ObjectIdentifier) -> Option<KeyFamily> {
    ALGORITHMS
        .iter()
        .find(|(oid, _)| oid == algorithm)
        .map(|&(_, family)| family)
}

/// Map a namedCurve OID onto its JWK curve
#[must_use]
pub fn named_curve(curve: &ObjectIdentifier) -> Option<NamedCurve> {
    CURVES
        .iter()
        .find(|(oid, _)| oid == curve)
        .map(|&(_, named)| named)
}
