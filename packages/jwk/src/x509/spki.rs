//! SubjectPublicKeyInfo decomposition into JWK parameters

use der::asn1::ObjectIdentifier;
use der::{Decode, Encode};
use log::debug;
use rsa::pkcs1::RsaPublicKey;
use serde_json::{Map, Value};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use super::oid::{self, KeyFamily, NamedCurve};
use crate::encoding::encode_url;
use crate::error::{JwkError, JwkResult};

/// Turn a SubjectPublicKeyInfo into JWK attributes, starting with `kty`
pub(crate) fn decompose(spki: &SubjectPublicKeyInfoOwned) -> JwkResult<Map<String, Value>> {
    let algorithm = &spki.algorithm.oid;
    let family = oid::key_family(algorithm).ok_or_else(|| {
        JwkError::unsupported(format!("public key algorithm {algorithm} is not supported"))
    })?;
    debug!("SubjectPublicKeyInfo algorithm {algorithm} maps to {family:?}");

    let key_bytes = spki.subject_public_key.as_bytes().ok_or_else(|| {
        JwkError::certificate_parse("subjectPublicKey bit string has unused bits")
    })?;

    match family {
        KeyFamily::Rsa => rsa_params(key_bytes),
        KeyFamily::Ec => {
            let curve = curve_parameter(spki)?;
            ec_params(curve, key_bytes)
        }
        KeyFamily::Okp { crv, len } => okp_params(crv, len, key_bytes),
    }
}

fn rsa_params(key_bytes: &[u8]) -> JwkResult<Map<String, Value>> {
    let public_key = RsaPublicKey::from_der(key_bytes)
        .map_err(|e| JwkError::certificate_parse(format!("invalid RSA public key: {e}")))?;

    let modulus = public_key.modulus.as_bytes();
    let exponent = public_key.public_exponent.as_bytes();
    if modulus.is_empty() || exponent.is_empty() {
        return Err(JwkError::certificate_parse("RSA public key has a zero component"));
    }

    let mut params = Map::new();
    params.insert("kty".into(), "RSA".into());
    params.insert("n".into(), encode_url(modulus).into());
    params.insert("e".into(), encode_url(exponent).into());
    Ok(params)
}

fn curve_parameter(spki: &SubjectPublicKeyInfoOwned) -> JwkResult<NamedCurve> {
    let parameters = spki.algorithm.parameters.as_ref().ok_or_else(|| {
        JwkError::certificate_parse("EC public key has no curve parameters")
    })?;

    // Explicit curve parameters decode as a SEQUENCE, not an OID.
    let curve = parameters
        .to_der()
        .and_then(|der| ObjectIdentifier::from_der(&der))
        .map_err(|_| JwkError::unsupported("EC public key does not use a named curve"))?;

    oid::named_curve(&curve)
        .ok_or_else(|| JwkError::unsupported(format!("named curve {curve} is not supported")))
}

/// Split a SEC1 point into `x` and `y`; only the uncompressed form is accepted
pub(crate) fn ec_params(curve: NamedCurve, point: &[u8]) -> JwkResult<Map<String, Value>> {
    let size = curve.coordinate_len;
    match point.first() {
        Some(0x04) => {}
        Some(0x02 | 0x03) => {
            return Err(JwkError::unsupported("compressed EC points are not supported"));
        }
        Some(0x06 | 0x07) => {
            return Err(JwkError::unsupported("hybrid EC points are not supported"));
        }
        Some(tag) => {
            return Err(JwkError::certificate_parse(format!(
                "unknown EC point encoding 0x{tag:02x}"
            )));
        }
        None => return Err(JwkError::certificate_parse("empty EC point")),
    }

    if point.len() != 1 + 2 * size {
        return Err(JwkError::certificate_parse(format!(
            "{} point must be {} bytes, got {}",
            curve.crv,
            1 + 2 * size,
            point.len()
        )));
    }

    let (x, y) = point[1..].split_at(size);
    let mut params = Map::new();
    params.insert("kty".into(), "EC".into());
    params.insert("crv".into(), curve.crv.into());
    params.insert("x".into(), encode_url(x).into());
    params.insert("y".into(), encode_url(y).into());
    Ok(params)
}

fn okp_params(crv: &'static str, len: usize, key_bytes: &[u8]) -> JwkResult<Map<String, Value>> {
    if key_bytes.len() != len {
        return Err(JwkError::certificate_parse(format!(
            "{crv} public key must be {len} bytes, got {}",
            key_bytes.len()
        )));
    }

    let mut params = Map::new();
    params.insert("kty".into(), "OKP".into());
    params.insert("crv".into(), crv.into());
    params.insert("x".into(), encode_url(key_bytes).into());
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const P256: NamedCurve = NamedCurve {
        crv: "P-256",
        coordinate_len: 32,
    };

    #[test]
    fn test_uncompressed_point_splits_coordinates() {
        let mut point = vec![0x04];
        point.extend_from_slice(&[0x11; 32]);
        point.extend_from_slice(&[0x22; 32]);

        let params = ec_params(P256, &point).unwrap();
        assert_eq!(params["crv"], "P-256");
        assert_eq!(params["x"], encode_url(&[0x11; 32]));
        assert_eq!(params["y"], encode_url(&[0x22; 32]));
    }

    #[test]
    fn test_compressed_point_is_unsupported() {
        let point = hex!(
            "03 5f5b3b1f7e6c2b49b8a4d5c3c1e0f9a8b7c6d5e4f30211009f8e7d6c5b4a3921"
        );
        assert!(matches!(
            ec_params(P256, &point),
            Err(JwkError::UnsupportedKeyType(_))
        ));
    }

    #[test]
    fn test_truncated_point_is_a_parse_error() {
        let point = hex!("04 0102030405");
        assert!(matches!(
            ec_params(P256, &point),
            Err(JwkError::CertificateParse(_))
        ));
        assert!(matches!(
            ec_params(P256, &[]),
            Err(JwkError::CertificateParse(_))
        ));
    }

    #[test]
    fn test_okp_length_is_checked() {
        assert!(okp_params("Ed25519", 32, &[7; 32]).is_ok());
        assert!(matches!(
            okp_params("Ed25519", 32, &[7; 31]),
            Err(JwkError::CertificateParse(_))
        ));
    }

    #[test]
    fn test_rsa_params_strip_sign_byte() {
        // SEQUENCE { INTEGER 0x00c3ab, INTEGER 65537 }
        let key = hex!("300a 0203 00c3ab 0203 010001");
        let params = rsa_params(&key).unwrap();
        assert_eq!(params["n"], encode_url(&[0xc3, 0xab]));
        assert_eq!(params["e"], "AQAB");
    }

    mod properties {
        use super::*;
        use crate::encoding::decode_url;
        use proptest::prelude::*;

        const P384: NamedCurve = NamedCurve {
            crv: "P-384",
            coordinate_len: 48,
        };

        proptest! {
            #[test]
            fn test_coordinates_rejoin_to_point(
                curve in prop::sample::select(vec![P256, P384]),
                seed in proptest::collection::vec(any::<u8>(), 96),
            ) {
                let size = curve.coordinate_len;
                let mut point = vec![0x04];
                point.extend_from_slice(&seed[..2 * size]);

                let params = ec_params(curve, &point).unwrap();
                let x = decode_url("x", params["x"].as_str().unwrap()).unwrap();
                let y = decode_url("y", params["y"].as_str().unwrap()).unwrap();
                prop_assert_eq!(x.len(), size);
                prop_assert_eq!(y.len(), size);

                let mut rejoined = vec![0x04];
                rejoined.extend_from_slice(&x);
                rejoined.extend_from_slice(&y);
                prop_assert_eq!(rejoined, point);
            }

            #[test]
            fn test_wrong_point_length_is_rejected(extra in 1usize..16, shorter in any::<bool>()) {
                let len = if shorter { 65 - extra } else { 65 + extra };
                let point = vec![0x04; len];
                prop_assert!(matches!(
                    ec_params(P256, &point),
                    Err(JwkError::CertificateParse(_))
                ));
            }
        }
    }
}
