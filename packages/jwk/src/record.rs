//! Immutable JSON Web Key record

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::encoding;
use crate::error::{JwkError, JwkResult};

/// Key family named by the `kty` parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// `RSA`
    Rsa,
    /// `EC`
    Ec,
    /// `oct`, a symmetric secret
    Oct,
    /// `OKP`, octet key pairs such as Ed25519 or X25519
    Okp,
    /// Any other registered or private `kty` value
    Other(String),
}

impl KeyType {
    /// Map a `kty` value onto a key family
    #[must_use]
    pub fn parse(kty: &str) -> Self {
        match kty {
            "RSA" => KeyType::Rsa,
            "EC" => KeyType::Ec,
            "oct" => KeyType::Oct,
            "OKP" => KeyType::Okp,
            other => KeyType::Other(other.to_string()),
        }
    }

    /// The `kty` value for this family
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            KeyType::Rsa => "RSA",
            KeyType::Ec => "EC",
            KeyType::Oct => "oct",
            KeyType::Okp => "OKP",
            KeyType::Other(kty) => kty,
        }
    }

    /// Members hashed by the RFC 7638 thumbprint, `kty` excluded
    fn thumbprint_members(&self) -> Option<&'static [&'static str]> {
        match self {
            KeyType::Rsa => Some(&["e", "n"]),
            KeyType::Ec => Some(&["crv", "x", "y"]),
            KeyType::Oct => Some(&["k"]),
            KeyType::Okp => Some(&["crv", "x"]),
            KeyType::Other(_) => None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public attributes of a cryptographic key, in JWK form.
///
/// A record always carries a string `kty`. It has no setters: a changed key
/// is a new record built from a new attribute map. Equality compares the
/// attribute maps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct KeyRecord {
    params: Map<String, Value>,
}

impl KeyRecord {
    /// Build a record from a decoded JSON value.
    ///
    /// # Errors
    /// Returns [`JwkError::MalformedKey`] when the value is not an object or
    /// `kty` is missing, empty or not a string.
    pub fn new(value: Value) -> JwkResult<Self> {
        match value {
            Value::Object(params) => Self::from_map(params),
            other => Err(JwkError::malformed(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build a record from an attribute map.
    ///
    /// # Errors
    /// Returns [`JwkError::MalformedKey`] when `kty` is missing, empty or not a string.
    pub fn from_map(params: Map<String, Value>) -> JwkResult<Self> {
        match params.get("kty") {
            Some(Value::String(kty)) if !kty.is_empty() => Ok(Self { params }),
            Some(Value::String(_)) => Err(JwkError::malformed("parameter \"kty\" is empty")),
            Some(other) => Err(JwkError::malformed(format!(
                "parameter \"kty\" must be a string, found {}",
                json_kind(other)
            ))),
            None => Err(JwkError::malformed("missing required parameter \"kty\"")),
        }
    }

    /// Decode a record from JSON text.
    ///
    /// # Errors
    /// Returns [`JwkError::MalformedKey`] for invalid JSON or an invalid key mapping.
    pub fn from_json(json: &str) -> JwkResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| JwkError::malformed(format!("invalid JSON: {e}")))?;
        Self::new(value)
    }

    /// Attribute value, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Attribute value, or `default` when absent
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.params.get(name).unwrap_or(default)
    }

    /// Attribute value when it is a JSON string
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Whether the attribute is present
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Raw `kty` value
    #[must_use]
    pub fn kty(&self) -> &str {
        // Construction guarantees a string kty.
        self.get_str("kty").unwrap_or_default()
    }

    /// Key family
    #[must_use]
    pub fn key_type(&self) -> KeyType {
        KeyType::parse(self.kty())
    }

    /// The read-only attribute map, in insertion order
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Decode a base64url binary parameter such as `n` or `k`.
    ///
    /// Returns `Ok(None)` when the parameter is absent.
    ///
    /// # Errors
    /// Returns [`JwkError::MalformedKey`] when the value is not a string or not base64url.
    pub fn decode_param(&self, name: &str) -> JwkResult<Option<Vec<u8>>> {
        match self.params.get(name) {
            None => Ok(None),
            Some(Value::String(encoded)) => encoding::decode_url(name, encoded).map(Some),
            Some(other) => Err(JwkError::malformed(format!(
                "parameter \"{name}\" must be a base64url string, found {}",
                json_kind(other)
            ))),
        }
    }

    /// `key_ops` entries, or `None` when absent or not an array of strings
    #[must_use]
    pub fn key_ops(&self) -> Option<Vec<&str>> {
        self.params
            .get("key_ops")?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// Whether the record carries private or secret key material
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self.key_type() {
            KeyType::Oct => self.has("k"),
            _ => self.has("d"),
        }
    }

    /// RFC 7638 SHA-256 thumbprint, base64url encoded.
    ///
    /// # Errors
    /// Returns [`JwkError::UnsupportedKeyType`] for a `kty` without defined
    /// thumbprint members and [`JwkError::MalformedKey`] when one of them is
    /// missing or not a string.
    pub fn thumbprint(&self) -> JwkResult<String> {
        let key_type = self.key_type();
        let members = key_type.thumbprint_members().ok_or_else(|| {
            JwkError::unsupported(format!("no thumbprint members defined for kty \"{key_type}\""))
        })?;

        let mut canonical = BTreeMap::new();
        canonical.insert("kty", self.kty());
        for &member in members {
            let value = self.get_str(member).ok_or_else(|| {
                JwkError::malformed(format!("thumbprint member \"{member}\" is missing"))
            })?;
            canonical.insert(member, value);
        }

        let json = serde_json::to_string(&canonical)
            .map_err(|e| JwkError::malformed(format!("cannot serialize thumbprint input: {e}")))?;
        Ok(encoding::encode_url(&Sha256::digest(json.as_bytes())))
    }
}

impl TryFrom<Value> for KeyRecord {
    type Error = JwkError;

    fn try_from(value: Value) -> JwkResult<Self> {
        Self::new(value)
    }
}

impl Serialize for KeyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.params.serialize(serializer)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_construct_requires_kty() {
        let err = KeyRecord::new(json!({"n": "AQAB"})).unwrap_err();
        assert_eq!(
            err,
            JwkError::MalformedKey("missing required parameter \"kty\"".to_string())
        );
    }

    #[test]
    fn test_construct_rejects_non_objects() {
        for value in [json!(null), json!("RSA"), json!([{"kty": "RSA"}]), json!(42)] {
            assert!(matches!(
                KeyRecord::new(value),
                Err(JwkError::MalformedKey(_))
            ));
        }
    }

    #[test]
    fn test_construct_rejects_non_string_kty() {
        assert!(KeyRecord::new(json!({"kty": 1})).is_err());
        assert!(KeyRecord::new(json!({"kty": ""})).is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_text() {
        assert!(matches!(
            KeyRecord::from_json("{\"kty\":"),
            Err(JwkError::MalformedKey(msg)) if msg.starts_with("invalid JSON")
        ));
    }

    #[test]
    fn test_get_with_default() {
        let key = KeyRecord::new(json!({"kty": "oct", "k": "AAAA"})).unwrap();
        let fallback = json!("sig");
        assert_eq!(key.get_or("use", &fallback), &fallback);
        assert_eq!(key.get_or("k", &fallback), &json!("AAAA"));
        assert!(key.get("use").is_none());
        assert_eq!(key.key_type(), KeyType::Oct);
    }

    #[test]
    fn test_decode_param() {
        let key = KeyRecord::new(json!({"kty": "oct", "k": "AAAA", "bad": 7})).unwrap();
        assert_eq!(key.decode_param("k").unwrap(), Some(vec![0, 0, 0]));
        assert_eq!(key.decode_param("missing").unwrap(), None);
        assert!(key.decode_param("bad").is_err());
    }

    #[test]
    fn test_key_ops_requires_strings() {
        let key = KeyRecord::new(json!({"kty": "EC", "key_ops": ["sign", "verify"]})).unwrap();
        assert_eq!(key.key_ops(), Some(vec!["sign", "verify"]));

        let key = KeyRecord::new(json!({"kty": "EC", "key_ops": ["sign", 3]})).unwrap();
        assert_eq!(key.key_ops(), None);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = KeyRecord::new(json!({"kty": "oct", "k": "AAAA", "kid": "a"})).unwrap();
        let b = KeyRecord::from_json(r#"{"kid":"a","k":"AAAA","kty":"oct"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_preserves_attribute_order() {
        let key = KeyRecord::from_json(r#"{"kty":"oct","use":"sig","k":"AAAA"}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            r#"{"kty":"oct","use":"sig","k":"AAAA"}"#
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let key: KeyRecord = serde_json::from_str(r#"{"kty":"OKP","crv":"Ed25519"}"#).unwrap();
        assert_eq!(key.key_type(), KeyType::Okp);
        assert!(serde_json::from_str::<KeyRecord>(r#"{"crv":"Ed25519"}"#).is_err());
    }

    #[test]
    fn test_rfc7638_thumbprint() {
        let key = KeyRecord::new(json!({
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
            "alg": "RS256",
            "kid": "2011-04-29"
        }))
        .unwrap();
        assert_eq!(
            key.thumbprint().unwrap(),
            "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs"
        );
    }

    #[test]
    fn test_thumbprint_needs_members() {
        let key = KeyRecord::new(json!({"kty": "EC", "crv": "P-256", "x": "AA"})).unwrap();
        assert!(matches!(key.thumbprint(), Err(JwkError::MalformedKey(_))));

        let key = KeyRecord::new(json!({"kty": "DSA"})).unwrap();
        assert!(matches!(key.thumbprint(), Err(JwkError::UnsupportedKeyType(_))));
    }

    #[test]
    fn test_is_private() {
        assert!(KeyRecord::new(json!({"kty": "oct", "k": "AAAA"})).unwrap().is_private());
        assert!(!KeyRecord::new(json!({"kty": "RSA", "n": "AQ", "e": "AQAB"})).unwrap().is_private());
        assert!(KeyRecord::new(json!({"kty": "EC", "d": "AQ"})).unwrap().is_private());
    }
}
