//! Payment gateway request signing
//!
//! Signature = hex(sha256(secret || canonical_query)), where the canonical
//! query is every `key=value` pair except `signature`, sorted by key and
//! joined with `&`.

use sha2::{Digest, Sha256};

pub const SIGNATURE_PARAM: &str = "signature";

/// Sorted `key=value&...` form of the parameters, `signature` excluded.
pub fn canonical_query<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .filter(|(k, _)| *k != SIGNATURE_PARAM)
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn digest<K, V>(secret: &str, params: &[(K, V)]) -> Vec<u8>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(canonical_query(params).as_bytes());
    hasher.finalize().to_vec()
}

pub fn sign_params<K, V>(secret: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    hex::encode(digest(secret, params))
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check the `signature` parameter against the rest of the set.
pub fn verify_params<K, V>(secret: &str, params: &[(K, V)]) -> bool
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let Some(given) = params
        .iter()
        .find(|(k, _)| k.as_ref() == SIGNATURE_PARAM)
        .map(|(_, v)| v.as_ref())
    else {
        return false;
    };
    let Ok(given) = hex::decode(given) else {
        return false;
    };
    constant_time_eq(&given, &digest(secret, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_query_sorts_and_skips_signature() {
        let params = [
            ("txn_ref", "abc"),
            ("signature", "zzz"),
            ("amount", "100"),
        ];
        assert_eq!(canonical_query(&params), "amount=100&txn_ref=abc");
    }

    #[test]
    fn signed_params_verify() {
        let mut params = vec![
            ("txn_ref".to_string(), "abc".to_string()),
            ("response_code".to_string(), "00".to_string()),
            ("amount".to_string(), "200000".to_string()),
        ];
        let sig = sign_params("secret", &params);
        params.push(("signature".to_string(), sig));
        assert!(verify_params("secret", &params));
        assert!(!verify_params("other-secret", &params));
    }

    #[test]
    fn tampered_amount_fails() {
        let mut params = vec![("txn_ref", "abc"), ("amount", "200000")];
        let sig = sign_params("secret", &params);
        params[1] = ("amount", "1");
        params.push(("signature", sig.as_str()));
        assert!(!verify_params("secret", &params));
    }

    #[test]
    fn missing_signature_fails() {
        assert!(!verify_params("secret", &[("txn_ref", "abc")]));
    }

    #[test]
    fn signature_must_match_every_byte() {
        let mut params = vec![("txn_ref", "abc"), ("amount", "200000")];
        let sig = sign_params("secret", &params);

        let mut bytes = hex::decode(&sig).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let off_by_one = hex::encode(bytes);
        let truncated = &sig[..sig.len() - 2];
        let upper = sig.to_uppercase();

        params.push(("signature", off_by_one.as_str()));
        assert!(!verify_params("secret", &params));
        params[2] = ("signature", truncated);
        assert!(!verify_params("secret", &params));
        params[2] = ("signature", "not-hex");
        assert!(!verify_params("secret", &params));
        params[2] = ("signature", upper.as_str());
        assert!(verify_params("secret", &params));
    }
}
