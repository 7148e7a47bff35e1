//! Compact serialisation: `header.claims.signature`, each base64url.

use crate::{Claims, TokenError, TokenHeader};
use agegate_crypto::b64url_decode;

/// A token split into its three decoded segments.
pub(crate) struct Segments<'a> {
    pub header: TokenHeader,
    pub claims_json: Vec<u8>,
    pub signature: Vec<u8>,
    /// The `header.claims` prefix the signature covers.
    pub signing_input: &'a str,
}

pub(crate) fn split(token: &str) -> Result<Segments<'_>, TokenError> {
    let token = token.trim();
    let mut parts = token.split('.');
    let (Some(h), Some(c), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed("expected three segments".into()));
    };
    if h.is_empty() || c.is_empty() || s.is_empty() {
        return Err(TokenError::Malformed("empty segment".into()));
    }

    let header_json = b64url_decode(h).map_err(|e| TokenError::Malformed(e.to_string()))?;
    let header: TokenHeader = serde_json::from_slice(&header_json)
        .map_err(|e| TokenError::Malformed(format!("header: {e}")))?;
    let claims_json = b64url_decode(c).map_err(|e| TokenError::Malformed(e.to_string()))?;
    let signature = b64url_decode(s).map_err(|e| TokenError::Malformed(e.to_string()))?;

    Ok(Segments {
        header,
        claims_json,
        signature,
        signing_input: &token[..h.len() + 1 + c.len()],
    })
}

pub(crate) fn parse_claims(json: &[u8]) -> Result<Claims, TokenError> {
    serde_json::from_slice(json).map_err(|e| TokenError::Malformed(format!("claims: {e}")))
}

/// Decode the claims of a token without verifying anything.
///
/// Never panics; returns `None` on any structural problem. The result must
/// not be trusted for access decisions.
pub fn decode(token: &str) -> Option<Claims> {
    match split(token).and_then(|segments| parse_claims(&segments.claims_json)) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "token decode failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegate_crypto::b64url_encode;

    fn encode_parts(header: &str, claims: &str, sig: &[u8]) -> String {
        format!(
            "{}.{}.{}",
            b64url_encode(header.as_bytes()),
            b64url_encode(claims.as_bytes()),
            b64url_encode(sig)
        )
    }

    const CLAIMS: &str = r#"{"iss":"i","sub":"s","iat":1,"exp":2,"jti":"j","age_assertion":{"age_threshold":18,"confidence":0.9,"status":"verified","is_of_age":true,"domain":"example.com"}}"#;

    #[test]
    fn decode_reads_claims_without_verifying() {
        let token = encode_parts(r#"{"alg":"EdDSA"}"#, CLAIMS, &[0u8; 64]);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub, "s");
        assert!(claims.age_assertion.is_of_age);
        assert_eq!(claims.age_assertion.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("").is_none());
        assert!(decode("a.b").is_none());
        assert!(decode("a.b.c.d").is_none());
        assert!(decode("!!!.???.***").is_none());
        let bad_claims = encode_parts(r#"{"alg":"EdDSA"}"#, r#"{"sub":1}"#, &[0u8; 64]);
        assert!(decode(&bad_claims).is_none());
    }

    #[test]
    fn signing_input_excludes_signature() {
        let token = encode_parts(r#"{"alg":"EdDSA"}"#, CLAIMS, &[1u8; 64]);
        let segments = split(&token).unwrap();
        assert_eq!(segments.signing_input, token.rsplit_once('.').unwrap().0);
        assert_eq!(segments.signature.len(), 64);
    }
}
