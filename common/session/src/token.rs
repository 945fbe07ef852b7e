use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::claims::Claims;
use crate::error::{SessionError, SessionResult};

/// Decode the payload segment of a compact three-part token.
///
/// The signature is NOT checked: this is claim extraction for routing
/// decisions inside a trusted deployment, never an authentication check
/// on its own. Anything trusting these claims for real authorization
/// must verify the signature first.
pub fn decode_claims(token: &str) -> SessionResult<Claims> {
    let mut segments = token.split('.');
    let payload = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(SessionError::MalformedToken),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| SessionError::PayloadEncoding(err.to_string()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|err| SessionError::PayloadJson(err.to_string()))?;
    Claims::try_from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;
    use uuid::Uuid;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.signature-not-checked")
    }

    #[test]
    fn decodes_a_well_formed_token() {
        let subject = Uuid::new_v4();
        let store = Uuid::new_v4();
        let token = token_with_payload(&json!({
            "sub": subject.to_string(),
            "authorities": "ROLE_STORE_ADMIN",
            "storeId": store.to_string(),
            "exp": 2_000_000_000i64,
            "iat": 1_900_000_000i64,
        }));

        let claims = decode_claims(&token).expect("claims");
        assert_eq!(claims.subject, subject);
        assert_eq!(claims.role, Role::StoreAdmin);
        assert_eq!(claims.store_id, Some(store));
        assert!(claims.issued_at.is_some());
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert!(matches!(
            decode_claims("only-one-segment"),
            Err(SessionError::MalformedToken)
        ));
        assert!(matches!(
            decode_claims("two.segments"),
            Err(SessionError::MalformedToken)
        ));
        assert!(matches!(
            decode_claims("a.b.c.d"),
            Err(SessionError::MalformedToken)
        ));
    }

    #[test]
    fn rejects_garbage_payload_encoding() {
        assert!(matches!(
            decode_claims("head.!!not-base64!!.sig"),
            Err(SessionError::PayloadEncoding(_))
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        let body = URL_SAFE_NO_PAD.encode(b"plain text");
        let token = format!("head.{body}.sig");
        assert!(matches!(
            decode_claims(&token),
            Err(SessionError::PayloadJson(_))
        ));
    }

    #[test]
    fn decodes_tokens_minted_by_a_real_signer() {
        #[derive(serde::Serialize)]
        struct TokenClaims {
            sub: String,
            authorities: String,
            exp: i64,
            iat: i64,
        }

        let claims = TokenClaims {
            sub: Uuid::new_v4().to_string(),
            authorities: "ROLE_BRANCH_MANAGER".to_string(),
            exp: 2_000_000_000,
            iat: 1_900_000_000,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"backend-secret"),
        )
        .expect("sign");

        // Decodes without the secret: extraction, not verification.
        let decoded = decode_claims(&token).expect("claims");
        assert_eq!(decoded.role, Role::BranchManager);
    }

    #[test]
    fn accepts_padded_payload_segments() {
        // Some encoders pad the payload; strip before decoding.
        let payload = json!({
            "sub": Uuid::new_v4().to_string(),
            "role": "ROLE_USER",
            "exp": 2_000_000_000i64,
        });
        let mut body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        while body.len() % 4 != 0 {
            body.push('=');
        }
        let token = format!("head.{body}.sig");
        assert!(decode_claims(&token).is_ok());
    }
}
