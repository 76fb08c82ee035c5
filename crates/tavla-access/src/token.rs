//! Token issuance and verification.

use std::str::FromStr;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tavla_domain::UserId;
use thiserror::Error;

use crate::{Actor, ProjectScope, DEFAULT_TTL_SECS, MAX_TTL_SECS};

/// Body of a token issuance request.
///
/// Unrecognized scope strings are dropped during parsing rather than
/// rejected; issuance fails afterwards if nothing recognizable remains.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenRequest {
    pub scopes: Vec<String>,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl TokenRequest {
    /// Recognized scopes, in request order.
    pub fn scopes(&self) -> Vec<ProjectScope> {
        ProjectScope::parse_known(&self.scopes)
    }

    /// Requested lifetime, defaulted but not yet bounds-checked.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.unwrap_or(DEFAULT_TTL_SECS)
    }
}

/// Issuance failures; all are request-validation errors (400-class).
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("scopes must not be empty")]
    EmptyScopes,
    #[error("ttl must be between 1 and {MAX_TTL_SECS} seconds, got {0}")]
    InvalidTtl(u64),
    #[error("token encoding failed")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Authorization failures for protected operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// 401-class. Bad signature, malformed token, and expiry all collapse to
    /// this one variant so callers cannot distinguish forged from expired.
    #[error("invalid token")]
    InvalidToken,
    /// 403-class: the token verified but grants none of the required scopes.
    #[error("insufficient scopes, requires one of: {required:?}")]
    Forbidden { required: Vec<ProjectScope> },
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    scopes: Vec<String>,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed access tokens with one shared secret.
///
/// The secret and algorithm come from process configuration, never from
/// request input.
pub struct AccessTokens {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AccessTokens {
    /// Build from the signing secret and an HMAC-family algorithm.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            header: Header::new(algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a signed token for `actor_id`, valid for `ttl_secs` from now.
    pub fn issue(
        &self,
        actor_id: &UserId,
        scopes: &[ProjectScope],
        ttl_secs: u64,
    ) -> Result<String, IssueError> {
        if scopes.is_empty() {
            return Err(IssueError::EmptyScopes);
        }
        if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
            return Err(IssueError::InvalidTtl(ttl_secs));
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: actor_id.to_string(),
            scopes: scopes.iter().map(|s| s.as_str().to_string()).collect(),
            iat: now,
            exp: now + ttl_secs as i64,
        };
        Ok(encode(&self.header, &claims, &self.encoding)?)
    }

    /// Decode and validate a token, reconstructing the actor it was issued
    /// to. Every failure mode collapses to [`AccessError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Actor, AccessError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AccessError::InvalidToken)?;

        let user_id = UserId::from_str(&data.claims.sub).map_err(|_| AccessError::InvalidToken)?;

        // A scope value outside the closed set could not have been issued
        // by us, so the whole token is treated as forged.
        let scopes = data
            .claims
            .scopes
            .iter()
            .map(|s| ProjectScope::from_str(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AccessError::InvalidToken)?;

        Ok(Actor::new(user_id, scopes))
    }

    /// Gate for protected operations: verify the token, then require the
    /// granted scopes to intersect `required`.
    pub fn authorize(&self, token: &str, required: &[ProjectScope]) -> Result<Actor, AccessError> {
        let actor = self.verify(token)?;
        if !actor.has_any_scope(required) {
            tracing::debug!(
                user_id = %actor.user_id,
                granted = ?actor.scopes,
                ?required,
                "scope check failed"
            );
            return Err(AccessError::Forbidden {
                required: required.to_vec(),
            });
        }
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{READ_SCOPES, WRITE_SCOPES};

    const SECRET: &[u8] = b"test-signing-secret";

    fn tokens() -> AccessTokens {
        AccessTokens::new(SECRET, Algorithm::HS256)
    }

    fn encode_raw(claims: &Claims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn issue_verify_round_trip() {
        let tokens = tokens();
        let actor_id = UserId::new();
        let scopes = vec![ProjectScope::Read, ProjectScope::WriteSelf];

        let token = tokens.issue(&actor_id, &scopes, 600).unwrap();
        let actor = tokens.verify(&token).unwrap();

        assert_eq!(actor.user_id, actor_id);
        assert_eq!(actor.scopes, scopes);
    }

    #[test]
    fn self_read_token_yields_self_scoped_actor() {
        let tokens = tokens();
        let actor_id = UserId::new();

        let request = TokenRequest {
            scopes: vec!["projects:self".to_string()],
            ttl: Some(600),
        };
        let scopes = request.scopes();
        assert_eq!(scopes, vec![ProjectScope::ReadSelf]);

        let token = tokens.issue(&actor_id, &scopes, request.ttl_secs()).unwrap();
        let actor = tokens.verify(&token).unwrap();

        assert_eq!(actor.user_id, actor_id);
        assert_eq!(actor.scopes, vec![ProjectScope::ReadSelf]);
        assert_eq!(actor.read_owner(), Some(actor_id));
    }

    #[test]
    fn ttl_defaults_and_bounds() {
        let request = TokenRequest {
            scopes: vec!["projects".to_string()],
            ttl: None,
        };
        assert_eq!(request.ttl_secs(), DEFAULT_TTL_SECS);

        let tokens = tokens();
        let actor_id = UserId::new();
        let scopes = [ProjectScope::Read];

        assert!(tokens.issue(&actor_id, &scopes, MAX_TTL_SECS).is_ok());
        assert!(matches!(
            tokens.issue(&actor_id, &scopes, MAX_TTL_SECS + 1),
            Err(IssueError::InvalidTtl(_))
        ));
        assert!(matches!(
            tokens.issue(&actor_id, &scopes, 0),
            Err(IssueError::InvalidTtl(0))
        ));
    }

    #[test]
    fn empty_scope_set_cannot_be_issued() {
        let tokens = tokens();
        assert!(matches!(
            tokens.issue(&UserId::new(), &[], 600),
            Err(IssueError::EmptyScopes)
        ));

        // Request-body parsing drops unknown scopes; an all-unknown request
        // leaves nothing to issue.
        let request = TokenRequest {
            scopes: vec!["bogus".to_string(), "projects:admin".to_string()],
            ttl: None,
        };
        assert!(request.scopes().is_empty());
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = tokens();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            scopes: vec!["projects".to_string()],
            iat: now - 1200,
            exp: now - 600,
        };
        let token = encode_raw(&claims, SECRET);

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessError::InvalidToken)
        ));
    }

    #[test]
    fn forged_signature_is_invalid() {
        let tokens = tokens();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            scopes: vec!["projects".to_string()],
            iat: now,
            exp: now + 600,
        };
        let token = encode_raw(&claims, b"some-other-secret");

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessError::InvalidToken)
        ));
    }

    #[test]
    fn malformed_token_is_invalid() {
        let tokens = tokens();
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AccessError::InvalidToken)
        ));
        assert!(matches!(tokens.verify(""), Err(AccessError::InvalidToken)));
    }

    #[test]
    fn token_with_unknown_scope_is_invalid() {
        let tokens = tokens();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            scopes: vec!["projects".to_string(), "projects:admin".to_string()],
            iat: now,
            exp: now + 600,
        };
        let token = encode_raw(&claims, SECRET);

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessError::InvalidToken)
        ));
    }

    #[test]
    fn token_with_non_uuid_subject_is_invalid() {
        let tokens = tokens();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u1".to_string(),
            scopes: vec!["projects:self".to_string()],
            iat: now,
            exp: now + 600,
        };
        let token = encode_raw(&claims, SECRET);

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessError::InvalidToken)
        ));
    }

    #[test]
    fn authorize_succeeds_on_any_required_scope() {
        let tokens = tokens();
        let actor_id = UserId::new();

        // WriteSelf alone satisfies the write pair.
        let token = tokens
            .issue(&actor_id, &[ProjectScope::WriteSelf], 600)
            .unwrap();
        let actor = tokens.authorize(&token, &WRITE_SCOPES).unwrap();
        assert_eq!(actor.write_owner(), Some(actor_id));

        // Holding both variants also passes, unrestricted.
        let token = tokens
            .issue(&actor_id, &[ProjectScope::Read, ProjectScope::ReadSelf], 600)
            .unwrap();
        let actor = tokens.authorize(&token, &READ_SCOPES).unwrap();
        assert_eq!(actor.read_owner(), None);
    }

    #[test]
    fn authorize_rejects_disjoint_scopes() {
        let tokens = tokens();
        let token = tokens
            .issue(&UserId::new(), &[ProjectScope::ReadSelf], 600)
            .unwrap();

        let err = tokens.authorize(&token, &WRITE_SCOPES).unwrap_err();
        match err {
            AccessError::Forbidden { required } => {
                assert_eq!(required, WRITE_SCOPES.to_vec());
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn token_request_body_parses() {
        let request: TokenRequest =
            serde_json::from_str(r#"{"scopes": ["projects:self"], "ttl": 600}"#).unwrap();
        assert_eq!(request.scopes(), vec![ProjectScope::ReadSelf]);
        assert_eq!(request.ttl_secs(), 600);

        let request: TokenRequest = serde_json::from_str(r#"{"scopes": ["projects"]}"#).unwrap();
        assert_eq!(request.ttl_secs(), DEFAULT_TTL_SECS);
    }
}
