// JWT issue and verification
// Tokens carry the caller's role so the permission gate needs no lookup

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{UserProfile, UserRole};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    pub role: UserRole,
    /// Company the user acts for, if any
    pub company_id: Option<Uuid>,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

impl Claims {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            role: self.role,
            company_id: self.company_id,
        }
    }
}

/// Signs and verifies HS256 tokens with a shared secret
///
/// # Example
/// ```
/// use talentverify_api::auth::TokenIssuer;
/// use talentverify_api::domain::user::{UserProfile, UserRole};
/// use uuid::Uuid;
///
/// let issuer = TokenIssuer::new("your-secret-key", 8);
/// let user_id = Uuid::new_v4();
/// let profile = UserProfile { role: UserRole::HrStaff, company_id: None };
///
/// let token = issuer.issue(user_id, profile).unwrap();
/// let claims = issuer.verify(&token).unwrap();
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.role, UserRole::HrStaff);
/// ```
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    pub fn issue(&self, user_id: Uuid, profile: UserProfile) -> Result<String, String> {
        let expiry = Utc::now() + self.lifetime;
        let claims = Claims {
            sub: user_id,
            role: profile.role,
            company_id: profile.company_id,
            exp: expiry.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| e.to_string())
    }

    /// Decodes a token, rejecting bad signatures and expired tokens
    pub fn verify(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| e.to_string())
    }
}
