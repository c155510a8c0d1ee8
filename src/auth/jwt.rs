use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::user::Account, models::Claims};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

/// Builds the claims for a freshly authenticated account.
pub fn claims_for(account: &Account, ttl: usize) -> Claims {
    Claims {
        user_id: account.id,
        sub: account.email.clone(),
        role: account.role,
        name: Some(account.profile().display_name()),
        employee_id: account.employee_id,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn generate_access_token(claims: &Claims, secret: &str) -> Result<String, Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Rejects bad signatures and any token whose `exp` has passed (no leeway).
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    const SECRET: &str = "unit-test-secret";

    fn account() -> Account {
        Account {
            id: 42,
            email: "rh@example.org".into(),
            password_hash: String::new(),
            role: Role::Hr,
            employee_id: Some(7),
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
        }
    }

    #[test]
    fn issued_tokens_verify_with_the_same_secret() {
        let claims = claims_for(&account(), 60);
        let token = generate_access_token(&claims, SECRET).unwrap();

        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.role, Role::Hr);
        assert_eq!(decoded.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(decoded.employee_id, Some(7));

        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let mut claims = claims_for(&account(), 0);
        claims.exp = now() - 5;
        let token = generate_access_token(&claims, SECRET).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }
}
