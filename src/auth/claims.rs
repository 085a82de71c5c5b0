//! Token claims.

use serde::{Deserialize, Serialize};

/// Role claim carried by a token. One per principal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Business,
    DeliveryDriver,
    User,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Business, Role::DeliveryDriver, Role::User];

    /// Wire form of the role claim.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Business => "business",
            Role::DeliveryDriver => "delivery_driver",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier.
    pub sub: String,
    pub role: Role,
    /// Issued at (seconds since epoch).
    pub iat: u64,
    /// Expiry (seconds since epoch), only when a lifetime is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let names: Vec<_> = Role::ALL
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["admin", "business", "delivery_driver", "user"]
        );
        for role in Role::ALL {
            assert_eq!(serde_json::to_value(role).unwrap(), role.as_str());
        }
    }

    #[test]
    fn test_claims_omit_absent_expiry() {
        let claims = Claims {
            sub: "u1".into(),
            role: Role::User,
            iat: 10,
            exp: None,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json, serde_json::json!({ "sub": "u1", "role": "user", "iat": 10 }));
    }
}
