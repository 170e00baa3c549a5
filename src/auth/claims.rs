use serde::{Deserialize, Serialize};

/// Purpose of a token, carried in the `iss` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String, // "access" or "refresh"
    pub sub: String, // user id
    pub iat: i64,    // issued at (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
}

impl Claims {
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.iss == kind.issuer()
    }
}
