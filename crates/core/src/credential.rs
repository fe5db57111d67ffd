//! Credential handle attached to authenticated requests.

use std::fmt;

use reqwest::RequestBuilder;

/// Opaque token-bearing handle for the build service.
///
/// Personal access tokens are sent as HTTP basic auth with an empty user name.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    /// No authentication header is sent.
    #[default]
    Anonymous,
    /// Personal access token.
    PersonalAccessToken(String),
}

impl Credential {
    /// Builds a credential from an optional token; empty tokens are anonymous.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(t) if !t.is_empty() => Self::PersonalAccessToken(t.to_string()),
            _ => Self::Anonymous,
        }
    }

    /// Whether requests will carry credentials.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::PersonalAccessToken(_))
    }

    /// Attaches the credential to an outgoing request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Anonymous => request,
            Self::PersonalAccessToken(token) => request.basic_auth("", Some(token)),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::PersonalAccessToken(_) => write!(f, "PersonalAccessToken(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(Credential::from_token(None), Credential::Anonymous);
        assert_eq!(Credential::from_token(Some("  ")), Credential::Anonymous);
        assert_eq!(
            Credential::from_token(Some("abc")),
            Credential::PersonalAccessToken("abc".to_string())
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::from_token(Some("super-secret"));
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("super-secret"));
        assert!(credential.is_authenticated());
    }

    #[test]
    fn test_apply_sets_basic_auth() {
        let client = reqwest::Client::new();
        let request = Credential::from_token(Some("pat"))
            .apply(client.get("http://localhost/"))
            .build()
            .unwrap();
        let header = request.headers().get("authorization").unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic OnBhdA==");
    }

    #[test]
    fn test_anonymous_sends_no_header() {
        let client = reqwest::Client::new();
        let request = Credential::Anonymous
            .apply(client.get("http://localhost/"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
