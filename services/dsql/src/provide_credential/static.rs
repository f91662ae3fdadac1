use crate::Credential;
use async_trait::async_trait;
use dsql_auth_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider always hands out the same credential.
///
/// Useful for tests and for callers that already resolved their keys.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with access key ID and secret access key.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            credential: Credential::new(access_key_id, secret_access_key),
        }
    }

    /// Set the session token.
    pub fn with_session_token(mut self, token: &str) -> Self {
        self.credential.session_token = Some(token.to_string());
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() -> anyhow::Result<()> {
        let ctx = Context::new();

        let provider = StaticCredentialProvider::new("akid", "secret");
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "akid");
        assert_eq!(cred.secret_access_key, "secret");
        assert!(cred.session_token.is_none());

        let provider = StaticCredentialProvider::new("akid", "secret").with_session_token("token");
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.session_token.as_deref(), Some("token"));

        Ok(())
    }
}
