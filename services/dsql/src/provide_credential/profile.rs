use crate::constants::{AWS_CONFIG_FILE, AWS_PROFILE, AWS_SHARED_CREDENTIALS_FILE};
use crate::Credential;
use async_trait::async_trait;
use dsql_auth_core::{Context, Error, ProvideCredential, Result};
use ini::Ini;
use log::debug;

const DEFAULT_PROFILE: &str = "default";
const DEFAULT_CREDENTIALS_FILE: &str = "~/.aws/credentials";
const DEFAULT_CONFIG_FILE: &str = "~/.aws/config";

/// Which of the two shared files is being read.
///
/// They differ in how a named profile maps onto an ini section.
#[derive(Debug, Clone, Copy)]
enum SharedFile {
    Credentials,
    Config,
}

impl SharedFile {
    fn env_key(self) -> &'static str {
        match self {
            SharedFile::Credentials => AWS_SHARED_CREDENTIALS_FILE,
            SharedFile::Config => AWS_CONFIG_FILE,
        }
    }

    fn default_path(self) -> &'static str {
        match self {
            SharedFile::Credentials => DEFAULT_CREDENTIALS_FILE,
            SharedFile::Config => DEFAULT_CONFIG_FILE,
        }
    }

    fn section(self, profile: &str) -> String {
        match (self, profile) {
            (SharedFile::Credentials, p) => p.to_string(),
            (SharedFile::Config, DEFAULT_PROFILE) => DEFAULT_PROFILE.to_string(),
            (SharedFile::Config, p) => format!("profile {p}"),
        }
    }
}

/// ProfileCredentialProvider loads static keys from the shared AWS files.
///
/// The credentials file (`AWS_SHARED_CREDENTIALS_FILE`, falling back to
/// `~/.aws/credentials`) is consulted before the config file
/// (`AWS_CONFIG_FILE`, falling back to `~/.aws/config`). The profile comes
/// from `AWS_PROFILE`, then [`ProfileCredentialProvider::with_profile`], then
/// `default`.
///
/// Files that are missing or unreadable are skipped. A file that exists but
/// is not valid ini is reported as a provider error.
#[derive(Debug, Clone)]
pub struct ProfileCredentialProvider {
    profile: String,
    config_file: Option<String>,
    credentials_file: Option<String>,
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider reading the `default` profile.
    pub fn new() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            config_file: None,
            credentials_file: None,
        }
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    fn resolve_path(&self, ctx: &Context, file: SharedFile) -> Option<String> {
        let configured = match file {
            SharedFile::Credentials => self.credentials_file.clone(),
            SharedFile::Config => self.config_file.clone(),
        };
        let path = configured
            .or_else(|| ctx.env_var(file.env_key()))
            .unwrap_or_else(|| file.default_path().to_string());

        if path.starts_with("~/") {
            let expanded = ctx.expand_home_dir(&path);
            if expanded.is_none() {
                debug!("failed to expand home dir for path: {path}");
            }
            expanded
        } else {
            Some(path)
        }
    }

    async fn load(
        &self,
        ctx: &Context,
        file: SharedFile,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let Some(path) = self.resolve_path(ctx, file) else {
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("skip {file:?} file {path}: {err}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::provider(format!("failed to parse {file:?} file {path}"))
                .with_source(anyhow::Error::new(e))
        })?;

        let section = file.section(profile);
        let Some(props) = conf.section(Some(section.as_str())) else {
            debug!("section [{section}] not found in {path}");
            return Ok(None);
        };

        match (
            props.get("aws_access_key_id"),
            props.get("aws_secret_access_key"),
        ) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.to_string(),
                secret_access_key: sk.to_string(),
                session_token: props.get("aws_session_token").map(|s| s.to_string()),
            })),
            _ => {
                debug!("section [{section}] in {path} has no static keys");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = ctx
            .env_var(AWS_PROFILE)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.profile.clone());

        if let Some(cred) = self.load(ctx, SharedFile::Credentials, &profile).await? {
            return Ok(Some(cred));
        }
        self.load(ctx, SharedFile::Config, &profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsql_auth_core::{ErrorKind, StaticEnv};
    use dsql_auth_file_read_tokio::TokioFileRead;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::tempdir;

    fn context(envs: &[(&str, &str)]) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs: envs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            })
    }

    fn path_str(p: &Path) -> String {
        p.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_profile_from_credentials_file() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let tmp_dir = tempdir()?;
        let file_path = tmp_dir.path().join("credentials");
        std::fs::write(
            &file_path,
            "[default]\n\
             aws_access_key_id = DEFAULTACCESSKEYID\n\
             aws_secret_access_key = DEFAULTSECRETACCESSKEY\n\
             aws_session_token = DEFAULTSESSIONTOKEN\n\
             \n\
             [analytics]\n\
             aws_access_key_id = ANALYTICSACCESSKEYID\n\
             aws_secret_access_key = ANALYTICSSECRETACCESSKEY\n",
        )?;
        let ctx = context(&[]);

        let provider = ProfileCredentialProvider::new()
            .with_credentials_file(path_str(&file_path))
            .with_config_file("/non/existent/config");
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "DEFAULTACCESSKEYID");
        assert_eq!(cred.secret_access_key, "DEFAULTSECRETACCESSKEY");
        assert_eq!(cred.session_token.as_deref(), Some("DEFAULTSESSIONTOKEN"));

        let provider = provider.with_profile("analytics");
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "ANALYTICSACCESSKEYID");
        assert!(cred.session_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_from_config_file() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let tmp_dir = tempdir()?;
        let file_path = tmp_dir.path().join("config");
        std::fs::write(
            &file_path,
            "[default]\n\
             aws_access_key_id = DEFAULTACCESSKEYID\n\
             aws_secret_access_key = DEFAULTSECRETACCESSKEY\n\
             \n\
             [profile analytics]\n\
             aws_access_key_id = ANALYTICSACCESSKEYID\n\
             aws_secret_access_key = ANALYTICSSECRETACCESSKEY\n",
        )?;
        let ctx = context(&[(AWS_CONFIG_FILE, &path_str(&file_path))]);

        let provider =
            ProfileCredentialProvider::new().with_credentials_file("/non/existent/credentials");
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "DEFAULTACCESSKEYID");

        let cred = provider
            .with_profile("analytics")
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "ANALYTICSACCESSKEYID");
        assert_eq!(cred.secret_access_key, "ANALYTICSSECRETACCESSKEY");

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_env_override() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let file_path = tmp_dir.path().join("credentials");
        std::fs::write(
            &file_path,
            "[default]\n\
             aws_access_key_id = DEFAULTACCESSKEYID\n\
             aws_secret_access_key = DEFAULTSECRETACCESSKEY\n\
             \n\
             [analytics]\n\
             aws_access_key_id = ANALYTICSACCESSKEYID\n\
             aws_secret_access_key = ANALYTICSSECRETACCESSKEY\n",
        )?;
        let ctx = context(&[
            (AWS_PROFILE, "analytics"),
            (AWS_SHARED_CREDENTIALS_FILE, &path_str(&file_path)),
            (AWS_CONFIG_FILE, "/non/existent/config"),
        ]);

        let cred = ProfileCredentialProvider::new()
            .with_profile("default")
            .provide_credential(&ctx)
            .await?
            .expect("credential must exist");
        assert_eq!(cred.access_key_id, "ANALYTICSACCESSKEYID");

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_missing_files() -> anyhow::Result<()> {
        let ctx = context(&[]);

        let cred = ProfileCredentialProvider::new()
            .with_credentials_file("/non/existent/credentials")
            .with_config_file("/non/existent/config")
            .provide_credential(&ctx)
            .await?;
        assert!(cred.is_none());

        // No home dir to expand the default paths against.
        let cred = ProfileCredentialProvider::new()
            .provide_credential(&ctx)
            .await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_invalid_file() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let file_path = tmp_dir.path().join("credentials");
        std::fs::write(&file_path, "[default\naws_access_key_id = broken\n")?;
        let ctx = context(&[]);

        let err = ProfileCredentialProvider::new()
            .with_credentials_file(path_str(&file_path))
            .provide_credential(&ctx)
            .await
            .expect_err("malformed ini must fail");
        assert_eq!(err.kind(), ErrorKind::Provider);

        Ok(())
    }
}
