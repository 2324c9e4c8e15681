use crate::error::{TrackorError, TrackorResult};
use base64::{Engine, engine::general_purpose};

/// Authentication trait for the Trackor API
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> TrackorResult<()>;
}

/// Basic authentication using the OneVizion login and password
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header for these credentials
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", general_purpose::STANDARD.encode(credentials.as_bytes()))
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
impl Authentication for BasicAuth {
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> TrackorResult<()> {
        headers.insert(
            reqwest::header::AUTHORIZATION,
            self.header_value().parse()
                .map_err(|e| TrackorError::auth_error(format!("Invalid auth header: {}", e)))?
        );

        Ok(())
    }
}
