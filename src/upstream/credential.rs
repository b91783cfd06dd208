use super::error::FetchError;

/// Value shipped in sample `.env` files; treated the same as no key at all.
pub const PLACEHOLDER_KEY: &str = "YOUR_API_KEY_HERE";

#[derive(Debug, Clone, Default)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn new(key: Option<String>) -> Self {
        Self(key)
    }

    pub fn is_usable(&self) -> bool {
        self.require().is_ok()
    }

    pub fn require(&self) -> Result<&str, FetchError> {
        match self.0.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_KEY => Ok(key),
            _ => Err(FetchError::MissingCredential),
        }
    }
}
