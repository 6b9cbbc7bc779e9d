#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Only presence is validated: the address is stored verbatim, with no
    /// syntax check and no normalization.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        if email.is_empty() {
            return Err(String::from("Email required"));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
