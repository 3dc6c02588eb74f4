use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::non_empty_string;
use url::Url;

non_empty_string!(RecipientEmail);

fn default_subject() -> String {
    "Vaccine Availability".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub host: Url,
    pub auth_token: Secret<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}
