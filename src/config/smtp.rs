//! Outbound mail settings used by alert notifications.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub ssl: bool,
    pub username: String,
    /// Encrypted with the repository secret key by the caller; stored opaque
    pub encrypted_password: String,
    pub from_email_address: String,
    pub from_display_name: String,
    /// Extra transport properties passed through to the mail client
    pub additional_properties: BTreeMap<String, String>,
}
