//! Mail and SSO configuration records, mirrored 1:1 from the backend.

use serde::{Deserialize, Serialize};

/// Default SMTP submission port.
const DEFAULT_SMTP_PORT: u16 = 587;

/// Mail server configuration as served by `/api/settings/mail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub protocol: String,
    pub auth: bool,
    pub starttls: bool,
    #[serde(rename = "fromEmail")]
    pub from_email: String,
    #[serde(rename = "fromName")]
    pub from_name: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            username: String::new(),
            password: String::new(),
            protocol: "smtp".to_string(),
            auth: true,
            starttls: true,
            from_email: String::new(),
            from_name: String::new(),
        }
    }
}

/// SSO provider configuration as served by `/api/settings/keycloak`.
///
/// This is the admin-editable record; the runtime counterpart the session
/// provider consumes is `SsoConfig` (no client secret).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoSettings {
    pub enabled: bool,
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    pub realm: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

impl Default for SsoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            server_url: String::new(),
            realm: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_defaults() {
        let mail = MailSettings::default();
        assert_eq!(mail.port, 587);
        assert_eq!(mail.protocol, "smtp");
        assert!(mail.auth);
        assert!(mail.starttls);
        assert!(mail.host.is_empty());
    }

    #[test]
    fn test_mail_round_trips_camel_case() {
        let json = r#"{"host":"smtp.example.com","port":465,"username":"mailer","password":"s3cret","protocol":"smtps","auth":true,"starttls":false,"fromEmail":"noreply@example.com","fromName":"Portal"}"#;
        let mail: MailSettings = serde_json::from_str(json).expect("parse mail settings");
        assert_eq!(mail.host, "smtp.example.com");
        assert_eq!(mail.port, 465);
        assert_eq!(mail.from_email, "noreply@example.com");

        let out = serde_json::to_string(&mail).expect("serialize mail settings");
        assert!(out.contains("\"fromEmail\""));
        assert!(out.contains("\"fromName\""));
    }

    #[test]
    fn test_mail_missing_fields_fall_back_to_defaults() {
        let mail: MailSettings = serde_json::from_str(r#"{"host":"mx.example.com"}"#)
            .expect("parse partial mail settings");
        assert_eq!(mail.host, "mx.example.com");
        assert_eq!(mail.port, 587);
        assert_eq!(mail.protocol, "smtp");
    }

    #[test]
    fn test_sso_settings_wire_names() {
        let json = r#"{"enabled":true,"serverUrl":"https://kc.example.com","realm":"portal","clientId":"portal-web","clientSecret":"xyz"}"#;
        let sso: SsoSettings = serde_json::from_str(json).expect("parse sso settings");
        assert_eq!(sso.server_url, "https://kc.example.com");
        assert_eq!(sso.client_id, "portal-web");

        let out = serde_json::to_string(&sso).expect("serialize sso settings");
        assert!(out.contains("\"serverUrl\""));
        assert!(out.contains("\"clientId\""));
        assert!(out.contains("\"clientSecret\""));
    }
}
