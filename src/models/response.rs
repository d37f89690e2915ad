//! Backend response payloads.

use serde::{Deserialize, Serialize};

/// Generic `{status, message}` envelope used by signup, verify and the
/// SSO settings save endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Response from `POST /api/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl LoginResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Display name handed to the root navigator on success.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Runtime SSO configuration from `GET /api/auth/sso/config`.
///
/// Unlike the admin `SsoSettings` record, this never carries the client
/// secret; it is exactly what the identity client needs to be constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoConfig {
    pub enabled: bool,
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    pub realm: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
}

/// Response from `POST /api/settings/keycloak/test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoTestResponse {
    pub success: bool,
    pub issuer: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_success() {
        let json = r#"{"status":"success","message":"Login successful","firstName":"A","lastName":"B"}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("parse login response");
        assert!(resp.is_success());
        assert_eq!(resp.display_name(), "A B");
    }

    #[test]
    fn test_parse_login_rejection() {
        // 2xx with a failure payload: backend validated the request but
        // rejected the credentials.
        let json = r#"{"status":"error","message":"Invalid email or password"}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("parse login rejection");
        assert!(!resp.is_success());
        assert_eq!(resp.message, "Invalid email or password");
    }

    #[test]
    fn test_parse_sso_config() {
        let json = r#"{"enabled":true,"serverUrl":"https://kc.example.com","realm":"portal","clientId":"portal-web"}"#;
        let cfg: SsoConfig = serde_json::from_str(json).expect("parse sso config");
        assert!(cfg.enabled);
        assert_eq!(cfg.realm, "portal");
    }

    #[test]
    fn test_parse_sso_test_outcomes() {
        let ok: SsoTestResponse =
            serde_json::from_str(r#"{"success":true,"issuer":"https://kc.example.com/realms/portal"}"#)
                .expect("parse test success");
        assert!(ok.success);
        assert_eq!(ok.issuer.as_deref(), Some("https://kc.example.com/realms/portal"));
        assert!(ok.message.is_none());

        let failed: SsoTestResponse =
            serde_json::from_str(r#"{"success":false,"message":"Connection refused"}"#)
                .expect("parse test failure");
        assert!(!failed.success);
        assert_eq!(failed.message.as_deref(), Some("Connection refused"));
    }
}
