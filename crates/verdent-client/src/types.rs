//! Request and response types for the Verdent client

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decode a field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// =============================================================================
// Envelope
// =============================================================================

/// Response wrapper used by every Verdent endpoint
///
/// `{ "errCode": 0, "errMsg": "", "data": ... }`. Both error fields are
/// optional; some endpoints only send `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, rename = "errCode")]
    pub err_code: Option<i64>,
    #[serde(default, rename = "errMsg")]
    pub err_msg: Option<String>,
    pub data: Option<T>,
}

// =============================================================================
// Auth Types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PkceCallbackRequest<'a> {
    pub code: &'a str,
    #[serde(rename = "codeVerifier")]
    pub code_verifier: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PkceAuthRequest<'a> {
    #[serde(rename = "codeChallenge")]
    pub code_challenge: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` of the password login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: String,
    #[serde(default, rename = "expireTime", deserialize_with = "lenient")]
    pub expire_time: Option<i64>,
    #[serde(default, rename = "accessToken", deserialize_with = "lenient")]
    pub access_token: Option<String>,
    #[serde(default, rename = "refreshToken", deserialize_with = "lenient")]
    pub refresh_token: Option<String>,
    #[serde(default, rename = "accessTokenExpiresAt", deserialize_with = "lenient")]
    pub access_token_expires_at: Option<i64>,
    #[serde(default, rename = "refreshTokenExpiresAt", deserialize_with = "lenient")]
    pub refresh_token_expires_at: Option<i64>,
    #[serde(default, rename = "needBindInviteCode", deserialize_with = "lenient")]
    pub need_bind_invite_code: Option<bool>,
}

// =============================================================================
// User Types
// =============================================================================

/// Token allowance block of the user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, rename = "tokenConsumed", deserialize_with = "lenient")]
    pub token_consumed: Option<f64>,
    #[serde(default, rename = "tokenFree", deserialize_with = "lenient")]
    pub token_free: Option<f64>,
}

/// User profile returned by `GET /user/center/info`
///
/// Only `email` and `tokenInfo` are interpreted by the client, and a value
/// of the wrong type in either reads as absent. Everything else the server
/// sends is kept untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, rename = "tokenInfo", deserialize_with = "lenient")]
    pub token_info: Option<TokenInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UserInfo {
    /// Credit balance derived from `tokenInfo`; absent amounts count as zero
    pub fn credits(&self) -> Credits {
        let info = self.token_info.clone().unwrap_or_default();
        Credits::new(
            info.token_consumed.unwrap_or(0.0),
            info.token_free.unwrap_or(0.0),
        )
    }
}

/// Token balance
///
/// `total` is the remaining balance (`free - consumed`), not a sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub consumed: f64,
    pub free: f64,
    pub total: f64,
}

impl Credits {
    pub fn new(consumed: f64, free: f64) -> Self {
        Self {
            consumed,
            free,
            total: free - consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_keeps_unknown_fields() {
        let info: UserInfo = serde_json::from_value(json!({
            "email": "a@b.c",
            "tokenInfo": { "tokenConsumed": 30, "tokenFree": 100 },
            "nickname": "ann"
        }))
        .unwrap();

        assert_eq!(info.email.as_deref(), Some("a@b.c"));
        assert_eq!(info.extra.get("nickname"), Some(&json!("ann")));
    }

    #[test]
    fn test_credits_from_token_info() {
        let info: UserInfo = serde_json::from_value(json!({
            "tokenInfo": { "tokenConsumed": 30, "tokenFree": 100 }
        }))
        .unwrap();

        assert_eq!(
            info.credits(),
            Credits {
                consumed: 30.0,
                free: 100.0,
                total: 70.0
            }
        );
    }

    #[test]
    fn test_credits_missing_token_info() {
        let info = UserInfo::default();
        assert_eq!(info.credits(), Credits::new(0.0, 0.0));
        assert_eq!(info.credits().total, 0.0);
    }

    #[test]
    fn test_credits_partial_token_info() {
        let info: UserInfo =
            serde_json::from_value(json!({ "tokenInfo": { "tokenConsumed": 12.5 } })).unwrap();
        let credits = info.credits();
        assert_eq!(credits.consumed, 12.5);
        assert_eq!(credits.free, 0.0);
        assert_eq!(credits.total, -12.5);
    }

    #[test]
    fn test_user_info_tolerates_unexpected_types() {
        let info: UserInfo = serde_json::from_value(json!({
            "email": "a@b.c",
            "expireTime": 1765709429,
            "trialDays": "seven",
            "subscriptionInfo": "none",
            "tokenInfo": { "tokenConsumed": 30, "tokenFree": 100 }
        }))
        .unwrap();

        assert_eq!(info.email.as_deref(), Some("a@b.c"));
        assert_eq!(info.credits(), Credits::new(30.0, 100.0));
        assert_eq!(info.extra.get("expireTime"), Some(&json!(1765709429)));
        assert_eq!(info.extra.get("trialDays"), Some(&json!("seven")));
    }

    #[test]
    fn test_user_info_wrong_typed_read_fields_are_absent() {
        let info: UserInfo = serde_json::from_value(json!({
            "email": 7,
            "tokenInfo": { "tokenConsumed": "lots", "tokenFree": 100 }
        }))
        .unwrap();

        assert_eq!(info.email, None);
        assert_eq!(info.credits(), Credits::new(0.0, 100.0));

        let info: UserInfo = serde_json::from_value(json!({ "tokenInfo": [] })).unwrap();
        assert_eq!(info.token_info, None);
    }

    #[test]
    fn test_envelope_without_data() {
        let env: Envelope<Value> = serde_json::from_value(json!({ "errCode": 0 })).unwrap();
        assert_eq!(env.err_code, Some(0));
        assert!(env.data.is_none());
    }

    #[test]
    fn test_login_data_optional_fields() {
        let data: LoginData = serde_json::from_value(json!({ "token": "t" })).unwrap();
        assert_eq!(data.token, "t");
        assert_eq!(data.refresh_token, None);

        let data: LoginData =
            serde_json::from_value(json!({ "token": "t", "expireTime": "soon" })).unwrap();
        assert_eq!(data.expire_time, None);
    }
}
