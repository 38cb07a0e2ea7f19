//! Saved batch-query responses from the user-lookup API.
//!
//! The API itself is never called here; this models the JSON it returns (an
//! `info` array of user records with nested `loginInfo` and `thirdpartyList`)
//! and renders a plain-text summary of the first record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::{PbsiftError, Result};

const NOT_AVAILABLE: &str = "N/A";
const DOES_NOT_EXIST: &str = "Does Not Exist";

/// Labels the API returns untranslated.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("普通账号", "Regular Account"),
    ("不存在", DOES_NOT_EXIST),
    ("印度", "India"),
    ("男", "Male"),
    ("女", "Female"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchQueryResponse {
    #[serde(default)]
    pub info: Vec<UserRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub uuid: Option<Json>,
    #[serde(default)]
    pub vid: Option<Json>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub enabled: Option<Json>,
    #[serde(default)]
    pub mobile: Option<Json>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub real_country: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub device: Option<Json>,
    #[serde(default)]
    pub birthday: Option<Json>,
    #[serde(default)]
    pub create_date: Option<Json>,
    #[serde(default)]
    pub login_info: Option<LoginInfo>,
    #[serde(default)]
    pub thirdparty_list: Option<Vec<ThirdPartyAccount>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginInfo {
    #[serde(default, rename = "appDate")]
    pub app_date: Option<Json>,
    #[serde(default, rename = "appIP")]
    pub app_ip: Option<String>,
    #[serde(default, rename = "webDate")]
    pub web_date: Option<Json>,
    #[serde(default, rename = "webIP")]
    pub web_ip: Option<String>,
    #[serde(default, rename = "appDevID")]
    pub app_dev_id: Option<String>,
}

impl LoginInfo {
    fn is_empty(&self) -> bool {
        self == &LoginInfo::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyAccount {
    #[serde(default)]
    pub thirdparty_type: Option<String>,
    #[serde(default)]
    pub open_id: Option<String>,
}

impl BatchQueryResponse {
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| PbsiftError::BadInput(format!("invalid lookup response json: {e}")))
    }

    /// First record, unless the API reported it as missing.
    pub fn found_user(&self) -> Option<&UserRecord> {
        self.info.first().filter(|u| u.exists())
    }
}

impl UserRecord {
    pub fn exists(&self) -> bool {
        self.account_type.as_deref().map(translate) != Some(DOES_NOT_EXIST)
    }

    pub fn is_enabled(&self) -> bool {
        match &self.enabled {
            Some(Json::Bool(b)) => *b,
            Some(Json::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Json::String(s)) => !s.is_empty(),
            _ => false,
        }
    }

    /// Plain-text report of the record.
    pub fn summary(&self) -> String {
        UserSummary(self).to_string()
    }
}

/// `Display` view of a record's plain-text report.
#[derive(Debug, Clone, Copy)]
pub struct UserSummary<'a>(pub &'a UserRecord);

impl fmt::Display for UserSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.0;
        writeln!(f, "{}", user.nick.as_deref().unwrap_or(NOT_AVAILABLE))?;
        writeln!(f, "  VID:          {}", display(&user.vid))?;
        writeln!(f, "  UUID:         {}", display(&user.uuid))?;
        let status = if user.is_enabled() { "Enabled" } else { "Disabled" };
        writeln!(f, "  Status:       {status}")?;
        writeln!(f, "  Mobile:       {}", display(&user.mobile))?;
        writeln!(
            f,
            "  Account Type: {}",
            user.account_type.as_deref().map_or(NOT_AVAILABLE, translate)
        )?;
        let country = user.country.as_deref().map_or(NOT_AVAILABLE, translate);
        let real_country = user
            .real_country
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_uppercase();
        writeln!(f, "  Country:      {country} ({real_country})")?;
        writeln!(
            f,
            "  Gender:       {}",
            user.sex.as_deref().map_or(NOT_AVAILABLE, translate)
        )?;
        writeln!(f, "  Device:       {}", display(&user.device))?;
        writeln!(f, "  Birthday:     {}", display(&user.birthday))?;
        writeln!(f, "  Created:      {}", format_timestamp(user.create_date.as_ref()))?;

        if let Some(login) = user.login_info.as_ref().filter(|l| !l.is_empty()) {
            writeln!(f, "Login Activity")?;
            writeln!(f, "  Last App Login: {}", format_timestamp(login.app_date.as_ref()))?;
            writeln!(f, "  App IP:         {}", text_or_na(&login.app_ip))?;
            writeln!(f, "  Last Web Login: {}", format_timestamp(login.web_date.as_ref()))?;
            writeln!(f, "  Web IP:         {}", text_or_na(&login.web_ip))?;
            if let Some(dev) = login.app_dev_id.as_deref().filter(|s| !s.is_empty()) {
                writeln!(f, "  Device ID:      {dev}")?;
            }
        }

        let accounts = user.thirdparty_list.as_deref().unwrap_or_default();
        if !accounts.is_empty() {
            writeln!(f, "Linked Third-Party Accounts ({})", accounts.len())?;
            for acc in accounts {
                let kind = acc
                    .thirdparty_type
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| "Unknown".to_string(), title_case);
                writeln!(f, "  {kind}: {}", text_or_na(&acc.open_id))?;
            }
        }
        Ok(())
    }
}

/// English label for a known API label; anything else unchanged.
pub fn translate(text: &str) -> &str {
    TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == text)
        .map_or(text, |(_, to)| *to)
}

/// Epoch seconds as `YYYY-MM-DD hh:mm:ss AM` (UTC); other values verbatim.
pub fn format_timestamp(value: Option<&Json>) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour repr:12]:[minute]:[second] [period]");
    match value {
        None | Some(Json::Null) => NOT_AVAILABLE.to_string(),
        Some(Json::String(s)) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Json::String(s)) => s.clone(),
        Some(Json::Number(n)) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
            secs.and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok())
                .and_then(|dt| dt.format(&fmt).ok())
                .unwrap_or_else(|| n.to_string())
        }
        Some(other) => other.to_string(),
    }
}

fn display(value: &Option<Json>) -> String {
    match value {
        None | Some(Json::Null) => NOT_AVAILABLE.to_string(),
        Some(Json::String(s)) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Json::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn text_or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start = false;
        } else {
            out.push(c);
            start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn translates_known_labels_only() {
        assert_eq!(translate("男"), "Male");
        assert_eq!(translate("other"), "other");
    }

    #[test]
    fn missing_user_is_not_found() {
        let resp: BatchQueryResponse =
            serde_json::from_value(json!({"info": [{"type": "不存在"}]})).unwrap();
        assert!(resp.found_user().is_none());

        let empty: BatchQueryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.found_user().is_none());
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(Some(&json!(0))), "1970-01-01 12:00:00 AM");
        assert_eq!(format_timestamp(Some(&json!(1700000000))), "2023-11-14 10:13:20 PM");
        assert_eq!(format_timestamp(Some(&json!(""))), "N/A");
        assert_eq!(format_timestamp(None), "N/A");
        assert_eq!(format_timestamp(Some(&json!("2024-01-01"))), "2024-01-01");
        assert_eq!(format_timestamp(Some(&json!(1700000000000000i64))), "1700000000000000");
    }

    #[test]
    fn summary_view_formats_like_summary() {
        let user: UserRecord =
            serde_json::from_value(json!({"nick": "eve", "sex": "男", "enabled": true})).unwrap();
        let text = format!("{}", UserSummary(&user));
        assert_eq!(text, user.summary());
        assert!(text.starts_with("eve\n  VID:          N/A\n"));
        assert!(text.contains("  Gender:       Male\n"));
        assert!(text.contains("  Status:       Enabled\n"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("GOOGLE"), "Google");
        assert_eq!(title_case("apple id"), "Apple Id");
    }
}
