use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Deserialize;

use crate::error::Result;
use crate::models::prompt::PromptKind;
use crate::services::content_service::ContentService;
use crate::services::user_service::UserService;
use crate::utils::time::{from_rfc3339, ist_offset};

#[derive(Debug, Deserialize)]
struct LegacyUsers {
    #[serde(default)]
    users: Vec<LegacyUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUser {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    last_login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyWords {
    #[serde(default)]
    words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyScenarios {
    #[serde(default)]
    scenarios: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: usize,
    pub words: usize,
    pub scenarios: usize,
}

/// Merges `user_creds.json`, `wat_list.json` and `srt_list.json` from `dir`.
/// Missing files are skipped.
pub async fn import_legacy_data(
    dir: &Path,
    users: &UserService,
    content: &ContentService,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    if let Some(legacy) = read_json::<LegacyUsers>(&dir.join("user_creds.json")).await? {
        for user in legacy.users {
            let last_login = user.last_login.as_deref().and_then(legacy_timestamp);
            let imported = users
                .import(&user.username, &user.email, &user.password, user.is_admin, last_login)
                .await?;
            if imported.is_some() {
                summary.users += 1;
            }
        }
    }

    if let Some(legacy) = read_json::<LegacyWords>(&dir.join("wat_list.json")).await? {
        summary.words = content.merge_texts(PromptKind::Wat, &legacy.words).await?.added.len();
    }

    if let Some(legacy) = read_json::<LegacyScenarios>(&dir.join("srt_list.json")).await? {
        summary.scenarios = content
            .merge_texts(PromptKind::Srt, &legacy.scenarios)
            .await?
            .added
            .len();
    }

    tracing::info!(
        dir = %dir.display(),
        users = summary.users,
        words = summary.words,
        scenarios = summary.scenarios,
        "legacy data imported"
    );
    Ok(summary)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "legacy file not present");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Legacy timestamps carry IST wall-clock time behind a `Z` suffix.
fn legacy_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    match from_rfc3339(raw) {
        Ok(parsed) => ist_offset()
            .from_local_datetime(&parsed.naive_utc())
            .single(),
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "ignoring unparsable legacy lastLogin");
            None
        }
    }
}
