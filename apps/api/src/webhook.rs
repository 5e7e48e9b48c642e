//! WorkDrive upload webhook: payload shape and veteran identification.
//!
//! Uploaded files are expected to follow `First-Last_email@domain.txt`. When the
//! name carries no `_` the uploader is assumed to be the veteran.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Extensions stripped from the file name before the veteran name is read from it.
const KNOWN_EXTENSIONS: [&str; 3] = [".txt", ".pdf", ".doc"];

/// Upload notification posted by Zoho WorkDrive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub webhook_event: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub event_by_user_email_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub event_by_user_display_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub download_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub storage_info_size: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_loose_string")]
    pub file_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub uploaded_time: Option<String>,
    /// Everything WorkDrive sends that the pipeline does not use.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WebhookPayload {
    pub fn event(&self) -> &str {
        self.webhook_event.as_deref().unwrap_or("file_uploaded")
    }

    pub fn file_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown_file")
    }

    pub fn uploader_email(&self) -> &str {
        self.event_by_user_email_id
            .as_deref()
            .unwrap_or("unknown@email.com")
    }

    pub fn uploader_name(&self) -> &str {
        self.event_by_user_display_name
            .as_deref()
            .unwrap_or("Unknown User")
    }

    pub fn file_id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Every top-level key present in the payload, sorted.
    pub fn keys(&self) -> Vec<String> {
        let named = [
            ("webhook_event", self.webhook_event.is_some()),
            ("name", self.name.is_some()),
            ("event_by_user_email_id", self.event_by_user_email_id.is_some()),
            (
                "event_by_user_display_name",
                self.event_by_user_display_name.is_some(),
            ),
            ("download_url", self.download_url.is_some()),
            ("id", self.id.is_some()),
            ("storage_info_size", self.storage_info_size.is_some()),
            ("type", self.file_type.is_some()),
            ("uploaded_time", self.uploaded_time.is_some()),
        ];

        let mut keys: Vec<String> = named
            .into_iter()
            .filter(|(_, present)| *present)
            .map(|(key, _)| key.to_string())
            .chain(self.extra.keys().cloned())
            .collect();
        keys.sort();
        keys
    }
}

/// WorkDrive sends sizes, ids and timestamps as either numbers or strings.
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Who the report is for and where the records came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VeteranInfo {
    pub name: String,
    pub email: String,
    pub filename: String,
    pub download_url: String,
    pub file_id: String,
    pub file_size: String,
    pub file_type: String,
    pub uploaded_time: String,
    pub uploader_email: String,
    pub uploader_name: String,
    /// `MMDDYYYY`
    pub date: String,
    pub report_id: String,
}

impl VeteranInfo {
    /// The fixed veteran used by `/analyze-sample`.
    pub fn sample(now: DateTime<Local>) -> Self {
        Self {
            name: "James Grant".to_string(),
            email: "james.grant@example.com".to_string(),
            filename: "sample_medical_records.txt".to_string(),
            download_url: "https://example.com/sample".to_string(),
            file_id: "sample123".to_string(),
            file_size: "2.5MB".to_string(),
            file_type: "txt".to_string(),
            uploaded_time: now.format("%m/%d/%Y").to_string(),
            uploader_email: "james.grant@example.com".to_string(),
            uploader_name: "James Grant".to_string(),
            date: now.format("%m%d%Y").to_string(),
            report_id: format!("VAR-SAMPLE-{}", now.format("%Y%m%d-%H%M%S")),
        }
    }
}

/// Derives the veteran and file details from an upload notification.
pub fn extract_veteran_info(payload: &WebhookPayload, now: DateTime<Local>) -> VeteranInfo {
    let filename = payload.file_name().to_string();
    let file_type = payload
        .file_type
        .clone()
        .unwrap_or_else(|| "unknown".to_string());
    let uploader_email = payload.uploader_email().to_string();
    let uploader_name = payload.uploader_name().to_string();

    let stem = file_stem(&filename, &file_type);
    let (name, email) = match stem.split_once('_') {
        Some((name_part, rest)) => {
            let email_part = rest.split('_').next().unwrap_or_default();
            let email = if email_part.contains('@') {
                email_part.to_string()
            } else {
                uploader_email.clone()
            };
            (title_case(&name_part.replace('-', " ").replace("%20", " ")), email)
        }
        None => (uploader_name.clone(), uploader_email.clone()),
    };

    VeteranInfo {
        name,
        email,
        filename,
        download_url: payload.download_url.clone().unwrap_or_default(),
        file_id: payload.file_id().to_string(),
        file_size: payload
            .storage_info_size
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        file_type,
        uploaded_time: payload
            .uploaded_time
            .clone()
            .unwrap_or_else(|| now.format("%m/%d/%Y").to_string()),
        uploader_email,
        uploader_name,
        date: now.format("%m%d%Y").to_string(),
        report_id: report_id(payload.file_id(), now),
    }
}

/// `VAR-YYYYMMDD-<first 8 chars of the file id>`, or the time of day when there is no id.
pub fn report_id(file_id: &str, now: DateTime<Local>) -> String {
    let suffix: String = if file_id.is_empty() {
        now.format("%H%M%S").to_string()
    } else {
        file_id.chars().take(8).collect()
    };
    format!("VAR-{}-{}", now.format("%Y%m%d"), suffix)
}

fn file_stem(filename: &str, file_type: &str) -> String {
    let mut stem = filename.replace(&format!(".{file_type}"), "");
    for ext in KNOWN_EXTENSIONS {
        stem = stem.replace(ext, "");
    }
    stem
}

/// Capitalizes the first letter of each word and lowercases the rest.
fn title_case(raw: &str) -> String {
    raw.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary returned by `/webhook-test`: what arrived, without running the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadInspection {
    pub webhook_event: String,
    pub file_info: FileInfo,
    pub user_info: UserInfo,
    pub payload_analysis: PayloadAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub id: String,
    pub size: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadAnalysis {
    pub download_url_present: bool,
    pub payload_keys: Vec<String>,
    pub payload_size_bytes: usize,
}

pub fn inspect(payload: &WebhookPayload, raw: &Value) -> PayloadInspection {
    let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| "unknown".to_string());

    PayloadInspection {
        webhook_event: or_unknown(&payload.webhook_event),
        file_info: FileInfo {
            name: or_unknown(&payload.name),
            id: or_unknown(&payload.id),
            size: or_unknown(&payload.storage_info_size),
            file_type: or_unknown(&payload.file_type),
        },
        user_info: UserInfo {
            email: or_unknown(&payload.event_by_user_email_id),
            name: or_unknown(&payload.event_by_user_display_name),
        },
        payload_analysis: PayloadAnalysis {
            download_url_present: payload
                .download_url
                .as_deref()
                .is_some_and(|url| !url.is_empty()),
            payload_keys: payload.keys(),
            payload_size_bytes: raw.to_string().len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn payload(value: Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_name_and_email_from_filename() {
        let p = payload(json!({
            "name": "john-doe_john.doe@example.com.txt",
            "type": "txt",
            "id": "abcdef1234567890",
            "event_by_user_email_id": "staff@vetletters.com",
            "event_by_user_display_name": "Staff Member",
            "download_url": "https://workdrive.zoho.com/download/abc"
        }));
        let info = extract_veteran_info(&p, fixed_now());
        assert_eq!(info.name, "John Doe");
        assert_eq!(info.email, "john.doe@example.com");
        assert_eq!(info.uploader_email, "staff@vetletters.com");
        assert_eq!(info.report_id, "VAR-20250314-abcdef12");
        assert_eq!(info.date, "03142025");
    }

    #[test]
    fn test_second_segment_without_at_falls_back_to_uploader() {
        let p = payload(json!({
            "name": "mary%20smith_records.pdf",
            "type": "pdf",
            "event_by_user_email_id": "mary@example.com"
        }));
        let info = extract_veteran_info(&p, fixed_now());
        assert_eq!(info.name, "Mary Smith");
        assert_eq!(info.email, "mary@example.com");
    }

    #[test]
    fn test_no_underscore_uses_uploader() {
        let p = payload(json!({
            "name": "records.txt",
            "event_by_user_email_id": "vet@example.com",
            "event_by_user_display_name": "Pat Veteran"
        }));
        let info = extract_veteran_info(&p, fixed_now());
        assert_eq!(info.name, "Pat Veteran");
        assert_eq!(info.email, "vet@example.com");
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let info = extract_veteran_info(&WebhookPayload::default(), fixed_now());
        assert_eq!(info.filename, "unknown_file");
        // "unknown_file" splits into name "unknown" and a non-email segment
        assert_eq!(info.name, "Unknown");
        assert_eq!(info.email, "unknown@email.com");
        assert_eq!(info.file_size, "unknown");
        assert_eq!(info.uploaded_time, "03/14/2025");
        assert_eq!(info.report_id, "VAR-20250314-092653");
    }

    #[test]
    fn test_numeric_size_accepted() {
        let p = payload(json!({ "storage_info_size": 2048 }));
        assert_eq!(p.storage_info_size.as_deref(), Some("2048"));
    }

    #[test]
    fn test_numeric_id_and_upload_time_accepted() {
        let p = payload(json!({
            "name": "john-doe_j@x.com.txt",
            "id": 987654321012_u64,
            "uploaded_time": 1710412013000_u64,
            "type": null
        }));
        assert_eq!(p.id.as_deref(), Some("987654321012"));
        assert_eq!(p.uploaded_time.as_deref(), Some("1710412013000"));
        assert!(p.file_type.is_none());

        let info = extract_veteran_info(&p, fixed_now());
        assert_eq!(info.name, "John Doe");
        assert_eq!(info.uploaded_time, "1710412013000");
        assert_eq!(info.report_id, "VAR-20250314-98765432");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jOHN  doe"), "John  Doe");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_inspect_reports_keys_and_url() {
        let raw = json!({
            "webhook_event": "file_uploaded",
            "name": "a_b@c.txt",
            "download_url": "https://example.com/f",
            "resource_id": "xyz"
        });
        let p = payload(raw.clone());
        let report = inspect(&p, &raw);
        assert_eq!(report.webhook_event, "file_uploaded");
        assert!(report.payload_analysis.download_url_present);
        assert_eq!(
            report.payload_analysis.payload_keys,
            vec!["download_url", "name", "resource_id", "webhook_event"]
        );
        assert_eq!(report.file_info.id, "unknown");
    }

    #[test]
    fn test_sample_veteran() {
        let info = VeteranInfo::sample(fixed_now());
        assert_eq!(info.name, "James Grant");
        assert_eq!(info.report_id, "VAR-SAMPLE-20250314-092653");
    }
}
