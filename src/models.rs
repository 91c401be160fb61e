use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{AppError, AppResult};

// --- Status ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheaterStatus {
    #[default]
    Flagged,
    Cleared,
    UnderReview,
}

impl CheaterStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "flagged" => Some(Self::Flagged),
            "cleared" => Some(Self::Cleared),
            "under_review" => Some(Self::UnderReview),
            _ => None,
        }
    }
}

// --- Stored document ---

/// A cheater record as it lives in the collection. `id` is absent on the
/// insert path and store-assigned afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cheater {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_by: Option<String>,
    #[serde(default)]
    pub status: CheaterStatus,
}

// --- Outbound view ---

/// API-facing record: identical fields, but the store-native id rendered as
/// a plain string. Every record leaving the query/insert boundary goes
/// through this conversion.
#[derive(Debug, Serialize)]
pub struct CheaterRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_by: Option<String>,
    pub status: CheaterStatus,
}

impl From<Cheater> for CheaterRecord {
    fn from(cheater: Cheater) -> Self {
        Self {
            id: cheater.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            subject_id: cheater.subject_id,
            display_name: cheater.display_name,
            reason: cheater.reason,
            evidence_url: cheater.evidence_url,
            flagged_by: cheater.flagged_by,
            status: cheater.status,
        }
    }
}

// --- Create request ---

/// Untyped-ish inbound payload: every field optional so that validation, not
/// deserialization, decides what is acceptable.
#[derive(Debug, Deserialize)]
pub struct CreateCheaterRequest {
    pub subject_id: Option<String>,
    pub display_name: Option<String>,
    pub reason: Option<String>,
    pub evidence_url: Option<String>,
    pub flagged_by: Option<String>,
    pub status: Option<String>,
}

impl CreateCheaterRequest {
    /// Field-level validation producing a storable record, with `status`
    /// defaulted when absent. Runs before any store interaction.
    pub fn validate(self) -> AppResult<Cheater> {
        let subject_id = match self.subject_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AppError::validation("subject_id is required and must be non-empty")),
        };

        let status = match self.status.as_deref() {
            None => CheaterStatus::default(),
            Some(raw) => CheaterStatus::parse(raw).ok_or_else(|| {
                AppError::validation(format!(
                    "invalid status '{raw}': must be one of flagged, cleared, under_review"
                ))
            })?,
        };

        if let Some(raw) = self.evidence_url.as_deref() {
            let parsed = Url::parse(raw).map_err(|_| {
                AppError::validation(format!("evidence_url '{raw}' is not a valid URL"))
            })?;
            if !parsed.has_host() {
                return Err(AppError::validation(format!(
                    "evidence_url '{raw}' must include a host"
                )));
            }
        }

        Ok(Cheater {
            id: None,
            subject_id,
            display_name: self.display_name,
            reason: self.reason,
            evidence_url: self.evidence_url,
            flagged_by: self.flagged_by,
            status,
        })
    }
}

// --- Query filter ---

/// Optional exact-match constraints, ANDed together. Blank values are
/// treated as absent, so `?status=` does not constrain the lookup.
#[derive(Debug, Default, Deserialize)]
pub struct CheaterFilter {
    pub subject_id: Option<String>,
    pub display_name: Option<String>,
    pub status: Option<String>,
}

impl CheaterFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        for (key, value) in [
            ("subject_id", &self.subject_id),
            ("display_name", &self.display_name),
            ("status", &self.status),
        ] {
            if let Some(value) = value {
                if !value.is_empty() {
                    filter.insert(key, value.clone());
                }
            }
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> CreateCheaterRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn rejects_missing_subject_id() {
        let err = payload(r#"{"reason": "aimbot"}"#).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("subject_id")));
    }

    #[test]
    fn rejects_empty_subject_id() {
        let err = payload(r#"{"subject_id": ""}"#).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_status() {
        let err = payload(r#"{"subject_id": "123", "status": "banned"}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("banned")));
    }

    #[test]
    fn defaults_status_to_flagged() {
        let cheater = payload(r#"{"subject_id": "123", "reason": "aimbot"}"#)
            .validate()
            .unwrap();
        assert_eq!(cheater.status, CheaterStatus::Flagged);
        assert!(cheater.id.is_none());
    }

    #[test]
    fn rejects_malformed_evidence_url() {
        let err = payload(r#"{"subject_id": "123", "evidence_url": "not a url"}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("evidence_url")));
    }

    #[test]
    fn rejects_evidence_url_without_host() {
        let err = payload(r#"{"subject_id": "123", "evidence_url": "mailto:mod@example.com"}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("host")));
    }

    #[test]
    fn accepts_full_payload() {
        let cheater = payload(
            r#"{
                "subject_id": "123",
                "display_name": "player#0001",
                "reason": "aimbot",
                "evidence_url": "https://clips.example.com/abc",
                "flagged_by": "mod-team",
                "status": "under_review"
            }"#,
        )
        .validate()
        .unwrap();

        assert_eq!(cheater.subject_id, "123");
        assert_eq!(cheater.evidence_url.as_deref(), Some("https://clips.example.com/abc"));
        assert_eq!(cheater.status, CheaterStatus::UnderReview);
    }

    #[test]
    fn status_serializes_snake_case() {
        let value = serde_json::to_value(CheaterStatus::UnderReview).unwrap();
        assert_eq!(value, "under_review");
    }

    #[test]
    fn record_renders_hex_id() {
        let oid = ObjectId::new();
        let record = CheaterRecord::from(Cheater {
            id: Some(oid),
            subject_id: "123".into(),
            display_name: None,
            reason: Some("aimbot".into()),
            evidence_url: None,
            flagged_by: None,
            status: CheaterStatus::Flagged,
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], oid.to_hex());
        assert_eq!(value["subject_id"], "123");
        assert_eq!(value["status"], "flagged");
        // Absent optionals stay absent rather than serializing as null.
        assert!(value.get("display_name").is_none());
    }

    #[test]
    fn filter_document_contains_only_supplied_fields() {
        let filter = CheaterFilter {
            subject_id: Some("123".into()),
            display_name: None,
            status: Some("flagged".into()),
        };
        let doc = filter.to_document();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get_str("subject_id").unwrap(), "123");
        assert_eq!(doc.get_str("status").unwrap(), "flagged");
    }

    #[test]
    fn empty_filter_builds_empty_document() {
        assert!(CheaterFilter::default().to_document().is_empty());
    }

    #[test]
    fn blank_filter_values_are_skipped() {
        let filter = CheaterFilter {
            subject_id: None,
            display_name: None,
            status: Some(String::new()),
        };
        assert!(filter.to_document().is_empty());
    }
}
