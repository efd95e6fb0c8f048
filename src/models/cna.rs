use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metric::Metric;
use super::record::ProviderMetadata;

/// The CNA container holds the primary content of a CVE record: affected
/// products, descriptions, scoring metrics, timeline, credits and references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnaContainer {
    pub provider_metadata: Option<ProviderMetadata>,
    pub title: Option<String>,
    pub problem_types: Option<Vec<ProblemType>>,
    pub affected: Option<Vec<Affected>>,
    pub descriptions: Option<Vec<Description>>,
    pub metrics: Option<Vec<Metric>>,
    pub timeline: Option<Vec<TimelineEntry>>,
    pub credits: Option<Vec<Credit>>,
    pub references: Option<Vec<Reference>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemType {
    pub descriptions: Option<Vec<ProblemTypeDescription>>,
}

/// Language-tagged CWE classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTypeDescription {
    pub cwe_id: Option<String>,
    pub description: Option<String>,
    pub lang: Option<String>,
    pub r#type: Option<String>,
}

/// One affected product and the versions/modules it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affected {
    pub vendor: Option<String>,
    pub product: Option<String>,
    pub default_status: Option<String>,
    pub versions: Option<Vec<VersionEntry>>,
    pub modules: Option<Vec<String>>,
}

/// A version string or range bound with its status and versioning scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: Option<String>,
    /// "affected" or "unaffected"
    pub status: Option<String>,
    pub less_than: Option<String>,
    pub less_than_or_equal: Option<String>,
    pub version_type: Option<String>,
}

/// Free-text description, optionally with supporting media attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub lang: Option<String>,
    pub value: Option<String>,
    pub supporting_media: Option<Vec<SupportingMedia>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingMedia {
    pub lang: Option<String>,
    pub r#type: Option<String>,
    #[serde(default)]
    pub base64: bool,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(default, with = "super::ts")]
    pub time: Option<DateTime<Utc>>,
    pub lang: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub lang: Option<String>,
    pub r#type: Option<String>,
    pub value: Option<String>,
}

/// External reference: a URL, an optional display name, and free-text tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub url: Option<String>,
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}
