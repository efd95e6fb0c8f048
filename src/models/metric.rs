use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use super::record::ProviderMetadata;

/// One CNA scoring metric. The four CVSS slots are mutually exclusive in
/// practice; at most one is expected to be populated per instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metric {
    #[serde(rename = "cvssV2_0")]
    pub cvss_v2_0: Option<CvssScore>,
    #[serde(rename = "cvssV3_0")]
    pub cvss_v3_0: Option<CvssScore>,
    #[serde(rename = "cvssV3_1")]
    pub cvss_v3_1: Option<CvssScore>,
    #[serde(rename = "cvssV4_0")]
    pub cvss_v4_0: Option<CvssScore>,
}

impl Metric {
    /// The populated CVSS payload, newest version first when a document
    /// carries more than one.
    pub fn populated(&self) -> Option<CvssSlot<'_>> {
        if let Some(score) = &self.cvss_v4_0 {
            return Some(CvssSlot::V4_0(score));
        }
        if let Some(score) = &self.cvss_v3_1 {
            return Some(CvssSlot::V3_1(score));
        }
        if let Some(score) = &self.cvss_v3_0 {
            return Some(CvssSlot::V3_0(score));
        }
        if let Some(score) = &self.cvss_v2_0 {
            return Some(CvssSlot::V2_0(score));
        }
        None
    }
}

/// Which CVSS child table a metric row feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CvssSlot<'a> {
    V2_0(&'a CvssScore),
    V3_0(&'a CvssScore),
    V3_1(&'a CvssScore),
    V4_0(&'a CvssScore),
}

/// Common shape of all four CVSS versions. `base_severity` is absent for
/// v2.0, which predates severity bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssScore {
    pub version: Option<String>,
    #[serde(default)]
    pub base_score: f64,
    pub vector_string: Option<String>,
    pub base_severity: Option<String>,
}

/// Supplementary container from an Authorized Data Publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdpContainer {
    pub title: Option<String>,
    pub provider_metadata: Option<ProviderMetadata>,
    pub metrics: Option<Vec<AdpMetric>>,
}

/// An ADP metric: either a CVSS payload or an "other" scoring scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdpMetric {
    #[serde(rename = "cvssV2_0")]
    pub cvss_v2_0: Option<CvssScore>,
    #[serde(rename = "cvssV3_0")]
    pub cvss_v3_0: Option<CvssScore>,
    #[serde(rename = "cvssV3_1")]
    pub cvss_v3_1: Option<CvssScore>,
    #[serde(rename = "cvssV4_0")]
    pub cvss_v4_0: Option<CvssScore>,
    pub other: Option<OtherMetric>,
}

/// Closed union over the "other" metric payload, decided by the `type`
/// discriminator. Anything that is not SSVC decodes to `Unknown` and its
/// content is discarded without failing the document.
#[derive(Debug, Clone, PartialEq)]
pub enum OtherMetric {
    Ssvc(Ssvc),
    Unknown,
}

impl<'de> Deserialize<'de> for OtherMetric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Two-pass decode: read the discriminator first, then the matching
        // variant. Unknown tags must not fail the whole document.
        let raw = serde_json::Value::deserialize(deserializer)?;
        let tag = raw.get("type").and_then(serde_json::Value::as_str).unwrap_or("");
        if !tag.eq_ignore_ascii_case("ssvc") {
            return Ok(OtherMetric::Unknown);
        }
        let content = match raw.get("content") {
            Some(value) if !value.is_null() => {
                Some(serde_json::from_value(value.clone()).map_err(serde::de::Error::custom)?)
            }
            _ => None,
        };
        Ok(OtherMetric::Ssvc(Ssvc {
            metric_type: tag.to_string(),
            content,
        }))
    }
}

impl Serialize for OtherMetric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            OtherMetric::Ssvc(ssvc) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &ssvc.metric_type)?;
                map.serialize_entry("content", &ssvc.content)?;
                map.end()
            }
            OtherMetric::Unknown => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// SSVC scoring payload: the raw tag plus the structured content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ssvc {
    pub metric_type: String,
    pub content: Option<SsvcContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsvcContent {
    pub id: Option<String>,
    #[serde(default, with = "super::ts")]
    pub timestamp: Option<DateTime<Utc>>,
    pub options: Option<Vec<SsvcOption>>,
    pub role: Option<String>,
    pub version: Option<String>,
}

/// One SSVC decision option. Feeds are inconsistent about key casing, so
/// both the capitalized and lowercase spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsvcOption {
    #[serde(alias = "Exploitation")]
    pub exploitation: Option<String>,
    #[serde(alias = "Automatable")]
    pub automatable: Option<String>,
    #[serde(rename = "Technical Impact", alias = "technicalImpact")]
    pub technical_impact: Option<String>,
}
