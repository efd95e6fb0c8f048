use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cna::CnaContainer;
use super::metric::AdpContainer;

/// Root of one CVE JSON 5.x document.
///
/// Built once per input file by the mapper, consumed once by the relational
/// writer, then dropped. Every list preserves source document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CveRecord {
    pub data_type: Option<String>,
    pub data_version: Option<String>,
    pub cve_metadata: Option<CveMetadata>,
    pub containers: Option<Containers>,
}

/// Identification block of a CVE record. `cve_id` is the business key
/// (`CVE-YYYY-NNNN+`); the mapper rejects documents where it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CveMetadata {
    pub cve_id: Option<String>,
    pub assigner_org_id: Option<String>,
    pub assigner_short_name: Option<String>,
    /// Lifecycle state: RESERVED, PUBLISHED, REJECTED, ...
    pub state: Option<String>,
    #[serde(default, with = "super::ts")]
    pub date_reserved: Option<DateTime<Utc>>,
    #[serde(default, with = "super::ts")]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default, with = "super::ts")]
    pub date_updated: Option<DateTime<Utc>>,
}

/// The authoritative CNA submission plus any supplementary ADP containers.
/// A record with neither is empty, not invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Containers {
    pub cna: Option<CnaContainer>,
    pub adp: Option<Vec<AdpContainer>>,
}

/// Shared provider block carried by both CNA and ADP containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub org_id: Option<String>,
    pub short_name: Option<String>,
    #[serde(default, with = "super::ts")]
    pub date_updated: Option<DateTime<Utc>>,
}
