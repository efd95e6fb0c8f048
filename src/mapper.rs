use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;

use crate::error::MapError;
use crate::models::{CveRecord, OtherMetric};

/// Floor of common SQL datetime columns. Anything earlier is clamped here.
static SQL_DATETIME_MIN: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(1753, 1, 1, 0, 0, 0).unwrap());

/// Ceiling of common SQL datetime columns.
static SQL_DATETIME_MAX: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap());

/// Parses raw CVE JSON 5.x documents into the typed record model.
pub struct CveMapper;

impl CveMapper {
    /// Read and map one document. Never moves or deletes the file; routing
    /// failures to quarantine is the batch driver's job.
    pub fn map_file(path: &Path) -> Result<CveRecord, MapError> {
        let raw = fs::read_to_string(path)?;
        Self::parse_record(&raw)
    }

    /// Parse, validate and normalize a document already read into memory.
    pub fn parse_record(raw: &str) -> Result<CveRecord, MapError> {
        let mut record: CveRecord = serde_json::from_str(raw)?;

        let has_cve_id = record
            .cve_metadata
            .as_ref()
            .and_then(|metadata| metadata.cve_id.as_deref())
            .is_some_and(|id| !id.trim().is_empty());
        if !has_cve_id {
            return Err(MapError::MissingMetadata);
        }

        normalize(&mut record);
        Ok(record)
    }
}

/// Clamp every timestamp in the record into the representable range of the
/// target store. Out-of-range values are a data-quality problem in the feed,
/// not an error: they are pinned to the boundary and logged.
fn normalize(record: &mut CveRecord) {
    if let Some(metadata) = record.cve_metadata.as_mut() {
        clamp_field(&mut metadata.date_reserved, "cveMetadata.dateReserved");
        clamp_field(&mut metadata.date_published, "cveMetadata.datePublished");
        clamp_field(&mut metadata.date_updated, "cveMetadata.dateUpdated");
    }

    let Some(containers) = record.containers.as_mut() else {
        return;
    };

    if let Some(cna) = containers.cna.as_mut() {
        if let Some(provider) = cna.provider_metadata.as_mut() {
            clamp_field(&mut provider.date_updated, "cna.providerMetadata.dateUpdated");
        }
        if let Some(timeline) = cna.timeline.as_mut() {
            for entry in timeline.iter_mut() {
                clamp_field(&mut entry.time, "cna.timeline.time");
            }
        }
    }

    if let Some(adps) = containers.adp.as_mut() {
        for adp in adps.iter_mut() {
            if let Some(provider) = adp.provider_metadata.as_mut() {
                clamp_field(&mut provider.date_updated, "adp.providerMetadata.dateUpdated");
            }
            let Some(metrics) = adp.metrics.as_mut() else {
                continue;
            };
            for metric in metrics.iter_mut() {
                if let Some(OtherMetric::Ssvc(ssvc)) = metric.other.as_mut() {
                    if let Some(content) = ssvc.content.as_mut() {
                        clamp_field(&mut content.timestamp, "adp.ssvc.content.timestamp");
                    }
                }
            }
        }
    }
}

fn clamp_field(slot: &mut Option<DateTime<Utc>>, field: &str) {
    if let Some(stamp) = *slot {
        let clamped = clamp_timestamp(stamp);
        if clamped != stamp {
            warn!("clamped out-of-range timestamp {field}: {stamp} -> {clamped}");
            *slot = Some(clamped);
        }
    }
}

/// Pin a timestamp into `[1753-01-01T00:00:00Z, 9999-12-31T23:59:59Z]`.
pub fn clamp_timestamp(stamp: DateTime<Utc>) -> DateTime<Utc> {
    stamp.clamp(*SQL_DATETIME_MIN, *SQL_DATETIME_MAX)
}
