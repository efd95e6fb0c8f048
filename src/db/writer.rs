use tracing::{debug, warn};

use crate::error::WriteError;
use crate::models::{
    Affected, AdpContainer, CnaContainer, CveMetadata, CveRecord, CvssSlot, Description, Metric,
    OtherMetric, ProviderMetadata, Reference, Ssvc,
};

use super::connection::{DbPool, DbTransaction, SqlArg};

/// Persist one CVE record as a single all-or-nothing transaction.
///
/// The insert sequence is a depth-first walk of the record tree: a child row
/// is never written before its parent's surrogate key is known. Any failure
/// rolls back the whole record so no partial rows survive.
pub async fn insert_record(pool: &DbPool, record: &CveRecord) -> Result<(), WriteError> {
    let mut tx = pool.begin().await?;
    match write_record(&mut tx, record).await {
        Ok(()) => {
            tx.commit().await?;
            Ok(())
        }
        Err(source) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("rollback failed after write error: {rollback_err}");
            }
            Err(source.into())
        }
    }
}

async fn write_record(tx: &mut DbTransaction, record: &CveRecord) -> Result<(), sqlx::Error> {
    let metadata_id = match &record.cve_metadata {
        Some(metadata) => {
            debug!("writing record {}", metadata.cve_id.as_deref().unwrap_or("?"));
            Some(insert_metadata(tx, metadata).await?)
        }
        None => None,
    };

    let root_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_root_cve (cve_metadata_id, data_type, data_version) \
             VALUES ($1, $2, $3)",
            &[
                SqlArg::opt_id(metadata_id),
                SqlArg::text(&record.data_type),
                SqlArg::text(&record.data_version),
            ],
        )
        .await?;

    let Some(containers) = &record.containers else {
        return Ok(());
    };

    let containers_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_containers (root_cve_id) VALUES ($1)",
            &[SqlArg::id(root_id)],
        )
        .await?;

    if let Some(cna) = &containers.cna {
        let cna_id = insert_cna_container(tx, cna, containers_id).await?;
        tx.execute(
            "UPDATE tbl_containers SET cna_id = $1 WHERE id = $2",
            &[SqlArg::id(cna_id), SqlArg::id(containers_id)],
        )
        .await?;
        insert_cna_children(tx, cna, cna_id).await?;
    }

    if let Some(adps) = &containers.adp {
        for adp in adps {
            insert_adp_container(tx, adp, containers_id).await?;
        }
    }

    Ok(())
}

async fn insert_metadata(tx: &mut DbTransaction, metadata: &CveMetadata) -> Result<i64, sqlx::Error> {
    tx.insert_returning_id(
        "INSERT INTO tbl_cve_metadata \
         (cve_id, assigner_org_id, assigner_short_name, state, date_reserved, date_published, date_updated) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
        &[
            SqlArg::text(&metadata.cve_id),
            SqlArg::text(&metadata.assigner_org_id),
            SqlArg::text(&metadata.assigner_short_name),
            SqlArg::text(&metadata.state),
            SqlArg::timestamp(metadata.date_reserved),
            SqlArg::timestamp(metadata.date_published),
            SqlArg::timestamp(metadata.date_updated),
        ],
    )
    .await
}

async fn insert_provider_metadata(
    tx: &mut DbTransaction,
    provider: &Option<ProviderMetadata>,
) -> Result<Option<i64>, sqlx::Error> {
    let Some(provider) = provider else {
        return Ok(None);
    };
    let id = tx
        .insert_returning_id(
            "INSERT INTO tbl_provider_metadata (org_id, short_name, date_updated) \
             VALUES ($1, $2, $3)",
            &[
                SqlArg::text(&provider.org_id),
                SqlArg::text(&provider.short_name),
                SqlArg::timestamp(provider.date_updated),
            ],
        )
        .await?;
    Ok(Some(id))
}

async fn insert_cna_container(
    tx: &mut DbTransaction,
    cna: &CnaContainer,
    containers_id: i64,
) -> Result<i64, sqlx::Error> {
    let provider_metadata_id = insert_provider_metadata(tx, &cna.provider_metadata).await?;
    tx.insert_returning_id(
        "INSERT INTO tbl_cna_container (containers_id, provider_metadata_id, title) \
         VALUES ($1, $2, $3)",
        &[
            SqlArg::id(containers_id),
            SqlArg::opt_id(provider_metadata_id),
            SqlArg::text(&cna.title),
        ],
    )
    .await
}

async fn insert_cna_children(
    tx: &mut DbTransaction,
    cna: &CnaContainer,
    cna_id: i64,
) -> Result<(), sqlx::Error> {
    if let Some(affected) = &cna.affected {
        for product in affected {
            insert_affected(tx, product, cna_id).await?;
        }
    }

    if let Some(descriptions) = &cna.descriptions {
        for description in descriptions {
            insert_description(tx, description, cna_id).await?;
        }
    }

    if let Some(metrics) = &cna.metrics {
        for metric in metrics {
            insert_metric(tx, metric, cna_id).await?;
        }
    }

    if let Some(timeline) = &cna.timeline {
        for entry in timeline {
            tx.execute(
                "INSERT INTO tbl_timeline_entry (cna_id, time, lang, value) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    SqlArg::id(cna_id),
                    SqlArg::timestamp(entry.time),
                    SqlArg::text(&entry.lang),
                    SqlArg::text(&entry.value),
                ],
            )
            .await?;
        }
    }

    if let Some(credits) = &cna.credits {
        for credit in credits {
            tx.execute(
                "INSERT INTO tbl_credit (cna_id, lang, credit_type, value) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    SqlArg::id(cna_id),
                    SqlArg::text(&credit.lang),
                    SqlArg::text(&credit.r#type),
                    SqlArg::text(&credit.value),
                ],
            )
            .await?;
        }
    }

    if let Some(references) = &cna.references {
        for reference in references {
            insert_reference(tx, reference, cna_id).await?;
        }
    }

    Ok(())
}

async fn insert_affected(
    tx: &mut DbTransaction,
    product: &Affected,
    cna_id: i64,
) -> Result<(), sqlx::Error> {
    let affected_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_affected (cna_id, vendor, product, default_status) \
             VALUES ($1, $2, $3, $4)",
            &[
                SqlArg::id(cna_id),
                SqlArg::text(&product.vendor),
                SqlArg::text(&product.product),
                SqlArg::text(&product.default_status),
            ],
        )
        .await?;

    if let Some(versions) = &product.versions {
        for version in versions {
            tx.execute(
                "INSERT INTO tbl_versions \
                 (affected_id, version, status, less_than, less_than_or_equal, version_type) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    SqlArg::id(affected_id),
                    SqlArg::text(&version.version),
                    SqlArg::text(&version.status),
                    SqlArg::text(&version.less_than),
                    SqlArg::text(&version.less_than_or_equal),
                    SqlArg::text(&version.version_type),
                ],
            )
            .await?;
        }
    }

    if let Some(modules) = &product.modules {
        for module in modules {
            tx.execute(
                "INSERT INTO tbl_modules (affected_id, module_name) VALUES ($1, $2)",
                &[SqlArg::id(affected_id), SqlArg::Text(Some(module.clone()))],
            )
            .await?;
        }
    }

    Ok(())
}

async fn insert_description(
    tx: &mut DbTransaction,
    description: &Description,
    cna_id: i64,
) -> Result<(), sqlx::Error> {
    let description_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_description (cna_id, lang, value) VALUES ($1, $2, $3)",
            &[
                SqlArg::id(cna_id),
                SqlArg::text(&description.lang),
                SqlArg::text(&description.value),
            ],
        )
        .await?;

    if let Some(media_list) = &description.supporting_media {
        for media in media_list {
            tx.execute(
                "INSERT INTO tbl_supporting_media (description_id, lang, media_type, base64, value) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    SqlArg::id(description_id),
                    SqlArg::text(&media.lang),
                    SqlArg::text(&media.r#type),
                    SqlArg::flag(media.base64),
                    SqlArg::text(&media.value),
                ],
            )
            .await?;
        }
    }

    Ok(())
}

async fn insert_metric(
    tx: &mut DbTransaction,
    metric: &Metric,
    cna_id: i64,
) -> Result<(), sqlx::Error> {
    let metric_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_metric (cna_id) VALUES ($1)",
            &[SqlArg::id(cna_id)],
        )
        .await?;

    // Exactly one CVSS child row per metric, matching the populated variant.
    match metric.populated() {
        Some(CvssSlot::V2_0(score)) => {
            tx.execute(
                "INSERT INTO tbl_cvss_v2_0 (metric_id, version, base_score, vector_string) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    SqlArg::id(metric_id),
                    SqlArg::text(&score.version),
                    SqlArg::float(score.base_score),
                    SqlArg::text(&score.vector_string),
                ],
            )
            .await?;
        }
        Some(slot) => {
            let (table, score) = match slot {
                CvssSlot::V3_0(score) => ("tbl_cvss_v3_0", score),
                CvssSlot::V3_1(score) => ("tbl_cvss_v3_1", score),
                CvssSlot::V4_0(score) => ("tbl_cvss_v4_0", score),
                CvssSlot::V2_0(_) => unreachable!("handled above"),
            };
            tx.execute(
                &format!(
                    "INSERT INTO {table} (metric_id, version, base_score, vector_string, base_severity) \
                     VALUES ($1, $2, $3, $4, $5)"
                ),
                &[
                    SqlArg::id(metric_id),
                    SqlArg::text(&score.version),
                    SqlArg::float(score.base_score),
                    SqlArg::text(&score.vector_string),
                    SqlArg::text(&score.base_severity),
                ],
            )
            .await?;
        }
        None => {}
    }

    Ok(())
}

async fn insert_reference(
    tx: &mut DbTransaction,
    reference: &Reference,
    cna_id: i64,
) -> Result<(), sqlx::Error> {
    let reference_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_reference (cna_id, url, name) VALUES ($1, $2, $3)",
            &[
                SqlArg::id(cna_id),
                SqlArg::text(&reference.url),
                SqlArg::text(&reference.name),
            ],
        )
        .await?;

    if let Some(tags) = &reference.tags {
        for tag in tags {
            tx.execute(
                "INSERT INTO tbl_reference_tags (reference_id, tag) VALUES ($1, $2)",
                &[SqlArg::id(reference_id), SqlArg::Text(Some(tag.clone()))],
            )
            .await?;
        }
    }

    Ok(())
}

async fn insert_adp_container(
    tx: &mut DbTransaction,
    adp: &AdpContainer,
    containers_id: i64,
) -> Result<(), sqlx::Error> {
    let provider_metadata_id = insert_provider_metadata(tx, &adp.provider_metadata).await?;
    let adp_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_adp_container (containers_id, provider_metadata_id, title) \
             VALUES ($1, $2, $3)",
            &[
                SqlArg::id(containers_id),
                SqlArg::opt_id(provider_metadata_id),
                SqlArg::text(&adp.title),
            ],
        )
        .await?;

    let Some(metrics) = &adp.metrics else {
        return Ok(());
    };
    for metric in metrics {
        let adp_metric_id = tx
            .insert_returning_id(
                "INSERT INTO tbl_adp_metric (adp_id) VALUES ($1)",
                &[SqlArg::id(adp_id)],
            )
            .await?;

        // Only the SSVC variant of the "other" union is persisted; unknown
        // schemes keep their ADP metric row but no child rows.
        if let Some(OtherMetric::Ssvc(ssvc)) = &metric.other {
            insert_ssvc(tx, ssvc, adp_metric_id).await?;
        }
    }

    Ok(())
}

async fn insert_ssvc(
    tx: &mut DbTransaction,
    ssvc: &Ssvc,
    adp_metric_id: i64,
) -> Result<(), sqlx::Error> {
    let ssvc_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_ssvc (adp_metric_id, metric_type) VALUES ($1, $2)",
            &[
                SqlArg::id(adp_metric_id),
                SqlArg::Text(Some(ssvc.metric_type.clone())),
            ],
        )
        .await?;

    let Some(content) = &ssvc.content else {
        return Ok(());
    };

    let content_row_id = tx
        .insert_returning_id(
            "INSERT INTO tbl_ssvc_content (ssvc_id, content_id, timestamp_utc, role, version) \
             VALUES ($1, $2, $3, $4, $5)",
            &[
                SqlArg::id(ssvc_id),
                SqlArg::text(&content.id),
                SqlArg::timestamp(content.timestamp),
                SqlArg::text(&content.role),
                SqlArg::text(&content.version),
            ],
        )
        .await?;

    if let Some(options) = &content.options {
        for option in options {
            tx.execute(
                "INSERT INTO tbl_ssvc_option \
                 (ssvc_content_id, exploitation, automatable, technical_impact) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    SqlArg::id(content_row_id),
                    SqlArg::text(&option.exploitation),
                    SqlArg::text(&option.automatable),
                    SqlArg::text(&option.technical_impact),
                ],
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::DbEngine;
    use crate::db::schema;
    use crate::mapper::CveMapper;

    async fn setup_pool() -> DbPool {
        let pool = DbPool::connect(DbEngine::Sqlite, "sqlite::memory:")
            .await
            .unwrap();
        schema::init(&pool).await.unwrap();
        pool
    }

    async fn count(pool: &DbPool, table: &str) -> i64 {
        let DbPool::Sqlite(raw) = pool else {
            unreachable!("tests run on sqlite");
        };
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(raw)
            .await
            .unwrap()
    }

    const SCENARIO: &str = r#"{
        "dataType": "CVE_RECORD",
        "dataVersion": "5.1",
        "cveMetadata": {"cveId": "CVE-2024-0001", "state": "PUBLISHED"},
        "containers": {
            "cna": {
                "providerMetadata": {"orgId": "org-1", "shortName": "example"},
                "title": "Example vulnerability",
                "affected": [
                    {
                        "vendor": "Example Corp",
                        "product": "WidgetServer",
                        "versions": [
                            {"version": "1.0", "status": "affected"},
                            {"version": "1.1", "status": "affected"},
                            {"version": "1.2", "status": "affected"}
                        ]
                    },
                    {"vendor": "Example Corp", "product": "WidgetClient"}
                ],
                "metrics": [
                    {
                        "cvssV3_1": {
                            "version": "3.1",
                            "baseScore": 9.8,
                            "vectorString": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H",
                            "baseSeverity": "CRITICAL"
                        }
                    }
                ]
            }
        }
    }"#;

    #[tokio::test]
    async fn scenario_published_record_with_two_affected_products() {
        let pool = setup_pool().await;
        let record = CveMapper::parse_record(SCENARIO).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_cve_metadata").await, 1);
        assert_eq!(count(&pool, "tbl_root_cve").await, 1);
        assert_eq!(count(&pool, "tbl_containers").await, 1);
        assert_eq!(count(&pool, "tbl_cna_container").await, 1);
        assert_eq!(count(&pool, "tbl_affected").await, 2);
        assert_eq!(count(&pool, "tbl_versions").await, 3);
        assert_eq!(count(&pool, "tbl_metric").await, 1);
        assert_eq!(count(&pool, "tbl_cvss_v3_1").await, 1);

        let DbPool::Sqlite(raw) = &pool else {
            unreachable!();
        };

        // The CNA container resolves back to this exact metadata row.
        let cve_id: String = sqlx::query_scalar(
            "SELECT m.cve_id FROM tbl_cna_container c \
             JOIN tbl_containers cs ON c.containers_id = cs.id \
             JOIN tbl_root_cve r ON cs.root_cve_id = r.id \
             JOIN tbl_cve_metadata m ON r.cve_metadata_id = m.id",
        )
        .fetch_one(raw)
        .await
        .unwrap();
        assert_eq!(cve_id, "CVE-2024-0001");

        // Both affected rows link to the one CNA container.
        let linked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tbl_affected a \
             JOIN tbl_cna_container c ON a.cna_id = c.id",
        )
        .fetch_one(raw)
        .await
        .unwrap();
        assert_eq!(linked, 2);

        // Three versions for the first product, zero for the second.
        let per_product: Vec<(String, i64)> = sqlx::query_as(
            "SELECT a.product, COUNT(v.id) FROM tbl_affected a \
             LEFT JOIN tbl_versions v ON v.affected_id = a.id \
             GROUP BY a.id, a.product ORDER BY a.id",
        )
        .fetch_all(raw)
        .await
        .unwrap();
        assert_eq!(per_product[0], ("WidgetServer".to_string(), 3));
        assert_eq!(per_product[1], ("WidgetClient".to_string(), 0));

        let base_score: f64 = sqlx::query_scalar("SELECT base_score FROM tbl_cvss_v3_1")
            .fetch_one(raw)
            .await
            .unwrap();
        assert_eq!(base_score, 9.8);

        // Back-patched cna_id resolves to the CNA row.
        let back_patched: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tbl_containers cs \
             JOIN tbl_cna_container c ON cs.cna_id = c.id",
        )
        .fetch_one(raw)
        .await
        .unwrap();
        assert_eq!(back_patched, 1);
    }

    #[tokio::test]
    async fn union_exclusivity_one_cvss_child_per_metric() {
        let pool = setup_pool().await;
        // A malformed-but-tolerated metric carrying two CVSS payloads only
        // produces the newest child row.
        let raw_doc = r#"{
            "cveMetadata": {"cveId": "CVE-2024-0005"},
            "containers": {
                "cna": {
                    "metrics": [
                        {
                            "cvssV3_1": {"version": "3.1", "baseScore": 8.1},
                            "cvssV2_0": {"version": "2.0", "baseScore": 6.8}
                        }
                    ]
                }
            }
        }"#;
        let record = CveMapper::parse_record(raw_doc).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_metric").await, 1);
        assert_eq!(count(&pool, "tbl_cvss_v3_1").await, 1);
        assert_eq!(count(&pool, "tbl_cvss_v2_0").await, 0);
        assert_eq!(count(&pool, "tbl_cvss_v3_0").await, 0);
        assert_eq!(count(&pool, "tbl_cvss_v4_0").await, 0);
    }

    #[tokio::test]
    async fn atomicity_failed_child_insert_leaves_no_rows() {
        let pool = setup_pool().await;
        // Force a failure partway through the walk: the versions insert is
        // the Nth child step for this document.
        pool.execute_raw("DROP TABLE tbl_versions").await.unwrap();

        let record = CveMapper::parse_record(SCENARIO).unwrap();
        let result = insert_record(&pool, &record).await;
        assert!(result.is_err());

        assert_eq!(count(&pool, "tbl_cve_metadata").await, 0);
        assert_eq!(count(&pool, "tbl_root_cve").await, 0);
        assert_eq!(count(&pool, "tbl_containers").await, 0);
        assert_eq!(count(&pool, "tbl_cna_container").await, 0);
        assert_eq!(count(&pool, "tbl_affected").await, 0);
        assert_eq!(count(&pool, "tbl_provider_metadata").await, 0);
    }

    #[tokio::test]
    async fn empty_containers_persist_root_rows_only() {
        let pool = setup_pool().await;
        let record = CveMapper::parse_record(
            r#"{"cveMetadata": {"cveId": "CVE-2024-0006", "state": "RESERVED"}, "containers": {}}"#,
        )
        .unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_cve_metadata").await, 1);
        assert_eq!(count(&pool, "tbl_root_cve").await, 1);
        assert_eq!(count(&pool, "tbl_containers").await, 1);
        assert_eq!(count(&pool, "tbl_cna_container").await, 0);
        assert_eq!(count(&pool, "tbl_adp_container").await, 0);
    }

    #[tokio::test]
    async fn record_without_containers_skips_containers_row() {
        let pool = setup_pool().await;
        let record =
            CveMapper::parse_record(r#"{"cveMetadata": {"cveId": "CVE-2024-0007"}}"#).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_root_cve").await, 1);
        assert_eq!(count(&pool, "tbl_containers").await, 0);
    }

    #[tokio::test]
    async fn scenario_unknown_other_scheme_writes_no_ssvc_rows() {
        let pool = setup_pool().await;
        let raw_doc = r#"{
            "cveMetadata": {"cveId": "CVE-2024-0008"},
            "containers": {
                "adp": [
                    {
                        "title": "KEV catalog entry",
                        "providerMetadata": {"orgId": "org-2", "shortName": "catalog"},
                        "metrics": [{"other": {"type": "kev", "content": {"dateAdded": "2024-05-01"}}}]
                    }
                ]
            }
        }"#;
        let record = CveMapper::parse_record(raw_doc).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_adp_container").await, 1);
        assert_eq!(count(&pool, "tbl_adp_metric").await, 1);
        assert_eq!(count(&pool, "tbl_ssvc").await, 0);
        assert_eq!(count(&pool, "tbl_ssvc_content").await, 0);
    }

    #[tokio::test]
    async fn ssvc_chain_is_fully_persisted() {
        let pool = setup_pool().await;
        let raw_doc = r#"{
            "cveMetadata": {"cveId": "CVE-2024-0009"},
            "containers": {
                "adp": [
                    {
                        "title": "CISA ADP Vulnrichment",
                        "providerMetadata": {"orgId": "org-3", "shortName": "CISA-ADP"},
                        "metrics": [
                            {
                                "other": {
                                    "type": "ssvc",
                                    "content": {
                                        "id": "CVE-2024-0009",
                                        "timestamp": "2024-06-01T10:00:00Z",
                                        "role": "CISA Coordinator",
                                        "version": "2.0.3",
                                        "options": [
                                            {"Exploitation": "active"},
                                            {"Automatable": "no"},
                                            {"Technical Impact": "total"}
                                        ]
                                    }
                                }
                            }
                        ]
                    }
                ]
            }
        }"#;
        let record = CveMapper::parse_record(raw_doc).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_adp_container").await, 1);
        assert_eq!(count(&pool, "tbl_adp_metric").await, 1);
        assert_eq!(count(&pool, "tbl_ssvc").await, 1);
        assert_eq!(count(&pool, "tbl_ssvc_content").await, 1);
        assert_eq!(count(&pool, "tbl_ssvc_option").await, 3);

        let DbPool::Sqlite(raw) = &pool else {
            unreachable!();
        };
        let exploitation: String = sqlx::query_scalar(
            "SELECT exploitation FROM tbl_ssvc_option WHERE exploitation IS NOT NULL",
        )
        .fetch_one(raw)
        .await
        .unwrap();
        assert_eq!(exploitation, "active");
    }

    #[tokio::test]
    async fn descriptions_and_references_cascade_children() {
        let pool = setup_pool().await;
        let raw_doc = r#"{
            "cveMetadata": {"cveId": "CVE-2024-0010"},
            "containers": {
                "cna": {
                    "descriptions": [
                        {
                            "lang": "en",
                            "value": "summary",
                            "supportingMedia": [
                                {"lang": "en", "type": "text/html", "base64": false, "value": "<p>x</p>"}
                            ]
                        },
                        {"lang": "de", "value": "zusammenfassung"}
                    ],
                    "references": [
                        {"url": "https://example.com/a", "tags": ["patch", "vendor-advisory"]},
                        {"url": "https://example.com/b"}
                    ],
                    "credits": [{"lang": "en", "type": "finder", "value": "someone"}],
                    "timeline": [{"time": "2024-01-01T00:00:00Z", "lang": "en", "value": "reported"}]
                }
            }
        }"#;
        let record = CveMapper::parse_record(raw_doc).unwrap();
        insert_record(&pool, &record).await.unwrap();

        assert_eq!(count(&pool, "tbl_description").await, 2);
        assert_eq!(count(&pool, "tbl_supporting_media").await, 1);
        assert_eq!(count(&pool, "tbl_reference").await, 2);
        assert_eq!(count(&pool, "tbl_reference_tags").await, 2);
        assert_eq!(count(&pool, "tbl_credit").await, 1);
        assert_eq!(count(&pool, "tbl_timeline_entry").await, 1);
    }
}
