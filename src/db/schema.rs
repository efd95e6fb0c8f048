use tracing::debug;

use super::connection::{DbEngine, DbPool};

impl DbEngine {
    fn id_column(self) -> &'static str {
        match self {
            DbEngine::Postgres => "id BIGSERIAL PRIMARY KEY",
            DbEngine::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn timestamp_type(self) -> &'static str {
        match self {
            DbEngine::Postgres => "TIMESTAMPTZ",
            DbEngine::Sqlite => "TEXT",
        }
    }
}

/// Create the full relational schema if it does not exist yet. Tables are
/// emitted parents-first so foreign key references always resolve.
pub async fn init(pool: &DbPool) -> Result<(), sqlx::Error> {
    let engine = pool.engine();
    debug!("initializing schema for {engine}");
    for statement in create_statements(engine) {
        pool.execute_raw(&statement).await?;
    }
    Ok(())
}

fn create_statements(engine: DbEngine) -> Vec<String> {
    let id = engine.id_column();
    let ts = engine.timestamp_type();

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cve_metadata (
                {id},
                cve_id TEXT NOT NULL,
                assigner_org_id TEXT,
                assigner_short_name TEXT,
                state TEXT,
                date_reserved {ts},
                date_published {ts},
                date_updated {ts}
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_root_cve (
                {id},
                cve_metadata_id BIGINT REFERENCES tbl_cve_metadata(id) ON DELETE CASCADE,
                data_type TEXT,
                data_version TEXT
            )"
        ),
        // cna_id is back-patched once the CNA row exists, so it cannot carry
        // a forward REFERENCES clause here.
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_containers (
                {id},
                root_cve_id BIGINT NOT NULL REFERENCES tbl_root_cve(id) ON DELETE CASCADE,
                cna_id BIGINT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_provider_metadata (
                {id},
                org_id TEXT,
                short_name TEXT,
                date_updated {ts}
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cna_container (
                {id},
                containers_id BIGINT NOT NULL REFERENCES tbl_containers(id) ON DELETE CASCADE,
                provider_metadata_id BIGINT REFERENCES tbl_provider_metadata(id),
                title TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_affected (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE,
                vendor TEXT,
                product TEXT,
                default_status TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_versions (
                {id},
                affected_id BIGINT NOT NULL REFERENCES tbl_affected(id) ON DELETE CASCADE,
                version TEXT,
                status TEXT,
                less_than TEXT,
                less_than_or_equal TEXT,
                version_type TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_modules (
                {id},
                affected_id BIGINT NOT NULL REFERENCES tbl_affected(id) ON DELETE CASCADE,
                module_name TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_description (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE,
                lang TEXT,
                value TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_supporting_media (
                {id},
                description_id BIGINT NOT NULL REFERENCES tbl_description(id) ON DELETE CASCADE,
                lang TEXT,
                media_type TEXT,
                base64 BOOLEAN,
                value TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_metric (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cvss_v2_0 (
                {id},
                metric_id BIGINT NOT NULL REFERENCES tbl_metric(id) ON DELETE CASCADE,
                version TEXT,
                base_score DOUBLE PRECISION,
                vector_string TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cvss_v3_0 (
                {id},
                metric_id BIGINT NOT NULL REFERENCES tbl_metric(id) ON DELETE CASCADE,
                version TEXT,
                base_score DOUBLE PRECISION,
                vector_string TEXT,
                base_severity TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cvss_v3_1 (
                {id},
                metric_id BIGINT NOT NULL REFERENCES tbl_metric(id) ON DELETE CASCADE,
                version TEXT,
                base_score DOUBLE PRECISION,
                vector_string TEXT,
                base_severity TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_cvss_v4_0 (
                {id},
                metric_id BIGINT NOT NULL REFERENCES tbl_metric(id) ON DELETE CASCADE,
                version TEXT,
                base_score DOUBLE PRECISION,
                vector_string TEXT,
                base_severity TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_timeline_entry (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE,
                time {ts},
                lang TEXT,
                value TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_credit (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE,
                lang TEXT,
                credit_type TEXT,
                value TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_reference (
                {id},
                cna_id BIGINT NOT NULL REFERENCES tbl_cna_container(id) ON DELETE CASCADE,
                url TEXT,
                name TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_reference_tags (
                {id},
                reference_id BIGINT NOT NULL REFERENCES tbl_reference(id) ON DELETE CASCADE,
                tag TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_adp_container (
                {id},
                containers_id BIGINT NOT NULL REFERENCES tbl_containers(id) ON DELETE CASCADE,
                provider_metadata_id BIGINT REFERENCES tbl_provider_metadata(id),
                title TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_adp_metric (
                {id},
                adp_id BIGINT NOT NULL REFERENCES tbl_adp_container(id) ON DELETE CASCADE
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_ssvc (
                {id},
                adp_metric_id BIGINT NOT NULL REFERENCES tbl_adp_metric(id) ON DELETE CASCADE,
                metric_type TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_ssvc_content (
                {id},
                ssvc_id BIGINT NOT NULL REFERENCES tbl_ssvc(id) ON DELETE CASCADE,
                content_id TEXT,
                timestamp_utc {ts},
                role TEXT,
                version TEXT
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tbl_ssvc_option (
                {id},
                ssvc_content_id BIGINT NOT NULL REFERENCES tbl_ssvc_content(id) ON DELETE CASCADE,
                exploitation TEXT,
                automatable TEXT,
                technical_impact TEXT
            )"
        ),
    ]
}
