use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

use super::OptionalRow;
use crate::db::DatabaseError;
use crate::models::{AnalysisResult, AnalysisStatus, Severity};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted analysis with its full result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub medication: String,
    pub risk_level: Severity,
    pub status: AnalysisStatus,
    pub result: AnalysisResult,
}

struct ReportRow {
    id: String,
    created_at: String,
    medication: String,
    risk_level: String,
    status: String,
    result_json: String,
}

pub fn save_report(conn: &Connection, result: &AnalysisResult) -> Result<StoredReport, DatabaseError> {
    let now = chrono::Local::now().naive_local();
    let report = StoredReport {
        id: Uuid::new_v4(),
        // Whole seconds, matching the stored text format.
        created_at: now.with_nanosecond(0).unwrap_or(now),
        medication: result.medication.clone(),
        risk_level: result.risk_level,
        status: result.status,
        result: result.clone(),
    };

    conn.execute(
        "INSERT INTO analysis_reports (id, created_at, medication, risk_level, status, result_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            report.id.to_string(),
            report.created_at.format(TIMESTAMP_FORMAT).to_string(),
            report.medication,
            report.risk_level.as_str(),
            report.status.as_str(),
            serde_json::to_string(&report.result)?,
        ],
    )?;

    tracing::debug!(id = %report.id, risk = report.risk_level.as_str(), "Analysis report saved");
    Ok(report)
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<StoredReport>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, created_at, medication, risk_level, status, result_json
             FROM analysis_reports WHERE id = ?1",
            params![id.to_string()],
            read_row,
        )
        .optional()?;

    row.map(report_from_row).transpose()
}

/// Most recent reports first.
pub fn list_recent_reports(conn: &Connection, limit: u32) -> Result<Vec<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at, medication, risk_level, status, result_json
         FROM analysis_reports ORDER BY created_at DESC, rowid DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], read_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

pub fn delete_report(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM analysis_reports WHERE id = ?1",
        params![id.to_string()],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "AnalysisReport".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
        medication: row.get(2)?,
        risk_level: row.get(3)?,
        status: row.get(4)?,
        result_json: row.get(5)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<StoredReport, DatabaseError> {
    Ok(StoredReport {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        created_at: NaiveDateTime::parse_from_str(&row.created_at, TIMESTAMP_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        medication: row.medication,
        risk_level: Severity::from_str(&row.risk_level)?,
        status: AnalysisStatus::from_str(&row.status)?,
        result: serde_json::from_str(&row.result_json)?,
    })
}
