//! Evaluación de los permisos de un usuario sobre un documento a partir de
//! las filas de `SYNM_DMS_DOC_USER_RIGHTS`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RefSeqNo;

/// Derecho solicitado. `W` implica también `R` y `D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "D")]
    Delete,
    #[serde(rename = "W")]
    Write,
}

impl Permission {
    pub fn code(self) -> &'static str {
        match self {
            Permission::Read => "R",
            Permission::Delete => "D",
            Permission::Write => "W",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRight {
    #[serde(rename = "REF_SEQ_NO")]
    pub ref_seq_no: RefSeqNo,
    #[serde(rename = "PERMISSION_USER_NAME")]
    pub user_name: String,
    #[serde(rename = "PERMISSION_VALID_TILL", default)]
    pub valid_till: Option<String>,
    #[serde(rename = "PERMISSION_RIGHTS", default)]
    pub rights: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RightsError {
    #[error("Missing required parameters")]
    MissingParameters,
    #[error("No permissions found for this document")]
    NoPermissions,
    #[error("Invalid permission date format: {0}")]
    InvalidDate(String),
    #[error("Permission has expired")]
    Expired,
}

/// Extrae el instante de una fecha `/Date(<ms>)/`.
pub fn parse_service_date(raw: &str) -> Option<DateTime<Utc>> {
    let start = raw.find("/Date(")? + "/Date(".len();
    let rest = &raw[start..];
    let end = rest.find(")/")?;
    let millis = &rest[..end];
    if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.parse().ok()?)
}

/// Decide si `user` tiene `permission` sobre el documento `ref_seq_no`.
///
/// Devuelve `Ok(false)` cuando la fila existe y está vigente pero no
/// concede el derecho pedido.
pub fn check_permission(
    rights: &[DocumentRight],
    ref_seq_no: &str,
    user: &str,
    permission: Permission,
    now: DateTime<Utc>,
) -> Result<bool, RightsError> {
    if ref_seq_no.is_empty() || user.is_empty() {
        return Err(RightsError::MissingParameters);
    }

    let row = rights
        .iter()
        .find(|row| row.ref_seq_no.to_string() == ref_seq_no && row.user_name == user)
        .ok_or(RightsError::NoPermissions)?;

    if let Some(raw) = row.valid_till.as_deref().filter(|raw| !raw.is_empty()) {
        let valid_till =
            parse_service_date(raw).ok_or_else(|| RightsError::InvalidDate(raw.to_string()))?;
        if valid_till <= now {
            return Err(RightsError::Expired);
        }
    }

    let granted: Vec<&str> = row.rights.split(',').map(str::trim).collect();
    let holds = |p: Permission| granted.contains(&p.code());

    let implied_by_write = matches!(permission, Permission::Read | Permission::Delete);
    Ok(holds(permission) || (implied_by_write && holds(Permission::Write)))
}
