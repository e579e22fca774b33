//! Wrapped scientific computations.
//!
//! Each submodule is the external collaborator behind one stage adapter,
//! exposed as a trait taking plain extracted values (never the session
//! snapshot) and returning plain values or a typed error. The provided
//! implementations are the documented deterministic substitutes for the
//! full-fidelity engines the dashboard wraps in production.

pub mod cpt;
pub mod geomodel;
pub mod modal;
pub mod simulation;

use crate::errors::CollaboratorError;
use serde::de::DeserializeOwned;

/// Decodes table-valued session entries into typed records.
///
/// # Errors
///
/// Returns [`CollaboratorError::InvalidRecord`] naming the first row that
/// fails to decode.
pub fn parse_records<T: DeserializeOwned>(
    rows: &[serde_json::Value],
) -> Result<Vec<T>, CollaboratorError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row.clone())
                .map_err(|err| CollaboratorError::invalid_record(index, err.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Row {
        depth_m: f64,
    }

    #[test]
    fn test_parse_records_decodes_rows() {
        let rows = vec![json!({"depth_m": 0.5}), json!({"depth_m": 1.0})];
        let parsed: Vec<Row> = parse_records(&rows).unwrap();
        assert_eq!(parsed, vec![Row { depth_m: 0.5 }, Row { depth_m: 1.0 }]);
    }

    #[test]
    fn test_parse_records_reports_offending_row() {
        let rows = vec![json!({"depth_m": 0.5}), json!({"depth_m": "two"})];
        let err = parse_records::<Row>(&rows).unwrap_err();
        assert!(err.to_string().starts_with("record 1:"));
    }
}
