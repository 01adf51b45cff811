use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;

/// Plain serializable form of a shape: `{"type": "box", "label": ..., "xyxy": [..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeRecord {
    Box { label: String, xyxy: [f32; 4] },
}

/// Parse a JSON array of shape records.
pub fn parse_records(json: &str) -> Result<Vec<ShapeRecord>, AnnotateError> {
    Ok(serde_json::from_str(json)?)
}

pub fn records_to_json(records: &[ShapeRecord]) -> Result<String, AnnotateError> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let rec = ShapeRecord::Box {
            label: "cat".into(),
            xyxy: [1.0, 2.0, 30.0, 40.0],
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "box", "label": "cat", "xyxy": [1.0, 2.0, 30.0, 40.0]})
        );
    }

    #[test]
    fn test_parse_accepts_integer_extents() {
        let recs = parse_records(r#"[{"type":"box","label":"dog","xyxy":[0,0,10,12]}]"#).unwrap();
        assert_eq!(
            recs,
            vec![ShapeRecord::Box {
                label: "dog".into(),
                xyxy: [0.0, 0.0, 10.0, 12.0],
            }]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = parse_records(r#"[{"type":"polygon","label":"dog","xyxy":[0,0,1,1]}]"#);
        assert!(matches!(err, Err(AnnotateError::InvalidRecord(_))));
    }

    #[test]
    fn test_parse_rejects_short_extents() {
        let err = parse_records(r#"[{"type":"box","label":"dog","xyxy":[0,0,1]}]"#);
        assert!(matches!(err, Err(AnnotateError::InvalidRecord(_))));
    }
}
