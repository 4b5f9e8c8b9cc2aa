//! TOML directory reader.
//!
//! The document holds a `members` array of tables. Scalar values are
//! stringified so that TOML and CSV directories produce identical rows.

use serde::Deserialize;

use crate::{ReadError, Row};

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    members: Vec<toml::Table>,
}

pub(crate) fn read(source: &str) -> Result<Vec<Row>, ReadError> {
    let document: Document = toml::from_str(source)?;

    document
        .members
        .into_iter()
        .enumerate()
        .map(|(index, table)| {
            table
                .into_iter()
                .map(|(field, value)| {
                    let text = match value {
                        toml::Value::String(s) => s,
                        toml::Value::Integer(n) => n.to_string(),
                        toml::Value::Float(x) => x.to_string(),
                        toml::Value::Boolean(b) => b.to_string(),
                        toml::Value::Datetime(dt) => dt.to_string(),
                        toml::Value::Array(_) | toml::Value::Table(_) => {
                            return Err(ReadError::NonScalar { index, field });
                        }
                    };
                    Ok((field, text))
                })
                .collect::<Result<Row, _>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_members() {
        let source = r#"
            [[members]]
            key = "a1"
            name = "Ann"
            pledge_semester = "Fall 2000"

            [[members]]
            child = "Beta"
            founded = 1869
        "#;
        let rows = read(source).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Ann");
        assert_eq!(rows[1]["founded"], "1869");
    }

    #[test]
    fn test_read_without_members() {
        assert!(read("").unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_nested_values() {
        let source = r#"
            [[members]]
            name = "Ann"
            affiliations = ["ΔΑ 1"]
        "#;
        assert!(matches!(
            read(source),
            Err(ReadError::NonScalar { index: 0, ref field }) if field == "affiliations"
        ));
    }

    #[test]
    fn test_read_reports_toml_errors() {
        assert!(matches!(read("members = ["), Err(ReadError::Toml(_))));
    }
}
