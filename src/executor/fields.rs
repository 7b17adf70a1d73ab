//! Projection and sort resolution

use mongodb::bson::{Document, doc};

use super::result::SortField;
use crate::error::ParseError;

/// Projection for the requested fields; `None` selects every field
pub fn projection(fields: &[String]) -> Option<Document> {
    if fields.is_empty() {
        return None;
    }

    let mut projection = Document::new();
    for field in fields {
        projection.insert(field.clone(), 1);
    }
    Some(projection)
}

/// Resolved sort: the cursor sort document and its display hints
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub sort: Document,
    pub display: Vec<SortField>,
}

impl SortSpec {
    /// Resolve sort entries, keeping at most `slots` display hints.
    /// No entries means newest first (`{_id: -1}`).
    pub fn resolve(entries: &[(String, String)], slots: usize) -> Result<Self, ParseError> {
        if entries.is_empty() {
            return Ok(Self {
                sort: doc! { "_id": -1 },
                display: vec![SortField {
                    name: "_id".to_string(),
                    order: -1,
                }],
            });
        }

        let mut sort = Document::new();
        let mut display = Vec::new();

        for (field, token) in entries {
            let order = parse_direction(field, token)?;
            sort.insert(field.clone(), order);
            if display.len() < slots {
                display.push(SortField {
                    name: field.clone(),
                    order,
                });
            }
        }

        Ok(Self { sort, display })
    }
}

/// Coerce a direction token to +1 or -1
pub fn parse_direction(field: &str, token: &str) -> Result<i32, ParseError> {
    let trimmed = token.trim();

    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(if n < 0 { -1 } else { 1 });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(1),
        "desc" | "descending" => Ok(-1),
        _ => Err(ParseError::InvalidSortDirection {
            field: field.to_string(),
            value: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(f, d)| (f.to_string(), d.to_string()))
            .collect()
    }

    #[test]
    fn test_projection() {
        assert_eq!(projection(&[]), None);
        assert_eq!(
            projection(&["name".to_string(), "age".to_string()]),
            Some(doc! { "name": 1, "age": 1 })
        );
    }

    #[test]
    fn test_default_sort() {
        let spec = SortSpec::resolve(&[], 4).unwrap();
        assert_eq!(spec.sort, doc! { "_id": -1 });
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!(parse_direction("a", "-1").unwrap(), -1);
        assert_eq!(parse_direction("a", "5").unwrap(), 1);
        assert_eq!(parse_direction("a", "0").unwrap(), 1);
        assert_eq!(parse_direction("a", "DESC").unwrap(), -1);
        assert_eq!(parse_direction("a", "ascending").unwrap(), 1);
        assert!(matches!(
            parse_direction("a", "sideways"),
            Err(ParseError::InvalidSortDirection { .. })
        ));
    }

    #[test]
    fn test_display_slots_truncate_display_only() {
        let spec = SortSpec::resolve(
            &entries(&[("a", "1"), ("b", "-1"), ("c", "1"), ("d", "1"), ("e", "-1")]),
            4,
        )
        .unwrap();

        assert_eq!(spec.sort.len(), 5);
        assert_eq!(spec.display.len(), 4);
        assert_eq!(spec.display[1], SortField { name: "b".to_string(), order: -1 });
        let keys: Vec<_> = spec.sort.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
    }
}
