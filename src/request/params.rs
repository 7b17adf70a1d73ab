//! Raw request parameters

/// Query-string parameters of one console request.
///
/// Values are kept as the router delivered them; interpretation happens
/// during dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    pub action: Option<String>,
    pub op: Option<String>,
    pub criteria: Option<String>,
    pub update: Option<String>,
    /// Projection field names, in request order
    pub fields: Vec<String>,
    /// Sort entries `(field, direction token)`, in request order
    pub sort: Vec<(String, String)>,
    pub page: Option<String>,
    pub distinct: Option<String>,
    pub byid: Option<String>,
    /// Collections preselected on the export page
    pub collections: Vec<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub msg: Option<String>,
    pub json: Option<String>,
    /// Error code forwarded by the router
    pub err: Option<String>,
}

impl RequestParams {
    /// Decode url-decoded `key=value` pairs.
    ///
    /// Recognizes `fields`/`fields[]`, `collections`/`collections[]` and
    /// `sort[<field>]`. A repeated sort field keeps its first position and
    /// takes the last direction. Unknown keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.into();

            if let Some(field) = key
                .strip_prefix("sort[")
                .and_then(|rest| rest.strip_suffix(']'))
            {
                if field.is_empty() {
                    continue;
                }
                match params.sort.iter_mut().find(|(f, _)| f == field) {
                    Some(entry) => entry.1 = value,
                    None => params.sort.push((field.to_string(), value)),
                }
                continue;
            }

            match key {
                "fields" | "fields[]" => {
                    if !value.trim().is_empty() {
                        params.fields.push(value);
                    }
                }
                "collections" | "collections[]" => params.collections.push(value),
                "action" => params.action = Some(value),
                "op" => params.op = Some(value),
                "criteria" => params.criteria = Some(value),
                "update" => params.update = Some(value),
                "page" => params.page = Some(value),
                "distinct" => params.distinct = Some(value),
                "byid" => params.byid = Some(value),
                "username" => params.username = Some(value),
                "name" => params.name = Some(value),
                "msg" => params.msg = Some(value),
                "json" => params.json = Some(value),
                "err" => params.err = Some(value),
                _ => {}
            }
        }

        params
    }

    /// Criteria text; blank text (only spaces, tabs or line breaks) is absent
    pub fn criteria_text(&self) -> Option<&str> {
        self.criteria.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_pairs() {
        let params = RequestParams::from_query_pairs([
            ("criteria", "{a: 1}"),
            ("fields[]", "name"),
            ("fields[]", "age"),
            ("sort[age]", "-1"),
            ("sort[name]", "asc"),
            ("sort[age]", "1"),
            ("collections[]", "users"),
            ("page", "2"),
            ("bogus", "x"),
        ]);

        assert_eq!(params.criteria.as_deref(), Some("{a: 1}"));
        assert_eq!(params.fields, vec!["name", "age"]);
        assert_eq!(
            params.sort,
            vec![
                ("age".to_string(), "1".to_string()),
                ("name".to_string(), "asc".to_string())
            ]
        );
        assert_eq!(params.collections, vec!["users"]);
        assert_eq!(params.page.as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_values() {
        let params = RequestParams::from_query_pairs([("fields", ""), ("criteria", "")]);
        assert!(params.fields.is_empty());
        assert_eq!(params.criteria_text(), None);
    }

    #[test]
    fn test_blank_criteria_is_absent() {
        let params = RequestParams::from_query_pairs([("criteria", "\n\t\r\n ")]);
        assert_eq!(params.criteria_text(), None);

        let params = RequestParams::from_query_pairs([("criteria", "\n{a: 1}\n")]);
        assert_eq!(params.criteria_text(), Some("\n{a: 1}\n"));
    }
}
