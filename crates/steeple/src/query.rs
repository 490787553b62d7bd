//! Query parameter handling for table requests.
//!
//! The platform accepts OData-flavored query parameters (`$select`,
//! `$filter`, `$orderby`, ...) on every table endpoint. [`QueryParams`]
//! collects them with a builder and renders them to URL pairs; it is
//! constructed per call and never mutated after being passed to a request.

/// Query parameters for a table read/write request.
///
/// All fields are optional. The filter expression is passed through to the
/// platform's query language verbatim; the client performs no parsing or
/// validation of it. `user_id` is an auditing attribute, not an
/// authorization check.
///
/// # Example
///
/// ```
/// use steeple::QueryParams;
///
/// let params = QueryParams::new()
///     .select("Contact_ID, Display_Name")
///     .filter("Contact_Status_ID=1")
///     .top(10);
///
/// let pairs = params.to_pairs();
/// assert_eq!(pairs[0], ("$select".to_string(), "Contact_ID, Display_Name".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    select: Option<String>,
    filter: Option<String>,
    order_by: Option<String>,
    group_by: Option<String>,
    having: Option<String>,
    top: Option<u32>,
    skip: Option<u32>,
    distinct: Option<bool>,
    user_id: Option<i64>,
    global_filter_id: Option<i64>,
    allow_create: Option<bool>,
    ids: Vec<i64>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to select (`$select`).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Filter predicate in the platform's query language (`$filter`).
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filter = Some(predicate.into());
        self
    }

    /// Ordering expression (`$orderby`).
    pub fn order_by(mut self, expression: impl Into<String>) -> Self {
        self.order_by = Some(expression.into());
        self
    }

    /// Grouping expression (`$groupby`).
    pub fn group_by(mut self, expression: impl Into<String>) -> Self {
        self.group_by = Some(expression.into());
        self
    }

    /// Group filter expression (`$having`).
    pub fn having(mut self, expression: impl Into<String>) -> Self {
        self.having = Some(expression.into());
        self
    }

    /// Maximum number of records to return (`$top`).
    pub fn top(mut self, n: u32) -> Self {
        self.top = Some(n);
        self
    }

    /// Number of records to skip (`$skip`).
    pub fn skip(mut self, n: u32) -> Self {
        self.skip = Some(n);
        self
    }

    /// Return only distinct rows (`$distinct`).
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = Some(distinct);
        self
    }

    /// Acting user for audit logging (`$userId`).
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Global filter to scope the query to an organizational subdivision
    /// (`$globalFilterId`).
    pub fn global_filter_id(mut self, id: i64) -> Self {
        self.global_filter_id = Some(id);
        self
    }

    /// Treat records without a primary key as creations on update
    /// (`$allowCreate`), making the update an upsert.
    pub fn allow_create(mut self, allow: bool) -> Self {
        self.allow_create = Some(allow);
        self
    }

    /// Record ids, encoded as a repeated `id` parameter in order.
    pub fn ids(mut self, ids: Vec<i64>) -> Self {
        self.ids = ids;
        self
    }

    /// Render the parameters as URL query pairs.
    ///
    /// Scalar parameters appear once in a fixed order; `ids` is emitted as
    /// a repeated `id` key, order preserved.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(ref v) = self.select {
            pairs.push(("$select".to_string(), v.clone()));
        }
        if let Some(ref v) = self.filter {
            pairs.push(("$filter".to_string(), v.clone()));
        }
        if let Some(ref v) = self.order_by {
            pairs.push(("$orderby".to_string(), v.clone()));
        }
        if let Some(ref v) = self.group_by {
            pairs.push(("$groupby".to_string(), v.clone()));
        }
        if let Some(ref v) = self.having {
            pairs.push(("$having".to_string(), v.clone()));
        }
        if let Some(v) = self.top {
            pairs.push(("$top".to_string(), v.to_string()));
        }
        if let Some(v) = self.skip {
            pairs.push(("$skip".to_string(), v.to_string()));
        }
        if let Some(v) = self.distinct {
            pairs.push(("$distinct".to_string(), v.to_string()));
        }
        if let Some(v) = self.user_id {
            pairs.push(("$userId".to_string(), v.to_string()));
        }
        if let Some(v) = self.global_filter_id {
            pairs.push(("$globalFilterId".to_string(), v.to_string()));
        }
        if let Some(v) = self.allow_create {
            pairs.push(("$allowCreate".to_string(), v.to_string()));
        }
        for id in &self.ids {
            pairs.push(("id".to_string(), id.to_string()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_produce_no_pairs() {
        assert!(QueryParams::new().to_pairs().is_empty());
    }

    #[test]
    fn scalar_params_render_in_fixed_order() {
        let pairs = QueryParams::new()
            .filter("Contact_Status_ID=1")
            .select("Contact_ID")
            .top(10)
            .user_id(42)
            .to_pairs();

        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["$select", "$filter", "$top", "$userId"]);
    }

    #[test]
    fn booleans_render_as_lowercase() {
        let pairs = QueryParams::new()
            .distinct(true)
            .allow_create(true)
            .to_pairs();
        assert!(pairs.contains(&("$distinct".to_string(), "true".to_string())));
        assert!(pairs.contains(&("$allowCreate".to_string(), "true".to_string())));
    }

    #[test]
    fn ids_render_as_repeated_key() {
        let pairs = QueryParams::new().ids(vec![1, 2, 3]).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "1".to_string()),
                ("id".to_string(), "2".to_string()),
                ("id".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn ids_round_trip_through_url_encoding() {
        let pairs = QueryParams::new()
            .filter("Widget_ID > 5")
            .ids(vec![9, 3, 7])
            .to_pairs();

        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&pairs)
            .finish();

        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();

        let ids: Vec<&str> = decoded
            .iter()
            .filter(|(k, _)| k == "id")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, ["9", "3", "7"]);

        let filter = decoded.iter().find(|(k, _)| k == "$filter").unwrap();
        assert_eq!(filter.1, "Widget_ID > 5");
    }
}
