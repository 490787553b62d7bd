//! Stored-procedure execution.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::PlatformClient;
use crate::error::Error;
use crate::types::Procedure;

/// A single row from a procedure result set.
pub type Row = serde_json::Map<String, Value>;

/// One tabular result set; a procedure may return several per call.
pub type ResultSet = Vec<Row>;

/// Named parameters for a stored procedure.
///
/// The platform addresses procedure parameters as `@Name`; the builder
/// normalizes a missing `@` prefix. Parameters are kept in name order so
/// the rendered query string is deterministic.
///
/// # Example
///
/// ```
/// use steeple::ProcParams;
///
/// let params = ProcParams::new()
///     .with("WidgetId", 5)
///     .with("@IncludeArchived", false);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcParams(BTreeMap<String, Value>);

impl ProcParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, normalizing the name to a leading `@`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let name = if name.starts_with('@') {
            name
        } else {
            format!("@{}", name)
        };
        self.0.insert(name, value.into());
        self
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the parameters as URL query pairs.
    ///
    /// String values are passed raw; everything else is rendered as JSON.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), rendered)
            })
            .collect()
    }
}

/// Stored-procedure execution against `/procs/{procedure}`.
///
/// A procedure returns a sequence of result sets, each a sequence of
/// loosely-typed rows. The caller owns the contract: how many result sets
/// a given procedure returns and what each represents is not validated
/// here.
#[derive(Debug, Clone)]
pub struct ProcedureService {
    client: PlatformClient,
}

impl ProcedureService {
    /// Create a procedure service over the given client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// Execute a procedure with query-string parameters (read-oriented).
    #[instrument(skip(self, params), fields(procedure = %procedure))]
    pub async fn execute(
        &self,
        procedure: &Procedure,
        params: &ProcParams,
    ) -> Result<Vec<ResultSet>, Error> {
        debug!("executing stored procedure");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get(&proc_path(procedure), &params.to_pairs(), Some(&token))
            .await
    }

    /// Execute a procedure with a JSON body, for complex or structured
    /// input the query string cannot carry.
    #[instrument(skip(self, body), fields(procedure = %procedure))]
    pub async fn execute_with_body<B>(
        &self,
        procedure: &Procedure,
        body: &B,
    ) -> Result<Vec<ResultSet>, Error>
    where
        B: Serialize + ?Sized,
    {
        debug!("executing stored procedure with body");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .post_json(&proc_path(procedure), &[], body, Some(&token))
            .await
    }
}

fn proc_path(procedure: &Procedure) -> String {
    format!("procs/{}", procedure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_normalizes_at_prefix() {
        let params = ProcParams::new().with("WidgetId", 5).with("@Mode", "full");
        let pairs = params.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("@Mode".to_string(), "full".to_string()),
                ("@WidgetId".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn strings_render_raw_and_other_values_as_json() {
        let pairs = ProcParams::new()
            .with("Name", "Grace Campus")
            .with("Archived", false)
            .to_pairs();
        assert!(pairs.contains(&("@Name".to_string(), "Grace Campus".to_string())));
        assert!(pairs.contains(&("@Archived".to_string(), "false".to_string())));
    }

    #[test]
    fn proc_path_construction() {
        let procedure = Procedure::new("api_Widget_GetStats").unwrap();
        assert_eq!(proc_path(&procedure), "procs/api_Widget_GetStats");
    }
}
