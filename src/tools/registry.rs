//! Name to capability lookup for the remote tools.
//!
//! Each capability is registered with a description and a JSON Schema for its
//! arguments derived from a typed input struct. Lookups and argument parsing
//! never fault: both failure modes come back as an error [`ToolOutput`].

use crate::tools::{RemoteDbTools, ToolOutput};
use futures_util::future::BoxFuture;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const GET_SCHEMA: &str = "get_schema";
pub const RUN_QUERY: &str = "run_query";

const GET_SCHEMA_DESCRIPTION: &str = "Get the database schema: every table with its columns, \
     their data types and nullability. Call this before run_query whenever the table structure \
     is not already known.";

const RUN_QUERY_DESCRIPTION: &str = "Execute a SQL query against the database and return the \
     result rows as JSON. Only use read-only statements (SELECT). Call get_schema first if you \
     do not know the table and column names.";

/// Arguments of `get_schema`. Takes none.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetSchemaInput {}

/// Arguments of `run_query`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RunQueryInput {
    /// The SQL statement to execute. Read-only statements only.
    pub query: String,
}

pub type ToolHandler = for<'a> fn(&'a RemoteDbTools, JsonValue) -> BoxFuture<'a, ToolOutput>;

/// One named capability.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: JsonValue,
    pub handler: ToolHandler,
}

impl ToolSpec {
    fn new<I: JsonSchema>(
        name: &'static str,
        description: &'static str,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name,
            description,
            input_schema: schemars::schema_for!(I).to_value(),
            handler,
        }
    }

    /// Name, description and input schema as one JSON object, the shape tool
    /// calling APIs expect.
    pub fn definition(&self) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }
}

pub struct ToolRegistry {
    tools: RemoteDbTools,
    specs: HashMap<&'static str, ToolSpec>,
}

impl ToolRegistry {
    /// Registry with both bridge capabilities bound to `tools`.
    pub fn new(tools: RemoteDbTools) -> Self {
        let mut registry = Self {
            tools,
            specs: HashMap::new(),
        };
        registry.register(ToolSpec::new::<GetSchemaInput>(
            GET_SCHEMA,
            GET_SCHEMA_DESCRIPTION,
            get_schema,
        ));
        registry.register(ToolSpec::new::<RunQueryInput>(
            RUN_QUERY,
            RUN_QUERY_DESCRIPTION,
            run_query,
        ));
        registry
    }

    pub fn register(&mut self, spec: ToolSpec) {
        debug!(tool = spec.name, "Registering tool");
        self.specs.insert(spec.name, spec);
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.get(name)
    }

    /// All specs, sorted by name.
    pub fn specs(&self) -> Vec<&ToolSpec> {
        let mut specs: Vec<_> = self.specs.values().collect();
        specs.sort_by_key(|spec| spec.name);
        specs
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs().into_iter().map(|spec| spec.name).collect()
    }

    /// Invoke a capability by name.
    pub async fn call(&self, name: &str, arguments: JsonValue) -> ToolOutput {
        let Some(spec) = self.specs.get(name) else {
            warn!(tool = name, "Unknown tool");
            return ToolOutput::error(
                format!(
                    "Unknown tool '{}'. Available tools: {}",
                    name,
                    self.names().join(", ")
                ),
                false,
            );
        };
        debug!(tool = name, "Calling tool");
        (spec.handler)(&self.tools, arguments).await
    }
}

/// Parse tool arguments. `null` counts as an empty object.
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: JsonValue) -> Result<T, ToolOutput> {
    let arguments = match arguments {
        JsonValue::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| {
        warn!(tool, error = %e, "Invalid tool arguments");
        ToolOutput::error(format!("Invalid arguments for {}: {}", tool, e), false)
    })
}

fn get_schema(tools: &RemoteDbTools, arguments: JsonValue) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        if let Err(out) = parse_args::<GetSchemaInput>(GET_SCHEMA, arguments) {
            return out;
        }
        tools.get_schema().await
    })
}

fn run_query(tools: &RemoteDbTools, arguments: JsonValue) -> BoxFuture<'_, ToolOutput> {
    Box::pin(async move {
        match parse_args::<RunQueryInput>(RUN_QUERY, arguments) {
            Ok(input) => tools.run_query(&input.query).await,
            Err(out) => out,
        }
    })
}
