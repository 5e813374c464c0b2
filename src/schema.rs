//! Output schemas sent along with extraction requests.

use crate::error::Result;
use crate::validate;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

/// Desired shape of extracted data.
///
/// Either a hand-written JSON Schema object or a schema derived from a Rust
/// type. Both serialize to plain JSON Schema in the request payload.
///
/// ```rust
/// use scrapegraph::OutputSchema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// let schema = OutputSchema::of::<Product>();
/// let json = schema.to_json_schema().unwrap();
/// assert!(json["properties"]["price"].is_object());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutputSchema {
    /// Raw JSON Schema. Must be a JSON object.
    Json(Value),
    /// Schema generated from a type implementing [`JsonSchema`].
    Typed(RootSchema),
}

impl OutputSchema {
    /// Derive a schema from a Rust type.
    pub fn of<T: JsonSchema>() -> Self {
        OutputSchema::Typed(schemars::schema_for!(T))
    }

    /// Canonical JSON Schema representation.
    pub fn to_json_schema(&self) -> Result<Value> {
        match self {
            OutputSchema::Json(value) => {
                validate::object("output_schema", value)?;
                Ok(value.clone())
            }
            OutputSchema::Typed(root) => Ok(serde_json::to_value(root)?),
        }
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        match self {
            OutputSchema::Json(value) => validate::object(field, value),
            OutputSchema::Typed(_) => Ok(()),
        }
    }
}

impl From<Value> for OutputSchema {
    fn from(value: Value) -> Self {
        OutputSchema::Json(value)
    }
}

impl From<RootSchema> for OutputSchema {
    fn from(root: RootSchema) -> Self {
        OutputSchema::Typed(root)
    }
}
