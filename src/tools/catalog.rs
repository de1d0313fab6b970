//! Tool catalog — typed metadata, parameter validation, schema generation.
//!
//! The set of tools is closed: one `ToolKind` variant per tool, so wiring a
//! handler for every catalog entry is checked at compile time. Names are
//! only used at the protocol edge (`ToolKind::from_name`).

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::store::{is_valid_html_filename, with_html_suffix};
use crate::types::{DeploymentConfig, MAX_PORT, MIN_PORT};

// =============================================================================
// Tool identity
// =============================================================================

/// Every tool this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CreateHtml,
    DeployServer,
    StopServer,
    ServerStatus,
    ListHtmlFiles,
}

impl ToolKind {
    /// Catalog presentation order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::CreateHtml,
        ToolKind::DeployServer,
        ToolKind::StopServer,
        ToolKind::ServerStatus,
        ToolKind::ListHtmlFiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CreateHtml => "create_html",
            ToolKind::DeployServer => "deploy_server",
            ToolKind::StopServer => "stop_server",
            ToolKind::ServerStatus => "server_status",
            ToolKind::ListHtmlFiles => "list_html_files",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Parameter types
// =============================================================================

/// Closed set of string formats a parameter may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// `[a-zA-Z0-9_-]+\.html`
    HtmlFilename,
}

impl StringFormat {
    /// Equivalent JSON Schema `pattern`.
    pub fn pattern(self) -> &'static str {
        match self {
            StringFormat::HtmlFilename => r"^[a-zA-Z0-9_-]+\.html$",
        }
    }

    pub fn matches(self, value: &str) -> bool {
        match self {
            StringFormat::HtmlFilename => is_valid_html_filename(value),
        }
    }
}

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    String {
        format: Option<StringFormat>,
    },
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            ParamType::String { format } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("expected string, got {}", value_type_name(value)))?;
                match format {
                    Some(format) if !format.matches(s) => Err(format!(
                        "'{}' does not match pattern {}",
                        s,
                        format.pattern()
                    )),
                    _ => Ok(()),
                }
            }
            ParamType::Integer { minimum, maximum } => {
                let n = integer_value(value)
                    .ok_or_else(|| format!("expected integer, got {}", value_type_name(value)))?;
                if let Some(min) = minimum {
                    if n < *min {
                        return Err(format!("{} is less than the minimum of {}", n, min));
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        return Err(format!("{} is greater than the maximum of {}", value, max));
                    }
                }
                Ok(())
            }
        }
    }

    fn json_schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            ParamType::String { format } => {
                schema.insert("type".into(), "string".into());
                if let Some(format) = format {
                    schema.insert("pattern".into(), format.pattern().into());
                }
            }
            ParamType::Integer { minimum, maximum } => {
                schema.insert("type".into(), "integer".into());
                if let Some(min) = minimum {
                    schema.insert("minimum".into(), (*min).into());
                }
                if let Some(max) = maximum {
                    schema.insert("maximum".into(), (*max).into());
                }
            }
        }
        schema
    }
}

/// Integer reading of a JSON number, as JSON Schema's `integer` sees it:
/// `8080.0` counts, `8080.5` does not. Values past `i64` saturate, which
/// puts them outside any declared bound.
fn integer_value(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    if v.is_u64() {
        return Some(i64::MAX);
    }
    match v.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: &'static str,
    pub param_type: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
}

// =============================================================================
// Tool descriptor
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub description: String,
    pub parameters: Vec<ParamDef>,
}

impl ToolDescriptor {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// JSON Schema for the tool's arguments object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut schema = param.param_type.json_schema();
            schema.insert("description".into(), param.description.into());
            if let Some(default) = &param.default {
                schema.insert("default".into(), default.clone());
            }
            properties.insert(param.name.to_string(), Value::Object(schema));
            if param.required {
                required.push(Value::from(param.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema.insert("additionalProperties".into(), Value::Bool(false));
        Value::Object(schema)
    }

    /// Entry as advertised by `tools/list`.
    pub fn to_mcp_value(&self) -> Value {
        serde_json::json!({
            "name": self.name(),
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

// =============================================================================
// Normalized arguments
// =============================================================================

/// Arguments after validation and default filling, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArgs {
    CreateHtml { filename: String, content: String },
    DeployServer { port: u16 },
    StopServer,
    ServerStatus,
    ListHtmlFiles,
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Ordered, immutable tool catalog.
#[derive(Debug)]
pub struct ToolCatalog {
    entries: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new(deployment: &DeploymentConfig) -> Self {
        let entries = ToolKind::ALL
            .into_iter()
            .map(|kind| describe(kind, deployment))
            .collect();
        Self { entries }
    }

    /// All descriptors in presentation order.
    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.entries
    }

    pub fn get(&self, kind: ToolKind) -> Option<&ToolDescriptor> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Resolve a protocol-level tool name.
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        ToolKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate arguments against a descriptor's parameter definitions.
    ///
    /// Returns a list of validation errors (empty = valid).
    pub fn validate_params(
        descriptor: &ToolDescriptor,
        params: &Map<String, Value>,
    ) -> Vec<String> {
        let mut errors = Vec::new();

        for param_def in &descriptor.parameters {
            if param_def.required && !params.contains_key(param_def.name) {
                errors.push(format!("Missing required parameter: {}", param_def.name));
            }
        }

        let known_names: HashMap<&str, &ParamDef> = descriptor
            .parameters
            .iter()
            .map(|p| (p.name, p))
            .collect();

        for (key, value) in params {
            if let Some(param_def) = known_names.get(key.as_str()) {
                if let Err(e) = param_def.param_type.validate(value) {
                    errors.push(format!("Parameter '{}': {}", key, e));
                }
            } else {
                errors.push(format!("Unknown parameter: {}", key));
            }
        }

        errors
    }

    /// Fill in default values for missing optional parameters.
    pub fn fill_defaults(descriptor: &ToolDescriptor, params: &mut Map<String, Value>) {
        for param_def in &descriptor.parameters {
            if !params.contains_key(param_def.name) {
                if let Some(default) = &param_def.default {
                    params.insert(param_def.name.to_string(), default.clone());
                }
            }
        }
    }

    /// Normalize, validate and type the arguments for `descriptor`.
    ///
    /// The error string is meant for the calling agent: it lists every
    /// violated constraint so a corrected retry is possible.
    pub fn prepare(
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<ToolArgs, String> {
        let mut params = arguments.clone();

        // create_html appends the suffix instead of rejecting a bare name
        if descriptor.kind == ToolKind::CreateHtml {
            if let Some(Value::String(filename)) = params.get_mut("filename") {
                *filename = with_html_suffix(filename);
            }
        }

        let errors = Self::validate_params(descriptor, &params);
        if !errors.is_empty() {
            return Err(format!(
                "Invalid arguments for {}: {}",
                descriptor.name(),
                errors.join("; ")
            ));
        }

        Self::fill_defaults(descriptor, &mut params);

        let args = match descriptor.kind {
            ToolKind::CreateHtml => ToolArgs::CreateHtml {
                filename: string_param(&params, "filename")?,
                content: string_param(&params, "content")?,
            },
            ToolKind::DeployServer => {
                let port = params
                    .get("port")
                    .and_then(integer_value)
                    .and_then(|p| u16::try_from(p).ok())
                    .ok_or_else(|| "Parameter 'port': expected a port number".to_string())?;
                ToolArgs::DeployServer { port }
            }
            ToolKind::StopServer => ToolArgs::StopServer,
            ToolKind::ServerStatus => ToolArgs::ServerStatus,
            ToolKind::ListHtmlFiles => ToolArgs::ListHtmlFiles,
        };
        Ok(args)
    }
}

fn string_param(params: &Map<String, Value>, key: &str) -> Result<String, String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("Missing required parameter: {}", key))
}

fn describe(kind: ToolKind, deployment: &DeploymentConfig) -> ToolDescriptor {
    match kind {
        ToolKind::CreateHtml => ToolDescriptor {
            kind,
            description: "Create an HTML file in the content directory. Accepts complete \
                          HTML content; an existing file with the same name is overwritten. \
                          Files are served automatically while the web server is running."
                .to_string(),
            parameters: vec![
                ParamDef {
                    name: "filename",
                    param_type: ParamType::String {
                        format: Some(StringFormat::HtmlFilename),
                    },
                    description: "File name (e.g. index.html, about.html). \
                                  '.html' is appended when missing.",
                    required: true,
                    default: None,
                },
                ParamDef {
                    name: "content",
                    param_type: ParamType::String { format: None },
                    description: "Complete HTML content of the file",
                    required: true,
                    default: None,
                },
            ],
        },
        ToolKind::DeployServer => ToolDescriptor {
            kind,
            description: format!(
                "Deploy a web server container ({}) serving the HTML files of the content \
                 directory. Any previous deployment is replaced. The server becomes \
                 reachable at http://localhost:PORT (default: {}).",
                deployment.image, deployment.default_port
            ),
            parameters: vec![ParamDef {
                name: "port",
                param_type: ParamType::Integer {
                    minimum: Some(i64::from(MIN_PORT)),
                    maximum: Some(i64::from(MAX_PORT)),
                },
                description: "Host port to publish the server on",
                required: false,
                default: Some(Value::from(deployment.default_port)),
            }],
        },
        ToolKind::StopServer => ToolDescriptor {
            kind,
            description: "Stop and remove the web server container. HTML files in the \
                          content directory are kept."
                .to_string(),
            parameters: Vec::new(),
        },
        ToolKind::ServerStatus => ToolDescriptor {
            kind,
            description: "Check whether the web server container is running, and report \
                          its identifier, status and published ports."
                .to_string(),
            parameters: Vec::new(),
        },
        ToolKind::ListHtmlFiles => ToolDescriptor {
            kind,
            description: "List the HTML files in the content directory with their size and \
                          modification time. Useful to see what the server will serve."
                .to_string(),
            parameters: Vec::new(),
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
