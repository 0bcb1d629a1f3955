//! Measure argument schema and user-supplied values.
//!
//! The host passes argument values by name; this module declares what the measure
//! accepts and checks a value map against that declaration before the run.

use std::collections::BTreeMap;
use std::fmt;

use crate::export::DestinationMode;

pub const CUSTOM_NAME: &str = "custom_name";
pub const DESTINATION_DIR: &str = "destination_dir";
pub const CUSTOM_PATH: &str = "custom_path";
pub const USE_VERSIONING: &str = "use_versioning";
pub const VERSION_SUFFIX: &str = "version_suffix";

pub const DESTINATION_CHOICES: &[&str] = &[DestinationMode::GENERATED_LABEL, DestinationMode::CUSTOM_LABEL];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    String,
    Choice(&'static [&'static str]),
    Bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            ArgValue::Bool(_) => None,
        }
    }

    /// Bools may arrive typed or as "true"/"false" text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            ArgValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub kind: ArgumentKind,
    pub required: bool,
    pub default: Option<ArgValue>,
}

/// Argument declarations of the export measure, in host display order.
pub fn export_arguments() -> Vec<ArgumentSpec> {
    vec![
        ArgumentSpec {
            name: CUSTOM_NAME,
            display_name: "Custom File Name",
            description: "Specify a custom name for the exported OSM file. Do not include the .osm extension. If left blank, the default name will be used.",
            kind: ArgumentKind::String,
            required: false,
            default: None,
        },
        ArgumentSpec {
            name: DESTINATION_DIR,
            display_name: "Destination Directory",
            description: "Where the exported OSM file is written.",
            kind: ArgumentKind::Choice(DESTINATION_CHOICES),
            required: true,
            default: Some(ArgValue::Str(DestinationMode::GENERATED_LABEL.into())),
        },
        ArgumentSpec {
            name: CUSTOM_PATH,
            display_name: "Custom Path",
            description: "Specify a custom path for the exported OSM file. This is used if \"Custom Path\" is selected as the destination directory.",
            kind: ArgumentKind::String,
            required: false,
            default: None,
        },
        ArgumentSpec {
            name: USE_VERSIONING,
            display_name: "Use Versioning",
            description: "If selected, the exported file will have a version number appended to its name.",
            kind: ArgumentKind::Bool,
            required: true,
            default: Some(ArgValue::Bool(false)),
        },
        ArgumentSpec {
            name: VERSION_SUFFIX,
            display_name: "Version Suffix",
            description: "Specify a suffix to use before the version number. For example, \"_v\". This is used if versioning is enabled.",
            kind: ArgumentKind::String,
            required: false,
            default: Some(ArgValue::Str(String::new())),
        },
    ]
}

/// Values supplied by the user, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserArguments {
    values: BTreeMap<String, ArgValue>,
}

impl UserArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: ArgValue) -> &mut Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.set(name, ArgValue::Str(value.into()))
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.set(name, ArgValue::Bool(value))
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `args` against `schema`. Returns every problem found.
pub fn validate_user_arguments(schema: &[ArgumentSpec], args: &UserArguments) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for name in args.values.keys() {
        if !schema.iter().any(|s| s.name == name.as_str()) {
            problems.push(format!("Unknown argument '{name}'"));
        }
    }

    for spec in schema {
        let Some(value) = args.get(spec.name).or(spec.default.as_ref()) else {
            if spec.required {
                problems.push(format!("Required argument '{}' has no value", spec.name));
            }
            continue;
        };
        match &spec.kind {
            ArgumentKind::String => {
                if value.as_str().is_none() {
                    problems.push(format!("Argument '{}' expects text, got '{value}'", spec.name));
                }
            }
            ArgumentKind::Bool => {
                if value.as_bool().is_none() {
                    problems.push(format!("Argument '{}' expects true or false, got '{value}'", spec.name));
                }
            }
            ArgumentKind::Choice(choices) => match value.as_str() {
                Some(s) if choices.iter().any(|c| *c == s) => {}
                _ => problems.push(format!(
                    "Argument '{}' must be one of [{}], got '{value}'",
                    spec.name,
                    choices.join(", ")
                )),
            },
        }
    }

    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

/// Validated accessors with schema defaults applied.
pub(crate) struct ArgumentReader<'a> {
    schema: &'a [ArgumentSpec],
    args: &'a UserArguments,
}

impl<'a> ArgumentReader<'a> {
    pub(crate) fn new(schema: &'a [ArgumentSpec], args: &'a UserArguments) -> Self {
        Self { schema, args }
    }

    fn value(&self, name: &str) -> Option<&'a ArgValue> {
        self.args.get(name).or_else(|| {
            self.schema
                .iter()
                .find(|s| s.name == name)
                .and_then(|s| s.default.as_ref())
        })
    }

    /// Text value; blank counts as absent.
    pub(crate) fn optional_string(&self, name: &str) -> Option<String> {
        self.value(name)
            .and_then(ArgValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Text value kept verbatim, or empty.
    pub(crate) fn string_or_default(&self, name: &str) -> String {
        self.value(name)
            .and_then(ArgValue::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    }

    pub(crate) fn bool_value(&self, name: &str) -> bool {
        self.value(name).and_then(ArgValue::as_bool).unwrap_or(false)
    }
}
