//! Property descriptors
//!
//! The host's descriptor carries many optional fields. The stand-in keeps every
//! attribute it is given in an open map and only offers typed accessors for the
//! well-known ones, so descriptors written for the real host never fail here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const REQUIRED: &str = "required";
pub const SENSITIVE: &str = "sensitive";
pub const DEFAULT_VALUE: &str = "defaultValue";
pub const ALLOWABLE_VALUES: &str = "allowableValues";
pub const VALIDATORS: &str = "validators";
pub const EXPRESSION_LANGUAGE_SCOPE: &str = "expressionLanguageScope";

/// Validator identifiers understood by the host
pub struct StandardValidators;

impl StandardValidators {
    pub const NON_EMPTY_VALIDATOR: &'static str = "NON_EMPTY_VALIDATOR";
    pub const INTEGER_VALIDATOR: &'static str = "INTEGER_VALIDATOR";
    pub const PORT_VALIDATOR: &'static str = "PORT_VALIDATOR";
    pub const NUMBER_VALIDATOR: &'static str = "NUMBER_VALIDATOR";
}

/// Scope in which expression language is evaluated for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpressionLanguageScope {
    FlowfileAttributes,
    None,
}

impl ExpressionLanguageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionLanguageScope::FlowfileAttributes => "FLOWFILE_ATTRIBUTES",
            ExpressionLanguageScope::None => "NONE",
        }
    }
}

/// Descriptive metadata for one configurable processor property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyDescriptor {
    attributes: Map<String, Value>,
}

impl PropertyDescriptor {
    /// Descriptor with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().attribute(NAME, name.into())
    }

    /// Descriptor from an arbitrary set of named attributes
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set any attribute, known or not
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.attribute(DESCRIPTION, description.into())
    }

    pub fn required(self, required: bool) -> Self {
        self.attribute(REQUIRED, required)
    }

    pub fn sensitive(self, sensitive: bool) -> Self {
        self.attribute(SENSITIVE, sensitive)
    }

    pub fn default_value(self, value: impl Into<String>) -> Self {
        self.attribute(DEFAULT_VALUE, value.into())
    }

    pub fn allowable_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = values.into_iter().map(|v| Value::String(v.into())).collect();
        self.attribute(ALLOWABLE_VALUES, values)
    }

    pub fn validators<I, S>(self, validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let validators: Vec<Value> = validators
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect();
        self.attribute(VALIDATORS, validators)
    }

    pub fn expression_language_scope(self, scope: ExpressionLanguageScope) -> Self {
        self.attribute(EXPRESSION_LANGUAGE_SCOPE, scope.as_str())
    }

    /// Raw attribute lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// All attributes as declared
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// The name, when it was declared as a string
    pub fn name(&self) -> Option<&str> {
        self.get(NAME).and_then(Value::as_str)
    }

    /// The default value, when it was declared as a string
    pub fn default_str(&self) -> Option<&str> {
        self.get(DEFAULT_VALUE).and_then(Value::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.get(REQUIRED).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_sensitive(&self) -> bool {
        self.get(SENSITIVE).and_then(Value::as_bool).unwrap_or(false)
    }
}
