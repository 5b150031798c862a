//! Core data model: contract interface description (JSON ABI), addresses,
//! emission maps, and generated queries.
//!
//! All types here are immutable value objects. They deserialize from the
//! standard Solidity JSON ABI layout so compiler output can be fed in as-is.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading an interface description.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to parse ABI JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ABI must be a JSON array (or an object with an `abi` array)")]
    NotAnArray,
    #[error("Invalid ABI item at index {index}: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Declared state mutability of a function.
///
/// Unknown strings are kept as `Unrecognized` so the categorizer can report them
/// instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
    Unrecognized(String),
}

impl Mutability {
    pub fn as_str(&self) -> &str {
        match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::Nonpayable => "nonpayable",
            Mutability::Payable => "payable",
            Mutability::Unrecognized(other) => other.as_str(),
        }
    }

    /// `pure` and `view` functions cannot change contract state.
    pub fn is_read_only(&self) -> bool {
        match self {
            Mutability::Pure | Mutability::View => true,
            Mutability::Nonpayable | Mutability::Payable | Mutability::Unrecognized(_) => false,
        }
    }

    /// `nonpayable` and `payable` functions may change contract state.
    pub fn is_mutating(&self) -> bool {
        match self {
            Mutability::Nonpayable | Mutability::Payable => true,
            Mutability::Pure | Mutability::View | Mutability::Unrecognized(_) => false,
        }
    }
}

impl From<String> for Mutability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pure" => Mutability::Pure,
            "view" => Mutability::View,
            "nonpayable" => Mutability::Nonpayable,
            "payable" => Mutability::Payable,
            _ => Mutability::Unrecognized(value),
        }
    }
}

impl From<&str> for Mutability {
    fn from(value: &str) -> Self {
        Mutability::from(value.to_string())
    }
}

impl From<Mutability> for String {
    fn from(value: Mutability) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function or event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// May be empty for anonymous parameters.
    #[serde(default)]
    pub name: String,
    /// Type descriptor, e.g. `uint256`, `address`, `bytes32[]`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Only meaningful for event inputs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    #[serde(rename = "internalType", default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Parameter>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            indexed: false,
            internal_type: None,
            components: Vec::new(),
        }
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Integer types (`uint*`, `int*`) are treated as plottable values.
    pub fn is_numeric(&self) -> bool {
        self.kind.starts_with("uint") || self.kind.starts_with("int")
    }

    /// Name suitable for display; anonymous parameters become `param{index}`.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("param{index}")
        } else {
            self.name.clone()
        }
    }
}

/// A function entry from the ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<Parameter>,
    #[serde(rename = "stateMutability", default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<Mutability>,
    /// Pre-0.4.16 ABI flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// Pre-0.4.16 ABI flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
}

impl Function {
    pub fn new(name: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            state_mutability: Some(mutability),
            constant: None,
            payable: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<Parameter>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<Parameter>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Effective mutability. `stateMutability` wins; legacy ABIs fall back to the
    /// `constant` / `payable` flags. An entry carrying none of the three is
    /// `Unrecognized("")`.
    pub fn mutability(&self) -> Mutability {
        if let Some(m) = &self.state_mutability {
            return m.clone();
        }
        match (self.constant, self.payable) {
            (None, None) => Mutability::Unrecognized(String::new()),
            (Some(true), _) => Mutability::View,
            (_, Some(true)) => Mutability::Payable,
            _ => Mutability::Nonpayable,
        }
    }
}

/// An event entry from the ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub anonymous: bool,
}

impl Event {
    pub fn new(name: impl Into<String>, inputs: Vec<Parameter>) -> Self {
        Self { name: name.into(), inputs, anonymous: false }
    }

    /// First integer-typed parameter with its position, if any.
    pub fn first_numeric_input(&self) -> Option<(usize, &Parameter)> {
        self.inputs.iter().enumerate().find(|(_, p)| p.is_numeric())
    }
}

/// One entry of an interface description, tagged by the ABI `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiItem {
    Function(Function),
    Event(Event),
    /// constructor, error, fallback, receive, or anything newer.
    #[serde(other)]
    Other,
}

/// Ordered list of interface items, as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interface {
    pub items: Vec<AbiItem>,
}

impl Interface {
    pub fn new(items: Vec<AbiItem>) -> Self {
        Self { items }
    }

    /// Parse a JSON ABI string. Accepts a bare array or a compiler artifact
    /// object carrying an `abi` array.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ModelError> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut obj) => match obj.remove("abi") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(ModelError::NotAnArray),
            },
            _ => return Err(ModelError::NotAnArray),
        };

        let mut items = Vec::with_capacity(entries.len());
        for (index, mut entry) in entries.into_iter().enumerate() {
            // Legacy ABIs omit `type` for functions.
            if let Value::Object(obj) = &mut entry {
                obj.entry("type").or_insert_with(|| Value::String("function".into()));
            }
            let item = serde_json::from_value::<AbiItem>(entry)
                .map_err(|source| ModelError::InvalidItem { index, source })?;
            items.push(item);
        }
        Ok(Self { items })
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            AbiItem::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.items.iter().filter_map(|item| match item {
            AbiItem::Event(e) => Some(e),
            _ => None,
        })
    }
}

/// Errors raised when parsing a contract address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("Address must be 40 hex characters after 0x, got {0}")]
    BadLength(usize),
    #[error("Address contains non-hex characters: {0}")]
    InvalidHex(String),
}

/// A 20-byte contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(trimmed.to_string()))?;
        if digits.len() != 40 {
            return Err(AddressError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AddressError::InvalidHex(trimmed.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex without the `0x` prefix, as the query engine's `decode()` expects.
    pub fn to_query_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_query_hex())
    }
}

/// What is known about the events a function emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission<'a> {
    Known(&'a [String]),
    /// No evidence either way. Never read this as "emits nothing".
    Unknown,
}

/// Best-effort mapping from function name to the events it may emit.
///
/// A missing key means "unknown", not "emits nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionMap(BTreeMap<String, Vec<String>>);

impl EmissionMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Replace the event list for `function`.
    pub fn set(&mut self, function: impl Into<String>, events: Vec<String>) {
        self.0.insert(function.into(), events);
    }

    /// Append `event` to `function`'s list unless already present.
    pub fn push_unique(&mut self, function: &str, event: &str) {
        let events = self.0.entry(function.to_string()).or_default();
        if !events.iter().any(|e| e == event) {
            events.push(event.to_string());
        }
    }

    pub fn get(&self, function: &str) -> Option<&[String]> {
        self.0.get(function).map(|v| v.as_slice())
    }

    pub fn lookup(&self, function: &str) -> Emission<'_> {
        match self.get(function) {
            Some(events) => Emission::Known(events),
            None => Emission::Unknown,
        }
    }

    pub fn contains(&self, function: &str) -> bool {
        self.0.contains_key(function)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for EmissionMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rendering a generated query is suited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// A ready-to-submit query with a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub name: String,
    pub description: String,
    pub query_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<ChartKind>,
}
