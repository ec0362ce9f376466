//! # Signature Codec
//!
//! Canonical function signatures and their 4-byte identifiers.
//!
//! A signature is `name(type1,type2,...)` with tuple parameters expanded
//! recursively as `(sub1,sub2,...)`, no whitespace anywhere. The identifier
//! is the first 4 bytes of `keccak256(utf8(signature))`, the same rule the
//! host uses to dispatch calldata, so a mismatch here routes calls to the
//! wrong module.

use crate::domain::services::keccak256;
use crate::domain::value_objects::Selector;
use crate::errors::AbiError;
use serde::{Deserialize, Serialize};

/// Prefix of functions injected by coverage instrumentation.
const COVERAGE_PREFIX: &str = "coverage_0x";

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// 4-byte identifier of a canonical signature.
#[must_use]
pub fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[..4]);
    Selector::new(bytes)
}

// =============================================================================
// PARAMETER TYPES
// =============================================================================

/// A function parameter type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// A primitive type tag such as `address`, `uint256` or `bytes32`.
    Elementary(String),
    /// A tuple of nested parameter types.
    Tuple(Vec<ParamType>),
    /// An array of a parameter type, dynamic when `len` is `None`.
    Array {
        /// Element type.
        inner: Box<ParamType>,
        /// Fixed length, if any.
        len: Option<usize>,
    },
}

impl ParamType {
    /// Shorthand for [`ParamType::Elementary`].
    #[must_use]
    pub fn elementary(tag: impl Into<String>) -> Self {
        Self::Elementary(tag.into())
    }

    /// Shorthand for [`ParamType::Tuple`].
    #[must_use]
    pub fn tuple(components: Vec<ParamType>) -> Self {
        Self::Tuple(components)
    }

    /// Shorthand for [`ParamType::Array`].
    #[must_use]
    pub fn array(inner: ParamType, len: Option<usize>) -> Self {
        Self::Array {
            inner: Box::new(inner),
            len,
        }
    }

    /// Canonical rendering of this type.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Elementary(tag) => tag.clone(),
            Self::Tuple(components) => format!("({})", join_canonical(components)),
            Self::Array { inner, len: None } => format!("{}[]", inner.canonical()),
            Self::Array {
                inner,
                len: Some(n),
            } => format!("{}[{n}]", inner.canonical()),
        }
    }
}

fn join_canonical(params: &[ParamType]) -> String {
    params
        .iter()
        .map(ParamType::canonical)
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// FUNCTION DESCRIPTOR
// =============================================================================

/// Name plus ordered parameter list of a callable function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Function name.
    pub name: String,
    /// Ordered parameter types.
    pub inputs: Vec<ParamType>,
}

impl FunctionDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Parses a canonical signature back into a descriptor.
    ///
    /// Rejects anything [`canonicalize`] would not produce: whitespace,
    /// unbalanced parentheses or brackets, empty parameters, non-identifier
    /// names and type tags outside `[a-z0-9]`.
    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let malformed = |reason: &str| AbiError::MalformedSignature {
            signature: signature.to_string(),
            reason: reason.to_string(),
        };

        let open = signature.find('(').ok_or_else(|| malformed("missing `(`"))?;
        let name = &signature[..open];
        if !is_identifier(name) {
            return Err(malformed("name is not an identifier"));
        }
        let body = signature[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| malformed("missing closing `)`"))?;
        let inputs = parse_param_list(body).map_err(|reason| malformed(&reason))?;

        Ok(Self::new(name, inputs))
    }

    /// Canonical signature string.
    #[must_use]
    pub fn signature(&self) -> String {
        canonicalize(self)
    }

    /// 4-byte identifier of the canonical signature.
    #[must_use]
    pub fn selector(&self) -> Selector {
        selector_of(&self.signature())
    }
}

/// Renders `name(type1,type2,...)`.
#[must_use]
pub fn canonicalize(function: &FunctionDescriptor) -> String {
    format!("{}({})", function.name, join_canonical(&function.inputs))
}

/// Renders descriptors as an update blob: each signature followed by `;`.
#[must_use]
pub fn signature_list(functions: &[FunctionDescriptor]) -> String {
    functions
        .iter()
        .map(|f| format!("{};", f.signature()))
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn parse_param_list(body: &str) -> Result<Vec<ParamType>, String> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(body)?
        .into_iter()
        .map(parse_param)
        .collect()
}

/// Splits on commas that are not nested inside a tuple.
fn split_top_level(body: &str) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced parentheses".to_string())?;
            }
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }
    parts.push(&body[start..]);
    Ok(parts)
}

fn parse_param(param: &str) -> Result<ParamType, String> {
    if param.is_empty() {
        return Err("empty parameter".to_string());
    }

    // Array suffixes bind last: `(uint256,bool)[2][]` is an array of arrays.
    if let Some(stripped) = param.strip_suffix(']') {
        let open = stripped
            .rfind('[')
            .ok_or_else(|| format!("unbalanced brackets in `{param}`"))?;
        let len = match &stripped[open + 1..] {
            "" => None,
            digits => Some(
                digits
                    .parse::<usize>()
                    .map_err(|_| format!("invalid array length in `{param}`"))?,
            ),
        };
        return Ok(ParamType::array(parse_param(&stripped[..open])?, len));
    }

    if let Some(inner) = param.strip_prefix('(') {
        let inner = inner
            .strip_suffix(')')
            .ok_or_else(|| format!("unbalanced parentheses in `{param}`"))?;
        return Ok(ParamType::Tuple(parse_param_list(inner)?));
    }

    let valid = param.starts_with(|c: char| c.is_ascii_lowercase())
        && param
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !valid {
        return Err(format!("invalid type tag `{param}`"));
    }
    Ok(ParamType::Elementary(param.to_string()))
}

// =============================================================================
// JSON ABI
// =============================================================================

#[derive(Deserialize)]
struct AbiItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<AbiParam>,
}

impl AbiParam {
    fn to_param_type(&self) -> Result<ParamType, AbiError> {
        let Some(mut suffix) = self.kind.strip_prefix("tuple") else {
            return Ok(ParamType::Elementary(self.kind.clone()));
        };

        let components = self
            .components
            .iter()
            .map(AbiParam::to_param_type)
            .collect::<Result<Vec<_>, _>>()?;
        let mut ty = ParamType::Tuple(components);

        // `tuple[2][]`: apply suffixes left to right
        while !suffix.is_empty() {
            let close = suffix
                .find(']')
                .filter(|_| suffix.starts_with('['))
                .ok_or_else(|| AbiError::InvalidAbi(format!("bad type `{}`", self.kind)))?;
            let len = match &suffix[1..close] {
                "" => None,
                digits => Some(digits.parse::<usize>().map_err(|_| {
                    AbiError::InvalidAbi(format!("bad array length in `{}`", self.kind))
                })?),
            };
            ty = ParamType::array(ty, len);
            suffix = &suffix[close + 1..];
        }
        Ok(ty)
    }
}

/// Function descriptors of a JSON ABI, in document order.
///
/// Accepts either a bare ABI array or a build artifact object with an `abi`
/// field. Non-function entries and coverage instrumentation are skipped.
pub fn descriptors_from_abi_json(json: &str) -> Result<Vec<FunctionDescriptor>, AbiError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| AbiError::InvalidAbi(e.to_string()))?;
    let abi = match value {
        serde_json::Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| AbiError::InvalidAbi("object has no `abi` field".to_string()))?,
        other => other,
    };
    let items: Vec<AbiItem> =
        serde_json::from_value(abi).map_err(|e| AbiError::InvalidAbi(e.to_string()))?;

    items
        .into_iter()
        .filter(|item| item.kind == "function")
        .filter(|item| !item.name.starts_with(COVERAGE_PREFIX))
        .map(|item| {
            let inputs = item
                .inputs
                .iter()
                .map(AbiParam::to_param_type)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FunctionDescriptor::new(item.name, inputs))
        })
        .collect()
}

/// Update blob for every function of a JSON ABI.
pub fn signatures_from_abi_json(json: &str) -> Result<String, AbiError> {
    Ok(signature_list(&descriptors_from_abi_json(json)?))
}

// =============================================================================
// TESTS
// =============================================================================
