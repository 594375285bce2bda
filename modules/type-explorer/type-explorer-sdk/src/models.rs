//! Models for the type explorer.
//!
//! The snapshot mirrors the `typeExplorer` document a metadata server returns:
//! four optional maps keyed by type name. Descriptor contents are owned by the
//! server and kept as opaque JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition keys a server may use for the core of a descriptor, one per category.
const DEFINITION_KEYS: [&str; 4] = [
    "entityDef",
    "relationshipDef",
    "classificationDef",
    "enumDef",
];

/// Opaque description of a single type.
///
/// Cloning is cheap: the underlying JSON is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(Arc<Value>);

impl TypeDescriptor {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Raw JSON of the descriptor.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Top-level field of the descriptor, if it is an object.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.as_object().and_then(|obj| obj.get(field))
    }

    /// The embedded type definition (`entityDef`, `relationshipDef`, ...), if any.
    #[must_use]
    pub fn definition(&self) -> Option<&Value> {
        DEFINITION_KEYS.iter().find_map(|key| self.get(key))
    }

    /// Description text of the embedded definition.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.definition()
            .and_then(|def| def.get("description"))
            .and_then(Value::as_str)
    }
}

impl From<Value> for TypeDescriptor {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Type name to descriptor, ordered by name.
pub type TypeMap = BTreeMap<String, TypeDescriptor>;

/// The four kinds of type a server describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Entity,
    Relationship,
    Classification,
    Enum,
}

impl TypeCategory {
    pub const ALL: [Self; 4] = [
        Self::Entity,
        Self::Relationship,
        Self::Classification,
        Self::Enum,
    ];

    /// Key of this category in the `typeExplorer` document.
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::Entity => "entities",
            Self::Relationship => "relationships",
            Self::Classification => "classifications",
            Self::Enum => "enums",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Entity => "entity",
            Self::Relationship => "relationship",
            Self::Classification => "classification",
            Self::Enum => "enum",
        };
        f.write_str(label)
    }
}

/// Error returned when parsing an unknown [`TypeCategory`] name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown type category '{0}' (expected entity, relationship, classification or enum)")]
pub struct ParseCategoryError(String);

impl FromStr for TypeCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "entity" | "entities" => Ok(Self::Entity),
            "relationship" | "relationships" => Ok(Self::Relationship),
            "classification" | "classifications" => Ok(Self::Classification),
            "enum" | "enums" => Ok(Self::Enum),
            _ => Err(ParseCategoryError(s.to_owned())),
        }
    }
}

/// Complete in-memory copy of a server's type-system description.
///
/// A category that the server did not send is `None`, which is distinct from an
/// empty map only to the extent the server made it so.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRegistrySnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Arc<TypeMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Arc<TypeMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Arc<TypeMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enums: Option<Arc<TypeMap>>,
}

impl TypeRegistrySnapshot {
    /// The empty snapshot: no category populated.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no category is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        TypeCategory::ALL
            .iter()
            .all(|category| self.category(*category).is_none())
    }

    /// The map for `category`, if the server sent one.
    #[must_use]
    pub fn category(&self, category: TypeCategory) -> Option<&Arc<TypeMap>> {
        match category {
            TypeCategory::Entity => self.entities.as_ref(),
            TypeCategory::Relationship => self.relationships.as_ref(),
            TypeCategory::Classification => self.classifications.as_ref(),
            TypeCategory::Enum => self.enums.as_ref(),
        }
    }

    /// Builder-style setter used when assembling a snapshot by hand.
    #[must_use]
    pub fn with_category(mut self, category: TypeCategory, types: TypeMap) -> Self {
        let slot = match category {
            TypeCategory::Entity => &mut self.entities,
            TypeCategory::Relationship => &mut self.relationships,
            TypeCategory::Classification => &mut self.classifications,
            TypeCategory::Enum => &mut self.enums,
        };
        *slot = Some(Arc::new(types));
        self
    }

    /// Looks up `name` in `category`.
    #[must_use]
    pub fn type_of(&self, category: TypeCategory, name: &str) -> Option<&TypeDescriptor> {
        self.category(category).and_then(|types| types.get(name))
    }
}

/// Body of the "get types" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypesRequest {
    pub server_name: String,
    pub platform_name: String,
    pub enterprise_option: bool,
}

impl TypesRequest {
    #[must_use]
    pub fn new(
        server_name: impl Into<String>,
        platform_name: impl Into<String>,
        enterprise_option: bool,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            platform_name: platform_name.into(),
            enterprise_option,
        }
    }
}

/// Body of the "get types" response.
///
/// The transport may succeed while the server still reports a failure through
/// `related_http_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypesResponse {
    #[serde(rename = "relatedHTTPCode")]
    pub related_http_code: u16,
    #[serde(default)]
    pub type_explorer: Option<TypeRegistrySnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_error_message: Option<String>,
}

impl TypesResponse {
    /// A 200 response carrying `snapshot`.
    #[must_use]
    pub fn ok(snapshot: TypeRegistrySnapshot) -> Self {
        Self {
            related_http_code: 200,
            type_explorer: Some(snapshot),
            exception_class_name: None,
            exception_error_message: None,
        }
    }

    /// A response with the given status code and no snapshot.
    #[must_use]
    pub fn with_status(related_http_code: u16) -> Self {
        Self {
            related_http_code,
            type_explorer: None,
            exception_class_name: None,
            exception_error_message: None,
        }
    }
}
