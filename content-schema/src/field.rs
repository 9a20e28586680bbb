//! Field declarations and field-set composition.
//!
//! A [`FieldSpec`] carries a resolved [`FieldKind`]. Declarations read from
//! JSON keep the kind in its written form ([`KindDecl`]) until the owning
//! document type is defined, so that an unrecognized kind is reported by the
//! construction call together with the field and type it belongs to.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Value kind of a declared field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum FieldKind {
    /// A single string.
    String,
    /// A list of strings.
    ListOfString,
    /// A list of arbitrary JSON values.
    ListOfJson,
}

impl FieldKind {
    /// Resolve a written kind declaration, or `None` if it is not supported.
    #[must_use]
    pub fn resolve(decl: &KindDecl) -> Option<Self> {
        let item = decl.of.as_deref();
        match (decl.type_name.as_str(), item) {
            ("string", None) => Some(Self::String),
            ("list", Some(KindDecl { type_name, of: None })) => match type_name.as_str() {
                "string" => Some(Self::ListOfString),
                "json" => Some(Self::ListOfJson),
                _ => None,
            },
            _ => None,
        }
    }

    /// The written form of this kind.
    #[must_use]
    pub fn to_decl(self) -> KindDecl {
        match self {
            Self::String => KindDecl::named("string"),
            Self::ListOfString => KindDecl::list_of(KindDecl::named("string")),
            Self::ListOfJson => KindDecl::list_of(KindDecl::named("json")),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::ListOfString => f.write_str("list of string"),
            Self::ListOfJson => f.write_str("list of json"),
        }
    }
}

/// A field kind as written in a declaration: `{"type": "list", "of": {"type": "string"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindDecl {
    /// `string`, `json` or `list`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Item kind of a `list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of: Option<Box<KindDecl>>,
}

impl KindDecl {
    /// A kind without an item type, such as `string`.
    #[must_use]
    pub fn named(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            of: None,
        }
    }

    /// A `list` of `item`.
    #[must_use]
    pub fn list_of(item: KindDecl) -> Self {
        Self {
            type_name: "list".to_owned(),
            of: Some(Box::new(item)),
        }
    }
}

impl fmt::Display for KindDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.of {
            Some(item) => write!(f, "{}<{item}>", self.type_name),
            None => f.write_str(&self.type_name),
        }
    }
}

/// One declared field of a document type.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key of the field in the document's data.
    pub name: String,
    pub kind: FieldKind,
    /// Human-readable description shown by `describe`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a document must carry a non-null value.
    pub required: bool,
}

impl FieldSpec {
    /// An optional field of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: false,
        }
    }

    /// An optional string field.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// An optional list of strings.
    #[must_use]
    pub fn list_of_string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ListOfString)
    }

    /// An optional list of arbitrary JSON values.
    #[must_use]
    pub fn list_of_json(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ListOfJson)
    }

    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered mapping from field name to [`FieldSpec`] with unique keys.
///
/// Inserting a name that is already present replaces the definition in
/// place, keeping the original position.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldDefs {
    fields: Vec<FieldSpec>,
}

impl FieldDefs {
    /// An empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FieldDefs::insert`].
    #[must_use]
    pub fn with(mut self, field: FieldSpec) -> Self {
        self.insert(field);
        self
    }

    /// Insert or replace a field, returning the replaced definition.
    pub fn insert(&mut self, field: FieldSpec) -> Option<FieldSpec> {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => Some(std::mem::replace(existing, field)),
            None => {
                self.fields.push(field);
                None
            }
        }
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with this name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldSpec> for FieldDefs {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        let mut defs = Self::new();
        for field in iter {
            defs.insert(field);
        }
        defs
    }
}

impl<'a> IntoIterator for &'a FieldDefs {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Merge field sets left to right; a later set replaces earlier definitions
/// of the same key as a whole.
#[must_use]
pub fn compose_fields(sets: &[&FieldDefs]) -> FieldDefs {
    sets.iter().flat_map(|set| set.iter().cloned()).collect()
}

/// A field as it appears in a document type declaration, with its kind not
/// yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Resolved to a [`FieldKind`] by `define_document_type`.
    pub kind: KindDecl,
    pub description: Option<String>,
    pub required: bool,
}

impl From<FieldSpec> for FieldDecl {
    fn from(spec: FieldSpec) -> Self {
        Self {
            name: spec.name,
            kind: spec.kind.to_decl(),
            description: spec.description,
            required: spec.required,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldBody {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    of: Option<Box<KindDecl>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    required: bool,
}

/// Deserialize a `{ name: { type, of, description, required } }` map into an
/// ordered field list.
///
/// Repeated keys are kept rather than collapsed so that duplicate field
/// declarations reach the document type check.
pub fn deserialize_field_list<'de, D>(deserializer: D) -> Result<Vec<FieldDecl>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldListVisitor;

    impl<'de> Visitor<'de> for FieldListVisitor {
        type Value = Vec<FieldDecl>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field name to field definition")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, body)) = map.next_entry::<String, FieldBody>()? {
                fields.push(FieldDecl {
                    name,
                    kind: KindDecl {
                        type_name: body.type_name,
                        of: body.of,
                    },
                    description: body.description,
                    required: body.required,
                });
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldListVisitor)
}
