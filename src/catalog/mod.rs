//! Static description of the eight record types exposed by the back office.
//!
//! The catalog is pure configuration: which fields exist, how they map to the
//! owning system's columns, which of them are listed, searched and filtered,
//! and what a record is called when something else points at it. The read
//! path in [`crate::services::catalog`] is driven entirely by these tables.

mod schema;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Record type, addressed by its snake_case slug (`audit_session`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    User,
    Warehouse,
    Product,
    Team,
    AuditSession,
    CountSession,
    Transaction,
    PendingTransaction,
}

impl EntityType {
    pub fn all() -> impl Iterator<Item = EntityType> {
        Self::iter()
    }

    pub fn descriptor(self) -> &'static EntityDescriptor {
        descriptor(self)
    }
}

/// Semantic type of a field as presented to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Integer,
    Boolean,
    DateTime,
    Json,
    /// String-backed status, type or role code.
    Code,
    /// Stored credential; listed in descriptors but never rendered.
    Secret,
    /// Primary key of another record type.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Catalog name (`warehouse`, `current_stock`).
    pub name: &'static str,
    /// Column in the owning system's table (`warehouseId`, `currentStock`).
    pub column: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    /// Target of a [`FieldKind::Reference`] field.
    pub references: Option<EntityType>,
}

impl FieldDescriptor {
    pub fn is_secret(&self) -> bool {
        self.kind == FieldKind::Secret
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub entity: EntityType,
    pub table: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    /// Field shown when another record references this one.
    pub display_field: &'static str,
    /// Every field, in declaration order.
    pub fields: &'static [FieldDescriptor],
    pub list_fields: &'static [&'static str],
    pub searchable_fields: &'static [&'static str],
    pub filterable_fields: &'static [&'static str],
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_searchable(&self, name: &str) -> bool {
        self.searchable_fields.contains(&name)
    }

    pub fn is_filterable(&self, name: &str) -> bool {
        self.filterable_fields.contains(&name)
    }

    pub fn id_field(&self) -> &'static FieldDescriptor {
        self.required_field("id")
    }

    pub fn created_at_field(&self) -> &'static FieldDescriptor {
        self.required_field("created_at")
    }

    pub fn display(&self) -> &'static FieldDescriptor {
        self.required_field(self.display_field)
    }

    /// Descriptors for [`Self::list_fields`], in list order.
    pub fn list_descriptors(&self) -> impl Iterator<Item = &'static FieldDescriptor> + '_ {
        self.list_fields
            .iter()
            .filter_map(move |name| self.field(name))
    }

    fn required_field(&self, name: &str) -> &'static FieldDescriptor {
        match self.field(name) {
            Some(field) => field,
            None => unreachable!("{} has no `{}` field", self.entity, name),
        }
    }
}

pub fn descriptor(entity: EntityType) -> &'static EntityDescriptor {
    match entity {
        EntityType::User => &schema::USER,
        EntityType::Warehouse => &schema::WAREHOUSE,
        EntityType::Product => &schema::PRODUCT,
        EntityType::Team => &schema::TEAM,
        EntityType::AuditSession => &schema::AUDIT_SESSION,
        EntityType::CountSession => &schema::COUNT_SESSION,
        EntityType::Transaction => &schema::TRANSACTION,
        EntityType::PendingTransaction => &schema::PENDING_TRANSACTION,
    }
}

/// Fields shown as list columns, in display order.
pub fn list_fields(entity: EntityType) -> &'static [&'static str] {
    descriptor(entity).list_fields
}

/// Fields matched by free-text search (case-insensitive substring).
pub fn searchable_fields(entity: EntityType) -> &'static [&'static str] {
    descriptor(entity).searchable_fields
}

/// Fields accepted as exact-match filters.
pub fn filterable_fields(entity: EntityType) -> &'static [&'static str] {
    descriptor(entity).filterable_fields
}

/// Serializable view of an [`EntityDescriptor`] for UI clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityInfo {
    pub entity: EntityType,
    pub table: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub display_field: String,
    pub fields: Vec<FieldInfo>,
    pub list_fields: Vec<String>,
    pub searchable_fields: Vec<String>,
    pub filterable_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldInfo {
    pub name: String,
    pub column: String,
    pub kind: FieldKind,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<EntityType>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

impl From<&FieldDescriptor> for FieldInfo {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.to_owned(),
            column: field.column.to_owned(),
            kind: field.kind,
            nullable: field.nullable,
            references: field.references,
        }
    }
}

impl From<&EntityDescriptor> for EntityInfo {
    fn from(descriptor: &EntityDescriptor) -> Self {
        Self {
            entity: descriptor.entity,
            table: descriptor.table.to_owned(),
            verbose_name: descriptor.verbose_name.to_owned(),
            verbose_name_plural: descriptor.verbose_name_plural.to_owned(),
            display_field: descriptor.display_field.to_owned(),
            fields: descriptor.fields.iter().map(FieldInfo::from).collect(),
            list_fields: owned(descriptor.list_fields),
            searchable_fields: owned(descriptor.searchable_fields),
            filterable_fields: owned(descriptor.filterable_fields),
        }
    }
}
