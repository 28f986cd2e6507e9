//! Per-entity catalog tables. Field order follows the table's column order.

use super::{EntityDescriptor, EntityType, FieldDescriptor, FieldKind};

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        name,
        column,
        kind,
        nullable: false,
        references: None,
    }
}

const fn nullable(name: &'static str, column: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        name,
        column,
        kind,
        nullable: true,
        references: None,
    }
}

const fn reference(name: &'static str, column: &'static str, target: EntityType) -> FieldDescriptor {
    FieldDescriptor {
        name,
        column,
        kind: FieldKind::Reference,
        nullable: false,
        references: Some(target),
    }
}

const fn nullable_reference(
    name: &'static str,
    column: &'static str,
    target: EntityType,
) -> FieldDescriptor {
    FieldDescriptor {
        nullable: true,
        ..reference(name, column, target)
    }
}

const ID: FieldDescriptor = field("id", "id", FieldKind::Text);
const CREATED_AT: FieldDescriptor = field("created_at", "createdAt", FieldKind::DateTime);
const COMPLETED_AT: FieldDescriptor = nullable("completed_at", "completedAt", FieldKind::DateTime);

pub(super) static USER: EntityDescriptor = EntityDescriptor {
    entity: EntityType::User,
    table: "User",
    verbose_name: "کاربر",
    verbose_name_plural: "کاربران",
    display_field: "username",
    fields: &[
        ID,
        field("username", "username", FieldKind::Text),
        field("password", "password", FieldKind::Secret),
        field("role", "role", FieldKind::Code),
        CREATED_AT,
    ],
    list_fields: &["username", "role", "created_at"],
    searchable_fields: &["username"],
    filterable_fields: &[],
};

pub(super) static WAREHOUSE: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Warehouse,
    table: "Warehouse",
    verbose_name: "انبار",
    verbose_name_plural: "انبارها",
    display_field: "name",
    fields: &[
        ID,
        field("name", "name", FieldKind::Text),
        nullable("description", "description", FieldKind::LongText),
        field("is_active", "isActive", FieldKind::Boolean),
        CREATED_AT,
    ],
    list_fields: &["name", "is_active", "created_at"],
    searchable_fields: &["name"],
    filterable_fields: &[],
};

pub(super) static PRODUCT: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Product,
    table: "Product",
    verbose_name: "کالا",
    verbose_name_plural: "کالاها",
    display_field: "name",
    fields: &[
        ID,
        field("code", "code", FieldKind::Text),
        field("name", "name", FieldKind::Text),
        reference("warehouse", "warehouseId", EntityType::Warehouse),
        field("current_stock", "currentStock", FieldKind::Integer),
        CREATED_AT,
        field("updated_at", "updatedAt", FieldKind::DateTime),
    ],
    list_fields: &["code", "name", "warehouse", "current_stock"],
    searchable_fields: &["code", "name"],
    filterable_fields: &["warehouse"],
};

pub(super) static TEAM: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Team,
    table: "Team",
    verbose_name: "تیم",
    verbose_name_plural: "تیم‌ها",
    display_field: "name",
    fields: &[
        ID,
        field("name", "name", FieldKind::Text),
        reference("warehouse", "warehouseId", EntityType::Warehouse),
        field("member_ids", "memberIds", FieldKind::Json),
        CREATED_AT,
    ],
    list_fields: &["name", "warehouse", "created_at"],
    searchable_fields: &["name"],
    filterable_fields: &[],
};

pub(super) static AUDIT_SESSION: EntityDescriptor = EntityDescriptor {
    entity: EntityType::AuditSession,
    table: "AuditSession",
    verbose_name: "جلسه حسابرسی",
    verbose_name_plural: "جلسات حسابرسی",
    display_field: "name",
    fields: &[
        ID,
        reference("warehouse", "warehouseId", EntityType::Warehouse),
        field("name", "name", FieldKind::Text),
        field("status", "status", FieldKind::Code),
        field("allow_outflow", "allowOutflow", FieldKind::Boolean),
        CREATED_AT,
        COMPLETED_AT,
    ],
    list_fields: &["name", "warehouse", "status", "allow_outflow"],
    searchable_fields: &[],
    filterable_fields: &["status"],
};

pub(super) static COUNT_SESSION: EntityDescriptor = EntityDescriptor {
    entity: EntityType::CountSession,
    table: "CountSession",
    verbose_name: "جلسه شمارش",
    verbose_name_plural: "جلسات شمارش",
    display_field: "name",
    fields: &[
        ID,
        reference("audit_session", "auditSessionId", EntityType::AuditSession),
        reference("team", "teamId", EntityType::Team),
        field("name", "name", FieldKind::Text),
        field("status", "status", FieldKind::Code),
        CREATED_AT,
        COMPLETED_AT,
    ],
    list_fields: &["name", "audit_session", "team", "status"],
    searchable_fields: &[],
    filterable_fields: &["status"],
};

pub(super) static TRANSACTION: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Transaction,
    table: "Transaction",
    verbose_name: "تراکنش",
    verbose_name_plural: "تراکنش‌ها",
    display_field: "id",
    fields: &[
        ID,
        reference("product", "productId", EntityType::Product),
        field("product_code", "productCode", FieldKind::Text),
        field("product_name", "productName", FieldKind::Text),
        reference("warehouse", "warehouseId", EntityType::Warehouse),
        field("type", "type", FieldKind::Code),
        field("quantity", "quantity", FieldKind::Integer),
        field("previous_stock", "previousStock", FieldKind::Integer),
        field("new_stock", "newStock", FieldKind::Integer),
        reference("user", "userId", EntityType::User),
        field("username", "username", FieldKind::Text),
        nullable_reference("audit_session", "auditSessionId", EntityType::AuditSession),
        nullable_reference("count_session", "countSessionId", EntityType::CountSession),
        field("is_synced", "isSynced", FieldKind::Boolean),
        CREATED_AT,
    ],
    list_fields: &[
        "id",
        "product_code",
        "product_name",
        "warehouse",
        "type",
        "quantity",
        "created_at",
    ],
    searchable_fields: &["product_code", "product_name", "username"],
    filterable_fields: &["warehouse", "type"],
};

pub(super) static PENDING_TRANSACTION: EntityDescriptor = EntityDescriptor {
    entity: EntityType::PendingTransaction,
    table: "PendingTransaction",
    verbose_name: "تراکنش معلق",
    verbose_name_plural: "تراکنش‌های معلق",
    display_field: "id",
    fields: &[ID, field("data", "data", FieldKind::Json), CREATED_AT],
    list_fields: &["id", "created_at"],
    searchable_fields: &[],
    filterable_fields: &[],
};
