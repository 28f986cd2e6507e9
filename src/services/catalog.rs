//! Read path over the schema-mapped catalog.
//!
//! Every operation is generic over the sea-orm entity and driven by the
//! static descriptors in [`crate::catalog`]; nothing here writes to the store.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseBackend, DbErr, EntityTrait, IdenStatic, ItemsAndPagesNumber, ModelTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Value,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::catalog::{
    self, EntityDescriptor, EntityInfo, EntityType, FieldDescriptor, FieldKind,
};
use crate::config::AppConfig;
use crate::db::{DatabaseAccess, DbPool};
use crate::entities::{
    audit_session, count_session, pending_transaction, product, team, transaction, user,
    warehouse,
};
use crate::errors::ServiceError;

/// Binds a sea-orm entity to its catalog entry.
pub trait CatalogEntity: EntityTrait {
    const ENTITY: EntityType;

    fn descriptor() -> &'static EntityDescriptor {
        catalog::descriptor(Self::ENTITY)
    }
}

macro_rules! catalog_entities {
    ($($module:ident => $variant:ident),+ $(,)?) => {
        $(
            impl CatalogEntity for $module::Entity {
                const ENTITY: EntityType = EntityType::$variant;
            }
        )+
    };
}

catalog_entities! {
    user => User,
    warehouse => Warehouse,
    product => Product,
    team => Team,
    audit_session => AuditSession,
    count_session => CountSession,
    transaction => Transaction,
    pending_transaction => PendingTransaction,
}

/// Runs `$body` with `$e` aliased to the sea-orm entity of `$entity`.
macro_rules! with_entity {
    ($entity:expr, |$e:ident| $body:expr) => {
        match $entity {
            EntityType::User => {
                type $e = user::Entity;
                $body
            }
            EntityType::Warehouse => {
                type $e = warehouse::Entity;
                $body
            }
            EntityType::Product => {
                type $e = product::Entity;
                $body
            }
            EntityType::Team => {
                type $e = team::Entity;
                $body
            }
            EntityType::AuditSession => {
                type $e = audit_session::Entity;
                $body
            }
            EntityType::CountSession => {
                type $e = count_session::Entity;
                $body
            }
            EntityType::Transaction => {
                type $e = transaction::Entity;
                $body
            }
            EntityType::PendingTransaction => {
                type $e = pending_transaction::Entity;
                $body
            }
        }
    };
}

/// Parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Free-text search
    pub q: Option<String>,
    /// List field to order by, `-` prefix for descending
    pub sort: Option<String>,
    /// Exact-match filters as `(field, value)` pairs
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Splits raw query-string pairs into paging, search, sort and filters.
    ///
    /// Empty values are treated as absent, so an unselected filter in a form
    /// does not constrain the result.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_owned();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "page" => query.page = Some(parse_number(&key, &value)?),
                "per_page" => query.per_page = Some(parse_number(&key, &value)?),
                "q" => query.q = Some(value),
                "sort" => query.sort = Some(value),
                _ => query.filters.push((key, value)),
            }
        }
        Ok(query)
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ServiceError> {
    value
        .parse()
        .map_err(|_| ServiceError::bad_request(format!("'{key}' must be a positive integer")))
}

/// Link from a field to the record it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceValue {
    pub entity: EntityType,
    /// Raw key stored in the referencing row
    pub id: String,
    /// False when the referenced row does not exist
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldValue {
    pub name: String,
    /// Stored value; for references, the referenced record's display name
    pub value: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    pub entity: EntityType,
    pub id: String,
    /// Display name of the record
    pub title: String,
    pub fields: Vec<FieldValue>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordPage {
    pub entity: EntityType,
    /// Column headers, identical to the entity's list fields
    pub columns: Vec<String>,
    pub records: Vec<Record>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldChoices {
    pub field: String,
    pub kind: FieldKind,
    pub choices: Vec<FilterChoice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteInfo {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
    pub language_code: String,
    pub time_zone: String,
}

impl From<&AppConfig> for SiteInfo {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            site_header: cfg.site_header.clone(),
            site_title: cfg.site_title.clone(),
            index_title: cfg.index_title.clone(),
            language_code: cfg.language_code.clone(),
            time_zone: cfg.time_zone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogDescription {
    pub site: SiteInfo,
    pub entities: Vec<EntityInfo>,
}

/// List request checked against the catalog, ready to run.
#[derive(Debug, Clone)]
pub(crate) struct ListPlan {
    page: u64,
    per_page: u64,
    terms: Vec<String>,
    sort: Option<(&'static FieldDescriptor, Order)>,
    filters: Vec<(&'static FieldDescriptor, Value)>,
}

type DisplayNames = HashMap<(EntityType, String), String>;

/// Read-only catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: DatabaseAccess,
    default_page_size: u64,
    max_page_size: u64,
    site: SiteInfo,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
            default_page_size: config.api_default_page_size,
            max_page_size: config.api_max_page_size,
            site: SiteInfo::from(config),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.default_page_size
    }

    /// Site metadata and every entity's catalog entry.
    pub fn describe(&self) -> CatalogDescription {
        CatalogDescription {
            site: self.site.clone(),
            entities: EntityType::all()
                .map(|entity| EntityInfo::from(entity.descriptor()))
                .collect(),
        }
    }

    pub fn describe_entity(&self, entity: EntityType) -> EntityInfo {
        EntityInfo::from(entity.descriptor())
    }

    /// Page of records projected onto the entity's list fields.
    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        entity: EntityType,
        query: &ListQuery,
    ) -> Result<RecordPage, ServiceError> {
        let plan = self.plan(entity, query)?;
        with_entity!(entity, |E| self.list_page::<E>(plan).await)
    }

    /// Full record with references resolved. Secrets are omitted.
    #[instrument(skip(self))]
    pub async fn fetch(&self, entity: EntityType, id: &str) -> Result<Record, ServiceError> {
        with_entity!(entity, |E| self.fetch_one::<E>(id).await)
    }

    /// Distinct stored values of every filterable field, sorted by value.
    #[instrument(skip(self))]
    pub async fn filter_choices(
        &self,
        entity: EntityType,
    ) -> Result<Vec<FieldChoices>, ServiceError> {
        with_entity!(entity, |E| self.choices_of::<E>().await)
    }

    /// Validates a list request against the catalog before any query runs.
    pub(crate) fn plan(
        &self,
        entity: EntityType,
        query: &ListQuery,
    ) -> Result<ListPlan, ServiceError> {
        let descriptor = entity.descriptor();

        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(ServiceError::bad_request("'page' starts at 1"));
        }
        let per_page = match query.per_page {
            Some(0) => return Err(ServiceError::bad_request("'per_page' must be at least 1")),
            Some(n) => n.min(self.max_page_size),
            None => self.default_page_size,
        };
        (page - 1)
            .checked_mul(per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| ServiceError::bad_request("'page' is out of range"))?;

        let terms = query
            .q
            .as_deref()
            .map(|q| q.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();

        let sort = match query.sort.as_deref() {
            None => None,
            Some(raw) => {
                let (name, order) = match raw.strip_prefix('-') {
                    Some(name) => (name, Order::Desc),
                    None => (raw, Order::Asc),
                };
                let field = descriptor
                    .list_fields
                    .contains(&name)
                    .then(|| descriptor.field(name))
                    .flatten()
                    .ok_or_else(|| {
                        ServiceError::bad_request(format!("cannot sort {entity} by '{name}'"))
                    })?;
                Some((field, order))
            }
        };

        let filters = query
            .filters
            .iter()
            .map(|(name, raw)| {
                let field = descriptor
                    .is_filterable(name)
                    .then(|| descriptor.field(name))
                    .flatten()
                    .ok_or_else(|| {
                        ServiceError::bad_request(format!("cannot filter {entity} by '{name}'"))
                    })?;
                Ok((field, filter_value(field, raw)?))
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        Ok(ListPlan {
            page,
            per_page,
            terms,
            sort,
            filters,
        })
    }

    async fn list_page<E>(&self, plan: ListPlan) -> Result<RecordPage, ServiceError>
    where
        E: CatalogEntity,
        E::Model: Send + Sync,
    {
        let descriptor = E::descriptor();
        let mut condition = Condition::all();

        for (field, value) in &plan.filters {
            condition = condition.add(column_of::<E>(field)?.eq(value.clone()));
        }

        let searchable: Vec<E::Column> = descriptor
            .searchable_fields
            .iter()
            .filter_map(|name| descriptor.field(name))
            .map(column_of::<E>)
            .collect::<Result<_, _>>()?;
        if !searchable.is_empty() {
            let backend = self.db.backend();
            for term in &plan.terms {
                let term = fold_case(backend, term);
                condition = condition.add(search_condition::<E>(&searchable, &term));
            }
        }

        let id = column_of::<E>(descriptor.id_field())?;
        let mut select = E::find().filter(condition);
        select = match plan.sort {
            Some((field, order)) => select
                .order_by(column_of::<E>(field)?, order.clone())
                .order_by(id, order),
            None => select
                .order_by(column_of::<E>(descriptor.created_at_field())?, Order::Desc)
                .order_by(id, Order::Desc),
        };

        let (page, per_page) = (plan.page, plan.per_page);
        let (totals, models) = self
            .db
            .execute("catalog.list", |db| async move {
                let paginator = select.paginate(db, per_page);
                let totals = paginator.num_items_and_pages().await?;
                let models = if page > totals.number_of_pages {
                    Vec::new()
                } else {
                    paginator.fetch_page(page - 1).await?
                };
                Ok::<_, DbErr>((totals, models))
            })
            .await?;
        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = totals;

        let records = self
            .project::<E>(&models, descriptor.list_descriptors().collect())
            .await?;

        Ok(RecordPage {
            entity: E::ENTITY,
            columns: descriptor
                .list_fields
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            records,
            page,
            per_page,
            total: number_of_items,
            total_pages: number_of_pages,
        })
    }

    async fn fetch_one<E>(&self, id: &str) -> Result<Record, ServiceError>
    where
        E: CatalogEntity,
        E::Model: Send + Sync,
    {
        let descriptor = E::descriptor();
        let id_column = column_of::<E>(descriptor.id_field())?;
        let key = id.to_owned();

        let model = self
            .db
            .execute("catalog.fetch", |db| {
                E::find().filter(id_column.eq(key)).one(db)
            })
            .await?
            .ok_or_else(|| ServiceError::not_found(E::ENTITY, id))?;

        let fields = descriptor.fields.iter().filter(|f| !f.is_secret()).collect();
        let mut records = self.project::<E>(std::slice::from_ref(&model), fields).await?;
        records
            .pop()
            .ok_or_else(|| ServiceError::not_found(E::ENTITY, id))
    }

    async fn choices_of<E>(&self) -> Result<Vec<FieldChoices>, ServiceError>
    where
        E: CatalogEntity,
        E::Model: Send + Sync,
    {
        let descriptor = E::descriptor();
        let mut per_field = Vec::with_capacity(descriptor.filterable_fields.len());

        for field in descriptor
            .filterable_fields
            .iter()
            .filter_map(|name| descriptor.field(name))
        {
            let values: BTreeSet<String> = if field.kind == FieldKind::Boolean {
                ["false", "true"].into_iter().map(str::to_owned).collect()
            } else {
                let column = column_of::<E>(field)?;
                let rows: Vec<Option<String>> = self
                    .db
                    .execute("catalog.filter_choices", |db| {
                        E::find()
                            .select_only()
                            .column(column)
                            .distinct()
                            .into_tuple::<Option<String>>()
                            .all(db)
                    })
                    .await?;
                rows.into_iter().flatten().collect()
            };
            per_field.push((field, values));
        }

        let mut wanted: BTreeMap<EntityType, BTreeSet<String>> = BTreeMap::new();
        for (field, values) in &per_field {
            if let Some(target) = field.references {
                wanted.entry(target).or_default().extend(values.iter().cloned());
            }
        }
        let names = self.display_names(wanted).await?;

        Ok(per_field
            .into_iter()
            .map(|(field, values)| FieldChoices {
                field: field.name.to_owned(),
                kind: field.kind,
                choices: values
                    .into_iter()
                    .map(|value| {
                        let label = field
                            .references
                            .and_then(|target| names.get(&(target, value.clone())).cloned())
                            .unwrap_or_else(|| value.clone());
                        FilterChoice { value, label }
                    })
                    .collect(),
            })
            .collect())
    }

    /// Projects models onto `fields`, resolving references in one query per target type.
    pub(crate) async fn project<E>(
        &self,
        models: &[E::Model],
        fields: Vec<&'static FieldDescriptor>,
    ) -> Result<Vec<Record>, ServiceError>
    where
        E: CatalogEntity,
    {
        let descriptor = E::descriptor();
        let id_column = column_of::<E>(descriptor.id_field())?;
        let display_column = column_of::<E>(descriptor.display())?;
        let columns = fields
            .iter()
            .map(|field| column_of::<E>(field))
            .collect::<Result<Vec<_>, _>>()?;

        let rows: Vec<(String, String, Vec<JsonValue>)> = models
            .iter()
            .map(|model| {
                let values = columns.iter().map(|c| to_json(model.get(*c))).collect();
                (
                    text_of(to_json(model.get(id_column))),
                    text_of(to_json(model.get(display_column))),
                    values,
                )
            })
            .collect();

        let mut wanted: BTreeMap<EntityType, BTreeSet<String>> = BTreeMap::new();
        for (_, _, values) in &rows {
            for (field, value) in fields.iter().zip(values) {
                if let (Some(target), JsonValue::String(key)) = (field.references, value) {
                    wanted.entry(target).or_default().insert(key.clone());
                }
            }
        }
        let names = self.display_names(wanted).await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, values)| Record {
                entity: E::ENTITY,
                id,
                title,
                fields: fields
                    .iter()
                    .zip(values)
                    .map(|(field, value)| field_value(field, value, &names))
                    .collect(),
            })
            .collect())
    }

    async fn display_names(
        &self,
        wanted: BTreeMap<EntityType, BTreeSet<String>>,
    ) -> Result<DisplayNames, ServiceError> {
        let mut names = DisplayNames::new();
        for (target, keys) in wanted {
            if keys.is_empty() {
                continue;
            }
            let resolved =
                with_entity!(target, |E| self.display_names_of::<E>(keys).await)?;
            names.extend(
                resolved
                    .into_iter()
                    .map(|(id, name)| ((target, id), name)),
            );
        }
        Ok(names)
    }

    async fn display_names_of<E>(
        &self,
        keys: BTreeSet<String>,
    ) -> Result<Vec<(String, String)>, ServiceError>
    where
        E: CatalogEntity,
    {
        let descriptor = E::descriptor();
        let id_column = column_of::<E>(descriptor.id_field())?;
        let display_column = column_of::<E>(descriptor.display())?;

        let models = self
            .db
            .execute("catalog.resolve_references", |db| {
                E::find().filter(id_column.is_in(keys)).all(db)
            })
            .await?;

        Ok(models
            .iter()
            .map(|model| {
                (
                    text_of(to_json(model.get(id_column))),
                    text_of(to_json(model.get(display_column))),
                )
            })
            .collect())
    }
}

/// sea-orm column backing a catalog field.
fn column_of<E: EntityTrait>(field: &FieldDescriptor) -> Result<E::Column, ServiceError> {
    <E::Column as sea_orm::Iterable>::iter()
        .find(|column| column.as_str() == field.column)
        .ok_or_else(|| {
            ServiceError::StorageUnavailable(DbErr::Custom(format!(
                "column '{}' is not mapped",
                field.column
            )))
        })
}

/// Lowercases a search term the same way the backend's `LOWER` does.
/// SQLite only folds ASCII letters.
fn fold_case(backend: DatabaseBackend, term: &str) -> String {
    match backend {
        DatabaseBackend::Sqlite => term.to_ascii_lowercase(),
        _ => term.to_lowercase(),
    }
}

/// Case-insensitive substring match of an already folded `term` against any of `columns`.
fn search_condition<E: EntityTrait>(columns: &[E::Column], term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    columns.iter().fold(Condition::any(), |any, column| {
        any.add(
            Expr::expr(Func::lower(Expr::col((E::default(), *column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    })
}

/// Escapes LIKE wildcards so they match literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn filter_value(field: &FieldDescriptor, raw: &str) -> Result<Value, ServiceError> {
    match field.kind {
        FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::from(true)),
            "false" | "0" | "no" => Ok(Value::from(false)),
            _ => Err(ServiceError::bad_request(format!(
                "'{}' expects true or false",
                field.name
            ))),
        },
        FieldKind::Integer => raw.parse::<i64>().map(Value::from).map_err(|_| {
            ServiceError::bad_request(format!("'{}' expects an integer", field.name))
        }),
        _ => Ok(Value::from(raw.to_owned())),
    }
}

fn field_value(field: &FieldDescriptor, value: JsonValue, names: &DisplayNames) -> FieldValue {
    let reference = match (field.references, &value) {
        (Some(target), JsonValue::String(key)) => Some(ReferenceValue {
            entity: target,
            id: key.clone(),
            found: names.contains_key(&(target, key.clone())),
        }),
        _ => None,
    };

    let value = match &reference {
        Some(r) => names
            .get(&(r.entity, r.id.clone()))
            .map(|name| JsonValue::String(name.clone()))
            .unwrap_or(value),
        None => value,
    };

    FieldValue {
        name: field.name.to_owned(),
        value,
        reference,
    }
}

fn text_of(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// JSON rendering of a stored column value.
pub(crate) fn to_json(value: Value) -> JsonValue {
    let json = match value {
        Value::Bool(v) => v.map(JsonValue::Bool),
        Value::TinyInt(v) => v.map(JsonValue::from),
        Value::SmallInt(v) => v.map(JsonValue::from),
        Value::Int(v) => v.map(JsonValue::from),
        Value::BigInt(v) => v.map(JsonValue::from),
        Value::String(v) => v.map(|s| JsonValue::String(*s)),
        Value::Json(v) => v.map(|j| *j),
        Value::ChronoDateTimeUtc(v) => v.map(|t| JsonValue::String(t.to_rfc3339())),
        other => {
            warn!(value = ?other, "unsupported column value rendered as null");
            None
        }
    };
    json.unwrap_or(JsonValue::Null)
}
