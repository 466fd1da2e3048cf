//! Translation of flat request parameters into a structured list query.
//!
//! A list endpoint receives `(key, value)` pairs. Reserved keys drive
//! projection (`select`), ordering (`sort`), paging (`page`, `limit`) and the
//! export format (`format`). Every other key is a filter:
//!
//! | key                   | meaning                      |
//! |-----------------------|------------------------------|
//! | `status=active`       | equality                     |
//! | `roll_no_gte=10`      | `roll_no >= '10'`            |
//! | `created_at[lt]=...`  | bracket form of `_lt`        |
//! | `section_in=A,B`      | membership in a comma list   |
//!
//! Fields come from a per-entity catalog of [`FieldSpec`]s. Keys naming
//! fields outside the catalog, unknown operators and values that do not fit
//! the field's kind are rejected with [`AppError::ValidationFailed`]. Unknown
//! sort fields are dropped instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pagination::PageRequest;

pub const RESERVED_KEYS: [&str; 5] = ["select", "sort", "page", "limit", "format"];

pub const DEFAULT_SORT: &str = "-created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Enum(&'static [&'static str]),
    Timestamp,
    Uuid,
}

/// A filterable, sortable and selectable field of an entity.
///
/// `name` is the key used in requests and in JSON output; `column` is the
/// qualified SQL column it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }
}

fn lookup(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    const SUFFIXES: [(&'static str, FilterOp); 5] = [
        ("_gte", FilterOp::Gte),
        ("_lte", FilterOp::Lte),
        ("_gt", FilterOp::Gt),
        ("_lt", FilterOp::Lt),
        ("_in", FilterOp::In),
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Gt => " > ",
            Self::Gte => " >= ",
            Self::Lt => " < ",
            Self::Lte => " <= ",
            Self::In => " = ANY(",
        }
    }

    fn is_ordering(&self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    TextList(Vec<String>),
    TimestampList(Vec<DateTime<Utc>>),
    UuidList(Vec<Uuid>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: &'static FieldSpec,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static FieldSpec,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub select: Option<Vec<&'static str>>,
    pub sort: Vec<SortKey>,
    pub page: PageRequest,
    pub format: Option<String>,
}

impl ListQuery {
    /// Parses request pairs against `fields`. Later duplicates of reserved
    /// keys win; repeated filter keys accumulate.
    pub fn parse<'a, I>(pairs: I, fields: &'static [FieldSpec]) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Vec::new();
        let mut select = None;
        let mut sort = None;
        let mut page = None;
        let mut limit = None;
        let mut format = None;

        for (key, value) in pairs {
            match key {
                "select" => select = Some(value),
                "sort" => sort = Some(value),
                "page" => page = Some(value),
                "limit" => limit = Some(value),
                "format" => format = Some(value.trim().to_string()),
                _ => filters.push(parse_filter(key, value, fields)?),
            }
        }

        Ok(Self {
            filters,
            select: match select {
                Some(raw) => parse_select(raw, fields)?,
                None => None,
            },
            sort: parse_sort(sort.unwrap_or(DEFAULT_SORT), fields),
            page: PageRequest::from_raw(page, limit),
            format,
        })
    }

    /// Parses a JSON filter object such as a report request body.
    ///
    /// Scalars are stringified, arrays are comma-joined and nested operator
    /// objects (`{"roll_no": {"gte": 10}}`) are flattened to the bracket form.
    /// A top-level `null` is skipped; any other non-scalar value is rejected.
    pub fn from_json(body: &Map<String, Value>, fields: &'static [FieldSpec]) -> Result<Self, AppError> {
        let mut pairs = Vec::with_capacity(body.len());

        for (key, value) in body {
            match value {
                Value::Null => {}
                Value::Object(ops) => {
                    if ops.is_empty() {
                        return Err(AppError::validation(key, "Expected at least one filter operator"));
                    }
                    for (op, inner) in ops {
                        let op_key = format!("{}[{}]", key, op);
                        let text = json_filter_value(&op_key, inner)?;
                        pairs.push((op_key, text));
                    }
                }
                other => pairs.push((key.clone(), json_filter_value(key, other)?)),
            }
        }

        Self::parse(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())), fields)
    }

    /// Applies the `select` projection to a serialized record. `id` is
    /// always kept.
    pub fn project(&self, value: Value) -> Value {
        let Some(select) = &self.select else {
            return value;
        };

        match value {
            Value::Object(mut map) => {
                let mut projected = Map::new();
                for key in std::iter::once("id").chain(select.iter().copied()) {
                    if let Some(v) = map.remove(key) {
                        projected.insert(key.to_string(), v);
                    }
                }
                Value::Object(projected)
            }
            other => other,
        }
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flattens one JSON filter value: a scalar, or a non-empty array of scalars.
fn json_filter_value(key: &str, value: &Value) -> Result<String, AppError> {
    if let Some(text) = json_scalar(value) {
        return Ok(text);
    }

    match value {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| {
                json_scalar(item).ok_or_else(|| {
                    AppError::validation(key, "List filters may only contain strings, numbers or booleans")
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|items| items.join(",")),
        Value::Array(_) => Err(AppError::validation(key, "Expected a non-empty list")),
        _ => Err(AppError::validation(
            key,
            "Filter values must be a string, number, boolean or list",
        )),
    }
}

fn split_key<'k>(key: &'k str, fields: &'static [FieldSpec]) -> Result<(&'k str, FilterOp), AppError> {
    if let Some(open) = key.find('[') {
        let Some(inner) = key[open + 1..].strip_suffix(']') else {
            return Err(AppError::validation(key, format!("Malformed filter key '{}'", key)));
        };
        let op = FilterOp::from_token(inner).ok_or_else(|| {
            AppError::validation(key, format!("Unsupported filter operator '{}'", inner))
        })?;
        return Ok((&key[..open], op));
    }

    if lookup(fields, key).is_some() {
        return Ok((key, FilterOp::Eq));
    }

    for (suffix, op) in FilterOp::SUFFIXES {
        if let Some(base) = key.strip_suffix(suffix) {
            if lookup(fields, base).is_some() {
                return Ok((base, op));
            }
        }
    }

    Err(AppError::validation(key, format!("Unknown filter field '{}'", key)))
}

fn parse_filter(key: &str, raw: &str, fields: &'static [FieldSpec]) -> Result<Filter, AppError> {
    let (name, op) = split_key(key, fields)?;
    let field = lookup(fields, name)
        .ok_or_else(|| AppError::validation(key, format!("Unknown filter field '{}'", name)))?;

    if op.is_ordering() && matches!(field.kind, FieldKind::Enum(_) | FieldKind::Uuid) {
        return Err(AppError::validation(
            key,
            format!("Field '{}' does not support range comparisons", name),
        ));
    }

    let value = if op == FilterOp::In {
        let items: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            return Err(AppError::validation(key, "Expected a comma-separated list"));
        }
        match field.kind {
            FieldKind::Text => FilterValue::TextList(items.iter().map(|s| s.to_string()).collect()),
            FieldKind::Enum(allowed) => FilterValue::TextList(
                items
                    .iter()
                    .map(|s| enum_member(key, s, allowed))
                    .collect::<Result<_, _>>()?,
            ),
            FieldKind::Timestamp => FilterValue::TimestampList(
                items
                    .iter()
                    .map(|s| parse_timestamp(key, s))
                    .collect::<Result<_, _>>()?,
            ),
            FieldKind::Uuid => FilterValue::UuidList(
                items
                    .iter()
                    .map(|s| parse_uuid(key, s))
                    .collect::<Result<_, _>>()?,
            ),
        }
    } else {
        let raw = raw.trim();
        match field.kind {
            FieldKind::Text => FilterValue::Text(raw.to_string()),
            FieldKind::Enum(allowed) => FilterValue::Text(enum_member(key, raw, allowed)?),
            FieldKind::Timestamp => FilterValue::Timestamp(parse_timestamp(key, raw)?),
            FieldKind::Uuid => FilterValue::Uuid(parse_uuid(key, raw)?),
        }
    };

    Ok(Filter { field, op, value })
}

fn enum_member(key: &str, raw: &str, allowed: &[&str]) -> Result<String, AppError> {
    allowed
        .iter()
        .find(|candidate| **candidate == raw)
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::validation(
                key,
                format!("'{}' is not one of: {}", raw, allowed.join(", ")),
            )
        })
}

fn parse_timestamp(key: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            AppError::validation(key, format!("'{}' is not a valid date or timestamp", raw))
        })
}

fn parse_uuid(key: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::validation(key, format!("'{}' is not a valid id", raw)))
}

/// An empty `select` is treated as absent.
fn parse_select(raw: &str, fields: &'static [FieldSpec]) -> Result<Option<Vec<&'static str>>, AppError> {
    let mut selected = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let field = lookup(fields, name).ok_or_else(|| {
            AppError::validation("select", format!("Unknown field '{}' in select", name))
        })?;
        if !selected.contains(&field.name) {
            selected.push(field.name);
        }
    }
    Ok((!selected.is_empty()).then_some(selected))
}

fn parse_sort(raw: &str, fields: &'static [FieldSpec]) -> Vec<SortKey> {
    let mut keys: Vec<SortKey> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|token| {
            let (name, descending) = match token.strip_prefix('-') {
                Some(name) => (name, true),
                None => (token.strip_prefix('+').unwrap_or(token), false),
            };
            lookup(fields, name).map(|field| SortKey { field, descending })
        })
        .collect();

    if keys.is_empty() && raw != DEFAULT_SORT {
        keys = parse_sort(DEFAULT_SORT, fields);
    }

    if let Some(id) = lookup(fields, "id") {
        if !keys.iter().any(|k| k.field.name == "id") {
            keys.push(SortKey {
                field: id,
                descending: false,
            });
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static FIELDS: &[FieldSpec] = &[
        FieldSpec::new("id", "t.id", FieldKind::Uuid),
        FieldSpec::new("name", "t.name", FieldKind::Text),
        FieldSpec::new("roll_no", "t.roll_no", FieldKind::Text),
        FieldSpec::new("status", "t.status", FieldKind::Enum(&["active", "inactive"])),
        FieldSpec::new("created_at", "t.created_at", FieldKind::Timestamp),
    ];

    fn parse(pairs: &[(&str, &str)]) -> Result<ListQuery, AppError> {
        ListQuery::parse(pairs.iter().copied(), FIELDS)
    }

    fn sort_names(q: &ListQuery) -> Vec<(&str, bool)> {
        q.sort.iter().map(|k| (k.field.name, k.descending)).collect()
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let q = parse(&[]).unwrap();
        assert!(q.filters.is_empty());
        assert!(q.select.is_none());
        assert_eq!(q.page, PageRequest::default());
        assert_eq!(sort_names(&q), vec![("created_at", true), ("id", false)]);
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let q = parse(&[
            ("select", "name"),
            ("sort", "name"),
            ("page", "2"),
            ("limit", "10"),
            ("format", "excel"),
        ])
        .unwrap();
        assert!(q.filters.is_empty());
        assert_eq!(q.format.as_deref(), Some("excel"));
        assert_eq!(q.page.page, 2);
        assert_eq!(q.page.limit, 10);
    }

    #[test]
    fn test_equality_filter() {
        let q = parse(&[("status", "active")]).unwrap();
        assert_eq!(q.filters.len(), 1);
        assert_eq!(q.filters[0].op, FilterOp::Eq);
        assert_eq!(q.filters[0].value, FilterValue::Text("active".into()));
    }

    #[test]
    fn test_suffix_operators() {
        let q = parse(&[("roll_no_gte", "10"), ("roll_no_lt", "20")]).unwrap();
        assert_eq!(q.filters[0].field.name, "roll_no");
        assert_eq!(q.filters[0].op, FilterOp::Gte);
        assert_eq!(q.filters[1].op, FilterOp::Lt);
    }

    #[test]
    fn test_bracket_operators() {
        let q = parse(&[("created_at[gt]", "2024-01-01")]).unwrap();
        assert_eq!(q.filters[0].op, FilterOp::Gt);
        match &q.filters[0].value {
            FilterValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00"),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_in_operator_splits_list() {
        let q = parse(&[("name_in", "Ada, Grace,,Linus")]).unwrap();
        assert_eq!(q.filters[0].op, FilterOp::In);
        assert_eq!(
            q.filters[0].value,
            FilterValue::TextList(vec!["Ada".into(), "Grace".into(), "Linus".into()])
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = parse(&[("$where", "1")]).unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed { ref field, .. } if field == "$where"));

        let err = parse(&[("nickname_gte", "a")]).unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed { .. }));
    }

    #[test]
    fn test_unknown_bracket_operator_is_rejected() {
        let err = parse(&[("name[regex]", ".*")]).unwrap_err();
        assert!(err.to_string().contains("regex"));
    }

    #[test]
    fn test_malformed_bracket_is_rejected() {
        assert!(parse(&[("name[gt", "a")]).is_err());
    }

    #[test]
    fn test_enum_values_are_checked() {
        assert!(parse(&[("status", "graduated")]).is_err());
        assert!(parse(&[("status_in", "active,inactive")]).is_ok());
        assert!(parse(&[("status_in", "active,expelled")]).is_err());
    }

    #[test]
    fn test_range_on_enum_is_rejected() {
        assert!(parse(&[("status_gt", "active")]).is_err());
        assert!(parse(&[("id_lt", "00000000-0000-0000-0000-000000000000")]).is_err());
    }

    #[test]
    fn test_bad_timestamp_and_uuid() {
        assert!(parse(&[("created_at", "yesterday")]).is_err());
        assert!(parse(&[("id", "not-a-uuid")]).is_err());
    }

    #[test]
    fn test_sort_drops_unknown_fields() {
        let q = parse(&[("sort", "bogus,-name")]).unwrap();
        assert_eq!(sort_names(&q), vec![("name", true), ("id", false)]);
    }

    #[test]
    fn test_sort_all_unknown_falls_back_to_default() {
        let q = parse(&[("sort", "bogus")]).unwrap();
        assert_eq!(sort_names(&q), vec![("created_at", true), ("id", false)]);
    }

    #[test]
    fn test_sort_with_explicit_id_has_no_duplicate_tiebreak() {
        let q = parse(&[("sort", "-id")]).unwrap();
        assert_eq!(sort_names(&q), vec![("id", true)]);
    }

    #[test]
    fn test_select_validation() {
        let q = parse(&[("select", "name, status,name")]).unwrap();
        assert_eq!(q.select, Some(vec!["name", "status"]));
        assert!(parse(&[("select", "name,password")]).is_err());
    }

    #[test]
    fn test_empty_select_returns_full_record() {
        for raw in ["", " , "] {
            let q = parse(&[("select", raw)]).unwrap();
            assert!(q.select.is_none());
            let value = json!({"id": "x", "name": "Ada"});
            assert_eq!(q.project(value.clone()), value);
        }
    }

    #[test]
    fn test_projection_keeps_id() {
        let q = parse(&[("select", "name")]).unwrap();
        let projected = q.project(json!({"id": "x", "name": "Ada", "status": "active"}));
        assert_eq!(projected, json!({"id": "x", "name": "Ada"}));
    }

    #[test]
    fn test_projection_without_select_is_identity() {
        let q = parse(&[]).unwrap();
        let value = json!({"id": "x", "name": "Ada"});
        assert_eq!(q.project(value.clone()), value);
    }

    #[test]
    fn test_from_json_flattens_operators() {
        let body = json!({
            "status": "active",
            "roll_no": {"gte": 5, "lte": "9"},
            "name_in": ["Ada", "Grace"]
        });

        let q = ListQuery::from_json(body.as_object().unwrap(), FIELDS).unwrap();
        assert_eq!(q.filters.len(), 4);
        assert!(q.filters.iter().any(|f| f.field.name == "roll_no" && f.op == FilterOp::Gte
            && f.value == FilterValue::Text("5".into())));
        assert!(q.filters.iter().any(|f| f.op == FilterOp::In
            && f.value == FilterValue::TextList(vec!["Ada".into(), "Grace".into()])));
    }

    #[test]
    fn test_from_json_skips_nulls() {
        let body = json!({"status": null});
        let q = ListQuery::from_json(body.as_object().unwrap(), FIELDS).unwrap();
        assert!(q.filters.is_empty());
    }

    #[test]
    fn test_from_json_rejects_nested_objects() {
        let body = json!({"roll_no": {"eq": {"value": "5"}}});
        match ListQuery::from_json(body.as_object().unwrap(), FIELDS) {
            Err(AppError::ValidationFailed { field, .. }) => assert_eq!(field, "roll_no[eq]"),
            other => panic!("unexpected {:?}", other),
        }

        let body = json!({"status": {}});
        assert!(ListQuery::from_json(body.as_object().unwrap(), FIELDS).is_err());

        let body = json!({"name": {"in": [{"x": 1}]}});
        assert!(ListQuery::from_json(body.as_object().unwrap(), FIELDS).is_err());
    }

    #[test]
    fn test_from_json_rejects_empty_list() {
        let body = json!({"roll_no": []});
        match ListQuery::from_json(body.as_object().unwrap(), FIELDS) {
            Err(AppError::ValidationFailed { field, .. }) => assert_eq!(field, "roll_no"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_null_operator_value() {
        let body = json!({"roll_no": {"gte": null}});
        assert!(ListQuery::from_json(body.as_object().unwrap(), FIELDS).is_err());
    }
}
