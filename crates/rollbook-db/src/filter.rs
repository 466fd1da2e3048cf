//! SQL rendering for list queries.
//!
//! The same `WHERE` clause is pushed onto both the count query and the page
//! query, so callers build two [`QueryBuilder`]s and call [`push_where`] on
//! each. Every value is bound; only column names from the static field
//! catalog are ever spliced into the SQL text.

use rollbook_core::query::{FieldKind, FieldSpec, Filter, FilterOp, FilterValue, SortKey};
use rollbook_core::PageRequest;
use sqlx::{Postgres, QueryBuilder};

fn push_column(qb: &mut QueryBuilder<'_, Postgres>, field: &FieldSpec) {
    qb.push(field.column);
    // enum columns compare by label so text binds work
    if matches!(field.kind, FieldKind::Enum(_)) {
        qb.push("::text");
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Timestamp(v) => qb.push_bind(*v),
        FilterValue::Uuid(v) => qb.push_bind(*v),
        FilterValue::TextList(v) => qb.push_bind(v.clone()),
        FilterValue::TimestampList(v) => qb.push_bind(v.clone()),
        FilterValue::UuidList(v) => qb.push_bind(v.clone()),
    };
}

/// Appends ` WHERE ... AND ...` for `filters`; nothing when empty.
pub fn push_where(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_column(qb, filter.field);
        qb.push(filter.op.sql());
        push_value(qb, &filter.value);
        if filter.op == FilterOp::In {
            qb.push(")");
        }
    }
}

/// Appends ` ORDER BY ...`; nothing when `sort` is empty.
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sort: &[SortKey]) {
    for (i, key) in sort.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(key.field.column);
        qb.push(if key.descending { " DESC" } else { " ASC" });
    }
}

pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
    qb.push(" LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_core::ListQuery;

    static FIELDS: &[FieldSpec] = &[
        FieldSpec::new("id", "s.id", FieldKind::Uuid),
        FieldSpec::new("roll_no", "s.roll_no", FieldKind::Text),
        FieldSpec::new("status", "s.status", FieldKind::Enum(&["active", "inactive"])),
        FieldSpec::new("created_at", "s.created_at", FieldKind::Timestamp),
    ];

    fn render(pairs: &[(&str, &str)]) -> String {
        let query = ListQuery::parse(pairs.iter().copied(), FIELDS).unwrap();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM students s");
        push_where(&mut qb, &query.filters);
        push_order_by(&mut qb, &query.sort);
        push_page(&mut qb, &query.page);
        qb.sql().to_string()
    }

    #[test]
    fn test_no_filters() {
        assert_eq!(
            render(&[]),
            "SELECT * FROM students s ORDER BY s.created_at DESC, s.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_filters_are_bound_in_order() {
        assert_eq!(
            render(&[("status", "active"), ("roll_no_gte", "10"), ("sort", "roll_no")]),
            "SELECT * FROM students s WHERE s.status::text = $1 AND s.roll_no >= $2 \
             ORDER BY s.roll_no ASC, s.id ASC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_in_uses_any() {
        assert_eq!(
            render(&[("status_in", "active,inactive"), ("sort", "-id")]),
            "SELECT * FROM students s WHERE s.status::text = ANY($1) \
             ORDER BY s.id DESC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn test_count_query_shares_where_clause() {
        let query = ListQuery::parse([("created_at[lt]", "2024-06-01")], FIELDS).unwrap();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students s");
        push_where(&mut qb, &query.filters);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM students s WHERE s.created_at < $1"
        );
    }
}
