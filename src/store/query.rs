//! # Partial Update / Filter Query Builder
//!
//! Turns the optional fields of a [`Subscription`] into parameterized SQL.
//!
//! A field is present when it differs from its zero value:
//! - dates: `Some` and not the zero instant `0001-01-01T00:00:00Z`
//! - `service_name`: non-empty
//! - `price`: non-zero
//! - `user_id`: non-nil
//!
//! Present fields are collected in a fixed order (start_date, service_name,
//! price, end_date, user_id) and rendered as `column = $n` joined by the
//! caller's separator. Values are only ever bound, never spliced into SQL.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::models::{is_zero_time, Subscription};

/// Columns returned by every SELECT, in row-decoding order
pub const SELECT_COLUMNS: &str = "id, user_id, service_name, price, start_date, end_date";

/// A value bound to a positional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Timestamp(DateTime<Utc>),
    Text(String),
    Integer(i64),
    Uuid(Uuid),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Uuid(u) => write!(f, "{}", u),
        }
    }
}

/// Filterable and updatable columns of `subscriptions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    StartDate,
    ServiceName,
    Price,
    EndDate,
    UserId,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::StartDate => "start_date",
            Column::ServiceName => "service_name",
            Column::Price => "price",
            Column::EndDate => "end_date",
            Column::UserId => "user_id",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One present field of a subscription, typed by its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    StartDate(DateTime<Utc>),
    ServiceName(String),
    Price(i64),
    EndDate(DateTime<Utc>),
    UserId(Uuid),
}

impl Field {
    pub fn column(&self) -> Column {
        match self {
            Field::StartDate(_) => Column::StartDate,
            Field::ServiceName(_) => Column::ServiceName,
            Field::Price(_) => Column::Price,
            Field::EndDate(_) => Column::EndDate,
            Field::UserId(_) => Column::UserId,
        }
    }

    pub fn into_value(self) -> FieldValue {
        match self {
            Field::StartDate(ts) | Field::EndDate(ts) => FieldValue::Timestamp(ts),
            Field::ServiceName(name) => FieldValue::Text(name),
            Field::Price(price) => FieldValue::Integer(price),
            Field::UserId(user) => FieldValue::Uuid(user),
        }
    }

    fn matches(&self, record: &Subscription) -> bool {
        match self {
            Field::StartDate(ts) => record.start_date == Some(*ts),
            Field::ServiceName(name) => &record.service_name == name,
            Field::Price(price) => record.price == *price,
            Field::EndDate(ts) => record.end_date == Some(*ts),
            Field::UserId(user) => record.user_id == *user,
        }
    }

    fn apply_to(&self, record: &mut Subscription) {
        match self {
            Field::StartDate(ts) => record.start_date = Some(*ts),
            Field::ServiceName(name) => record.service_name = name.clone(),
            Field::Price(price) => record.price = *price,
            Field::EndDate(ts) => record.end_date = Some(*ts),
            Field::UserId(user) => record.user_id = *user,
        }
    }
}

fn present_date(date: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    date.filter(|ts| !is_zero_time(ts))
}

/// Ordered set of the present fields of a subscription
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    /// Collect the present fields of `sub` in column order
    pub fn from_subscription(sub: &Subscription) -> Self {
        let candidates = [
            present_date(sub.start_date).map(Field::StartDate),
            (!sub.service_name.is_empty()).then(|| Field::ServiceName(sub.service_name.clone())),
            (sub.price != 0).then_some(Field::Price(sub.price)),
            present_date(sub.end_date).map(Field::EndDate),
            (!sub.user_id.is_nil()).then_some(Field::UserId(sub.user_id)),
        ];

        Self {
            fields: candidates.into_iter().flatten().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> Vec<Column> {
        self.fields.iter().map(Field::column).collect()
    }

    /// Render `column = $n` terms joined by `separator`, numbering from `first_index`
    pub fn render(&self, separator: &str, first_index: usize) -> String {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{} = ${}", field.column(), first_index + i))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Bound values in parameter order
    pub fn into_values(self) -> Vec<FieldValue> {
        self.fields.into_iter().map(Field::into_value).collect()
    }

    /// Whether `record` carries every present field's value
    pub fn matches(&self, record: &Subscription) -> bool {
        self.fields.iter().all(|field| field.matches(record))
    }

    /// Copy every present field onto `record`
    pub fn apply_to(&self, record: &mut Subscription) {
        for field in &self.fields {
            field.apply_to(record);
        }
    }
}

/// SQL text plus its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<FieldValue>,
}

impl Statement {
    /// Human-readable argument list for logs
    pub fn args_display(&self) -> String {
        let parts: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        format!("[{}]", parts.join(", "))
    }
}

/// Build `UPDATE ... SET ... WHERE id = $n` from the present fields of `patch`.
///
/// Fails with [`StoreError::NoFieldsToUpdate`] when nothing is present.
pub fn update_statement(id: i64, patch: &Subscription) -> StoreResult<Statement> {
    let fields = FieldSet::from_subscription(patch);
    if fields.is_empty() {
        return Err(StoreError::NoFieldsToUpdate);
    }

    let id_index = fields.len() + 1;
    let sql = format!(
        "UPDATE subscriptions SET {} WHERE id = ${}",
        fields.render(", ", 1),
        id_index
    );
    let mut args = fields.into_values();
    args.push(FieldValue::Integer(id));

    Ok(Statement { sql, args })
}

/// Build the SELECT for a list request.
///
/// `all` or an empty filter selects every row.
pub fn list_statement(filter: &Subscription) -> Statement {
    let fields = FieldSet::from_subscription(filter);
    if filter.all || fields.is_empty() {
        return Statement {
            sql: format!("SELECT {} FROM subscriptions ORDER BY id", SELECT_COLUMNS),
            args: Vec::new(),
        };
    }

    let sql = format!(
        "SELECT {} FROM subscriptions WHERE {} ORDER BY id",
        SELECT_COLUMNS,
        fields.render(" AND ", 1)
    );
    Statement {
        sql,
        args: fields.into_values(),
    }
}
