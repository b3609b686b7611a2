// src/common/query.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// ---
// Busca / ordenação das listagens
// ---
// Usado tanto pelo servidor (query string de GET /api/{resource})
// quanto pelo CollectionStore do cliente, sobre itens já em memória.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Texto buscado (sem diferenciar maiúsculas) em qualquer campo de texto.
    pub q: Option<String>,
    /// Nome do campo no JSON (camelCase), ex: "deviceName".
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl ListQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()), ..Default::default() }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.q.as_deref().is_none_or(|q| q.trim().is_empty()) && self.sort.is_none()
    }

    pub fn apply<T: Serialize + Clone>(&self, items: &[T]) -> Vec<T> {
        if self.is_empty() {
            return items.to_vec();
        }

        let needle = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        // Itens que não serializam viram Null e só passam sem filtro de texto
        let mut rows: Vec<(Value, &T)> = items
            .iter()
            .map(|item| (serde_json::to_value(item).unwrap_or(Value::Null), item))
            .filter(|(value, _)| needle.as_deref().is_none_or(|n| matches_text(value, n)))
            .collect();

        if let Some(field) = self.sort.as_deref() {
            let order = self.order.unwrap_or_default();
            rows.sort_by(|(a, _), (b, _)| compare_field(a.get(field), b.get(field), order));
        }

        rows.into_iter().map(|(_, item)| item.clone()).collect()
    }
}

fn matches_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::Object(map) => map.values().any(|v| matches_text(v, needle)),
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    }
}

// Nulos e campos ausentes vão sempre para o fim
fn compare_field(a: Option<&Value>, b: Option<&Value>, order: SortOrder) -> Ordering {
    let (x, y) = match (non_null(a), non_null(b)) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(x), Some(y)) => (x, y),
    };

    let ord = match (x, y) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) => text_of(x).to_lowercase().cmp(&text_of(y).to_lowercase()),
    };

    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
