// src/common/response.rs

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// O envelope de todas as respostas: `{ ok: true, data }` ou `{ ok: false, code, error, details? }`.
// O ApiError monta o lado do erro; o cliente REST usa esta mesma struct para ler os dois.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    // Sem `default` aqui: exigiria `T: Default` para desserializar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, data: Some(data), code: None, error: None, details: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_has_only_ok_and_data() {
        let Json(envelope) = ok(vec![1, 2]);
        assert_eq!(serde_json::to_value(envelope).unwrap(), json!({ "ok": true, "data": [1, 2] }));
    }

    #[test]
    fn error_body_reads_back_into_the_envelope() {
        let envelope: Envelope<Value> = serde_json::from_value(json!({
            "ok": false,
            "code": "NOT_FOUND",
            "error": "Record not found."
        }))
        .unwrap();
        assert!(!envelope.ok);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.code.as_deref(), Some("NOT_FOUND"));
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct NoDefault {
        name: String,
    }

    // Payload sem Default, como os que o cliente REST lê
    fn read_envelope<T: serde::de::DeserializeOwned>(value: Value) -> Envelope<T> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn envelope_reads_payloads_without_default() {
        let envelope: Envelope<NoDefault> = read_envelope(json!({ "ok": true, "data": { "name": "LT001" } }));
        assert_eq!(envelope.data, Some(NoDefault { name: "LT001".into() }));

        let missing: Envelope<NoDefault> = read_envelope(json!({ "ok": false, "code": "NOT_FOUND" }));
        assert!(missing.data.is_none());
    }
}
