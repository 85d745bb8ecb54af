use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// How a debug body was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Json,
    Text,
    Bytes,
}

/// Parsed form of an arbitrary request body.
#[derive(Debug, Clone, PartialEq)]
pub enum EchoBody {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl EchoBody {
    /// JSON first, then UTF-8 text, then opaque bytes.
    pub fn classify(body: &[u8]) -> Self {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            return Self::Json(value);
        }
        match std::str::from_utf8(body) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Bytes(body.to_vec()),
        }
    }

    pub fn body_type(&self) -> BodyType {
        match self {
            Self::Json(_) => BodyType::Json,
            Self::Text(_) => BodyType::Text,
            Self::Bytes(_) => BodyType::Bytes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrintEchoResponse {
    pub ok: bool,
    pub body_type: BodyType,
}

#[utoipa::path(
    post,
    path = "/agent",
    tag = "Debug",
    request_body(content = String, description = "Any body"),
    responses(
        (status = 200, description = "Echo of the received body")
    )
)]
pub async fn agent_echo(body: web::Bytes) -> impl Responder {
    match EchoBody::classify(&body) {
        EchoBody::Json(received) => {
            log::info!("/agent JSON body: {}", received);
            HttpResponse::Ok().json(json!({ "status": "success", "received": received }))
        }
        _ => {
            let raw = String::from_utf8_lossy(&body).into_owned();
            log::info!("/agent raw body: {}", raw);
            HttpResponse::Ok().json(json!({ "success": true, "raw_received": raw }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/debug/print",
    tag = "Debug",
    request_body(content = String, description = "Any body"),
    responses(
        (status = 200, description = "Body was logged", body = PrintEchoResponse)
    )
)]
pub async fn print_echo(req: HttpRequest, body: web::Bytes) -> impl Responder {
    let headers: BTreeMap<&str, String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let query = web::Query::<BTreeMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    let parsed = EchoBody::classify(&body);
    let body_type = parsed.body_type();

    log::info!("/debug/print headers: {:?}", headers);
    log::info!("/debug/print query: {:?}", query);
    match &parsed {
        EchoBody::Json(value) => log::info!("/debug/print json body: {}", value),
        EchoBody::Text(text) => log::info!("/debug/print text body: {}", text),
        EchoBody::Bytes(bytes) => log::info!("/debug/print {} bytes: {:?}", bytes.len(), bytes),
    }

    HttpResponse::Ok().json(PrintEchoResponse {
        ok: true,
        body_type,
    })
}
