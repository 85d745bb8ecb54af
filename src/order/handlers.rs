use actix_files::NamedFile;
use actix_web::http::header::{
    self, ContentDisposition, DispositionParam, DispositionType, HeaderValue,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use std::collections::BTreeMap;

use crate::order::models::{PrintResponse, ServiceInfo};
use crate::printer::{dispatch_with_timeout, PrintJob};
use crate::report::common::XLSX_MIME;
use crate::report::{
    GeneratedDocument, Generator, OrderRequest, ReportError, ValidatedOrder, ValidationError,
    Validator,
};
use crate::{AppState, ErrorResponse};

fn validation_failed(endpoint: &str, err: &ValidationError) -> HttpResponse {
    log::warn!("{} rejected: {}", endpoint, err);
    HttpResponse::BadRequest().json(ErrorResponse::new(&err.to_string()))
}

fn generation_failed(
    state: &AppState,
    endpoint: &str,
    order: &ValidatedOrder,
    err: &ReportError,
) -> HttpResponse {
    log::error!("{} failed to generate order sheet: {}", endpoint, err);

    let mut text = format!("{} failed: {}", endpoint, err);
    if let Some(requester) = &order.meta.requester {
        text.push_str(&format!("\nrequester: {}", requester));
    }
    if let Some(branch) = &order.meta.branch {
        text.push_str(&format!("\nbranch: {}", branch));
    }
    text.push_str(&format!("\nitems: {}", order.items.len()));
    state.notifier.notify(text);

    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Failed to create the order sheet"))
}

/// Render the workbook on the blocking pool.
async fn generate(
    state: &AppState,
    order: ValidatedOrder,
) -> Result<GeneratedDocument, ReportError> {
    let generator = state.generator.clone();
    web::block(move || generator.generate(order))
        .await
        .map_err(|e| ReportError::Worker(e.to_string()))?
}

/// Validate and render, mapping both failure classes to responses.
async fn validate_and_generate(
    state: &AppState,
    endpoint: &str,
    request: &OrderRequest,
) -> Result<(ValidatedOrder, GeneratedDocument), HttpResponse> {
    let order = request
        .validate(&state.validation_policy())
        .map_err(|e| validation_failed(endpoint, &e))?;

    match generate(state, order.clone()).await {
        Ok(document) => Ok((order, document)),
        Err(e) => Err(generation_failed(state, endpoint, &order, &e)),
    }
}

async fn attachment(
    req: &HttpRequest,
    state: &AppState,
    document: &GeneratedDocument,
) -> HttpResponse {
    match NamedFile::open_async(&document.path).await {
        Ok(file) => {
            let mut response = file
                .set_content_disposition(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(document.filename.clone())],
                })
                .into_response(req);
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME));
            response
        }
        Err(e) => {
            log::error!("failed to open {}: {}", document.path.display(), e);
            state
                .notifier
                .notify(format!("failed to serve {}: {}", document.filename, e));
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to read the order sheet"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/print",
    tag = "Order Print",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order sheet created and handed to the printer", body = PrintResponse),
        (status = 400, description = "Invalid order or unknown printer", body = ErrorResponse),
        (status = 500, description = "Order sheet could not be created", body = ErrorResponse)
    )
)]
pub async fn print_order(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> impl Responder {
    let request = body.into_inner();
    log::info!(
        "POST /print: printer={:?} requester={:?} branch={:?}",
        request.printer,
        request.username,
        request.filial
    );

    // Both checks run before anything is written.
    let order = match request.validate(&state.validation_policy()) {
        Ok(order) => order,
        Err(e) => return validation_failed("/print", &e),
    };
    let printer = match state
        .config
        .printers
        .resolve(request.printer.as_deref(), &state.config.default_printer)
    {
        Ok(printer) => printer,
        Err(e) => return validation_failed("/print", &e),
    };

    let document = match generate(&state, order.clone()).await {
        Ok(document) => document,
        Err(e) => return generation_failed(&state, "/print", &order, &e),
    };

    let job = PrintJob {
        path: document.path.clone(),
        filename: document.filename.clone(),
        printer: printer.clone(),
    };
    let outcome =
        dispatch_with_timeout(state.dispatcher.as_ref(), &job, state.config.print_timeout).await;

    HttpResponse::Ok().json(PrintResponse {
        success: true,
        message: format!("Order sheet created and sent to {}", printer.name),
        filename: document.filename,
        printer: printer.name,
        items_count: document.items_count,
        total_quantity: document.total_quantity,
        print_status: outcome.status_text(state.labels()),
        file_path: document.path.display().to_string(),
        order_id: order.meta.order_id,
        category: order.meta.category,
    })
}

#[utoipa::path(
    post,
    path = "/excel",
    tag = "Order Print",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order sheet download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", body = Vec<u8>),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 500, description = "Order sheet could not be created", body = ErrorResponse)
    )
)]
pub async fn excel_download(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> impl Responder {
    let request = body.into_inner();
    log::info!(
        "POST /excel: requester={:?} branch={:?}",
        request.username,
        request.filial
    );

    match validate_and_generate(&state, "/excel", &request).await {
        Ok((_, document)) => attachment(&req, &state, &document).await,
        Err(response) => response,
    }
}

/// Fixed sample order used by `GET /test`.
pub fn sample_order() -> OrderRequest {
    OrderRequest {
        items: Some(json!([
            {"product": "Test item 1", "count": 2},
            {"product": "Test item 2", "count": 3},
            {"product": "Test item 3", "count": 1}
        ])),
        username: Some("Test User".to_string()),
        filial: Some("Test Branch".to_string()),
        ..OrderRequest::default()
    }
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "Order Print",
    responses(
        (status = 200, description = "Sample order sheet download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", body = Vec<u8>),
        (status = 500, description = "Order sheet could not be created", body = ErrorResponse)
    )
)]
pub async fn test_download(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    log::info!("GET /test");
    match validate_and_generate(&state, "/test", &sample_order()).await {
        Ok((_, document)) => attachment(&req, &state, &document).await,
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Order Print",
    responses(
        (status = 200, description = "Service metadata", body = ServiceInfo)
    )
)]
pub async fn service_info(state: web::Data<AppState>) -> impl Responder {
    let endpoints: BTreeMap<String, String> = [
        ("POST /print", "Create an order sheet and print it"),
        ("POST /excel", "Create an order sheet and download it"),
        ("GET /test", "Download a sample order sheet"),
        ("GET /", "Service metadata"),
        ("POST /agent", "Echo a request body (debug)"),
        ("POST /debug/print", "Log and echo a print request (debug)"),
        ("GET /metrics", "Prometheus metrics"),
        ("GET /swagger-ui/", "API documentation"),
    ]
    .into_iter()
    .map(|(route, description)| (route.to_string(), description.to_string()))
    .collect();

    let features = [
        "Excel (.xlsx) order sheets",
        "Fixed print-ready layout",
        "Printing",
        "Download",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    HttpResponse::Ok().json(ServiceInfo {
        name: "Excel Print Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        description: "Builds order spreadsheets and sends them to a printer".to_string(),
        printers: state.config.printers.entries().clone(),
        features,
        endpoints,
        example: json!({
            "url": "/print",
            "method": "POST",
            "body": {
                "printer": state.config.default_printer,
                "username": "John Doe",
                "filial": "Tashkent",
                "items": [
                    {"product": "Item 1", "count": 2},
                    {"product": "Item 2", "count": 1}
                ]
            }
        }),
    })
}
