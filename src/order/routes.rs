use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};

use super::handlers::{excel_download, print_order, service_info, test_download};
use crate::ErrorResponse;

/// Turns unreadable bodies into the usual `{error}` shape.
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("{} rejected body: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(&format!(
        "JSON body required: {}",
        err
    )));
    InternalError::from_response(err, response).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/").route(web::get().to(service_info)))
        .service(web::resource("/print").route(web::post().to(print_order)))
        .service(web::resource("/excel").route(web::post().to(excel_download)))
        .service(web::resource("/test").route(web::get().to(test_download)));
}
