use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::campuses::requests::{CampusListParams, CreateCampusRequest, UpdateCampusRequest};
use crate::services::CampusService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CampusService 实例
static CAMPUS_SERVICE: Lazy<CampusService> = Lazy::new(CampusService::new_lazy);

// HTTP处理程序
pub async fn list_campuses(
    req: HttpRequest,
    query: web::Query<CampusListParams>,
) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.list_campuses(query.into_inner(), &req).await
}

pub async fn create_campus(
    req: HttpRequest,
    campus_data: web::Json<CreateCampusRequest>,
) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.create_campus(campus_data.into_inner(), &req).await
}

pub async fn get_campus(req: HttpRequest, campus_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.get_campus(campus_id.0, &req).await
}

pub async fn update_campus(
    req: HttpRequest,
    campus_id: SafeIDI64,
    update_data: web::Json<UpdateCampusRequest>,
) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE
        .update_campus(campus_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_campus(req: HttpRequest, campus_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.delete_campus(campus_id.0, &req).await
}

// 配置路由
pub fn configure_campus_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/campuses")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_campuses))
            .route("", web::post().to(create_campus))
            .route("/{id}", web::get().to(get_campus))
            .route("/{id}", web::put().to(update_campus))
            .route("/{id}", web::delete().to(delete_campus)),
    );
}
