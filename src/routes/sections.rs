use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::sections::requests::{
    CreateSectionRequest, SectionQueryParams, UpdateSectionRequest,
};
use crate::services::SectionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SectionService 实例
static SECTION_SERVICE: Lazy<SectionService> = Lazy::new(SectionService::new_lazy);

// HTTP处理程序
pub async fn list_sections(
    req: HttpRequest,
    query: web::Query<SectionQueryParams>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.list_sections(query.into_inner(), &req).await
}

pub async fn create_section(
    req: HttpRequest,
    section_data: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .create_section(section_data.into_inner(), &req)
        .await
}

pub async fn get_section(req: HttpRequest, section_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.get_section(section_id.0, &req).await
}

pub async fn update_section(
    req: HttpRequest,
    section_id: SafeIDI64,
    update_data: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .update_section(section_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_section(req: HttpRequest, section_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.delete_section(section_id.0, &req).await
}

// 配置路由
pub fn configure_section_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_sections))
            .route("", web::post().to(create_section))
            .route("/{id}", web::get().to(get_section))
            .route("/{id}", web::put().to(update_section))
            .route("/{id}", web::delete().to(delete_section)),
    );
}
