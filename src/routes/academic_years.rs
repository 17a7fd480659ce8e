use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic_years::requests::{
    AcademicYearListParams, CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::services::AcademicYearService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AcademicYearService 实例
static ACADEMIC_YEAR_SERVICE: Lazy<AcademicYearService> =
    Lazy::new(AcademicYearService::new_lazy);

// HTTP处理程序
pub async fn list_academic_years(
    req: HttpRequest,
    query: web::Query<AcademicYearListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .list_academic_years(query.into_inner(), &req)
        .await
}

pub async fn create_academic_year(
    req: HttpRequest,
    year_data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .create_academic_year(year_data.into_inner(), &req)
        .await
}

pub async fn get_academic_year(req: HttpRequest, year_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.get_academic_year(year_id.0, &req).await
}

pub async fn update_academic_year(
    req: HttpRequest,
    year_id: SafeIDI64,
    update_data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .update_academic_year(year_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_academic_year(req: HttpRequest, year_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.delete_academic_year(year_id.0, &req).await
}

// 设为当前学年
pub async fn set_current_academic_year(
    req: HttpRequest,
    year_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.set_current(year_id.0, &req).await
}

// 配置路由
pub fn configure_academic_year_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_academic_years))
            .route("", web::post().to(create_academic_year))
            .route("/{id}", web::get().to(get_academic_year))
            .route("/{id}", web::put().to(update_academic_year))
            .route("/{id}", web::delete().to(delete_academic_year))
            .route("/{id}/current", web::post().to(set_current_academic_year)),
    );
}
