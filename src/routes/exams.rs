use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{
    AddExamQuestionRequest, CreateExamRequest, ExamListParams, UpdateExamRequest,
};
use crate::services::ExamService;
use crate::utils::{SafeIDI64, SafeQuestionIdI64};

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

// HTTP处理程序
pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(query.into_inner(), &req).await
}

pub async fn create_exam(
    req: HttpRequest,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(exam_data.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(exam_id.0, &req).await
}

pub async fn update_exam(
    req: HttpRequest,
    exam_id: SafeIDI64,
    update_data: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(exam_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(exam_id.0, &req).await
}

pub async fn publish_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.publish_exam(exam_id.0, &req).await
}

pub async fn archive_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.archive_exam(exam_id.0, &req).await
}

pub async fn add_exam_question(
    req: HttpRequest,
    exam_id: SafeIDI64,
    question_data: web::Json<AddExamQuestionRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .add_exam_question(exam_id.0, question_data.into_inner(), &req)
        .await
}

pub async fn remove_exam_question(
    req: HttpRequest,
    exam_id: SafeIDI64,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .remove_exam_question(exam_id.0, question_id.0, &req)
        .await
}

// 配置路由
pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_exams))
            .route("", web::post().to(create_exam))
            .route("/{id}", web::get().to(get_exam))
            .route("/{id}", web::put().to(update_exam))
            .route("/{id}", web::delete().to(delete_exam))
            .route("/{id}/publish", web::post().to(publish_exam))
            .route("/{id}/archive", web::post().to(archive_exam))
            .route("/{id}/questions", web::post().to(add_exam_question))
            .route(
                "/{id}/questions/{question_id}",
                web::delete().to(remove_exam_question),
            ),
    );
}
