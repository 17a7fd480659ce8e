use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, check_duration, check_exam_class, check_title};
use crate::models::ApiResponse;
use crate::models::exams::requests::{CreateExamRequest, NewExam};
use crate::policy::{Action, Resource};
use crate::services::campuses::load_campus;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, record_audit,
    respond,
};
use crate::services::settings::load_resolved_settings;

pub async fn create_exam(
    service: &ExamService,
    exam_data: CreateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, exam_data, request).await)
}

async fn create(service: &ExamService, exam_data: CreateExamRequest, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let campus_id = principal.resolve_campus(exam_data.campus_id).or_forbidden()?;

    let title = exam_data.title.trim().to_string();
    check_title(&title)?;

    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, campus.scope())
        .or_forbidden()?;

    if let Some(class_id) = exam_data.class_id {
        check_exam_class(&storage, class_id, campus.id).await?;
    }

    let duration_minutes = match exam_data.duration_minutes {
        Some(minutes) => minutes,
        None => {
            load_resolved_settings(&storage, request, campus.tenant_id)
                .await?
                .exam_default_duration_minutes
        }
    };
    check_duration(duration_minutes)?;

    let exam = storage
        .create_exam(NewExam {
            tenant_id: campus.tenant_id,
            campus_id: campus.id,
            class_id: exam_data.class_id,
            title,
            description: exam_data.description,
            duration_minutes,
            scheduled_at: exam_data.scheduled_at,
            created_by: Some(principal.user_id),
        })
        .await
        .or_storage_failure("Exam creation failed")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Exam, exam.id)
            .in_scope(exam.scope())
            .summary(format!("created exam {}", exam.title)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created successfully")))
}
