pub mod academic_years;
pub mod audit;
pub mod auth;
pub mod campuses;
pub mod classes;
pub mod enrollments;
pub mod exams;
pub mod questions;
pub mod sections;
pub mod settings;
pub mod students;
pub mod tenants;
pub mod users;

pub use academic_years::configure_academic_year_routes;
pub use audit::configure_audit_routes;
pub use auth::configure_auth_routes;
pub use campuses::configure_campus_routes;
pub use classes::configure_classes_routes;
pub use enrollments::configure_enrollment_routes;
pub use exams::configure_exam_routes;
pub use questions::configure_question_routes;
pub use sections::configure_section_routes;
pub use settings::configure_settings_routes;
pub use students::configure_student_routes;
pub use tenants::configure_tenant_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_tenant_routes)
        .configure(configure_campus_routes)
        .configure(configure_user_routes)
        .configure(configure_academic_year_routes)
        .configure(configure_classes_routes)
        .configure(configure_section_routes)
        .configure(configure_student_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_question_routes)
        .configure(configure_exam_routes)
        .configure(configure_settings_routes)
        .configure(configure_audit_routes);
}
