//! 业务逻辑层
//!
//! 每个模块一个服务，路由层通过懒加载的全局实例调用。
//! 所有写操作先经过 `policy` 授权，成功后写入审计日志。

pub mod academic_years;
pub mod audit;
pub mod auth;
pub mod campuses;
pub mod classes;
pub mod common;
pub mod enrollments;
pub mod exams;
pub mod questions;
pub mod sections;
pub mod settings;
pub mod students;
pub mod tenants;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use academic_years::AcademicYearService;
pub use audit::AuditService;
pub use auth::AuthService;
pub use campuses::CampusService;
pub use classes::ClassService;
pub use enrollments::EnrollmentService;
pub use exams::ExamService;
pub use questions::QuestionService;
pub use sections::SectionService;
pub use settings::SettingsService;
pub use students::StudentService;
pub use tenants::TenantService;
pub use users::UserService;

/// 声明服务结构体
///
/// 存储与缓存默认从 actix 的 app data 中获取，测试时可通过 `with_storage` 注入。
macro_rules! declare_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> Result<std::sync::Arc<dyn $crate::storage::Storage>, actix_web::HttpResponse> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::common::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use declare_service;
