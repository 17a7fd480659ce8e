pub mod create;
pub mod delete;
pub mod get;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::students::entities::Student;
use crate::models::students::requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest};
use crate::services::common::{OptionExt, StorageResultExt, bad_request};
use crate::services::declare_service;
use crate::storage::Storage;
use crate::utils::validate::{
    validate_admission_no, validate_date_of_birth, validate_gender, validate_phone,
    validate_required_text,
};

declare_service!(
    /// 学生档案与批量导入
    StudentService
);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        student_data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, student_data, request).await
    }

    pub async fn get_student(&self, student_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        update_data: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update_data, request).await
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    // CSV 批量导入并注册到分班
    pub async fn import_students(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_students(self, payload, request).await
    }
}

pub(crate) async fn load_student(
    storage: &Arc<dyn Storage>,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    storage
        .get_student_by_id(student_id)
        .await
        .or_storage_failure("Failed to load student")?
        .or_not_found(ErrorCode::StudentNotFound, "Student not found")
}

/// 待校验的学生字段，`None` 表示未提供
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StudentFields<'a> {
    pub admission_no: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub guardian_name: Option<&'a str>,
    pub guardian_phone: Option<&'a str>,
}

impl StudentFields<'_> {
    /// 返回所有不合法字段及原因
    pub(crate) fn problems(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let mut problems = Vec::new();
        if let Some(admission_no) = self.admission_no
            && let Err(msg) = validate_admission_no(admission_no)
        {
            problems.push(("admission_no", msg.to_string()));
        }
        for (field, value, max) in [
            ("first_name", self.first_name, 64),
            ("last_name", self.last_name, 64),
            ("guardian_name", self.guardian_name, 128),
        ] {
            if let Some(value) = value
                && let Err(msg) = validate_required_text(value, max)
            {
                problems.push((field, format!("{field} {msg}")));
            }
        }
        if let Some(date) = self.date_of_birth
            && let Err(msg) = validate_date_of_birth(date, today)
        {
            problems.push(("date_of_birth", msg.to_string()));
        }
        if let Some(gender) = self.gender
            && let Err(msg) = validate_gender(gender)
        {
            problems.push(("gender", msg.to_string()));
        }
        if let Some(phone) = self.guardian_phone
            && let Err(msg) = validate_phone(phone)
        {
            problems.push(("guardian_phone", msg.to_string()));
        }
        problems
    }

    /// 单条接口只报告第一个问题
    pub(crate) fn check(&self) -> Result<(), HttpResponse> {
        match self.problems(chrono::Utc::now().date_naive()).into_iter().next() {
            Some((_, msg)) => Err(bad_request(ErrorCode::StudentInvalid, msg)),
            None => Ok(()),
        }
    }
}

/// 性别统一存为小写
pub(crate) fn normalize_gender(gender: Option<String>) -> Option<String> {
    gender
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_valid_fields_have_no_problems() {
        let fields = StudentFields {
            admission_no: Some("ADM-2025/001"),
            first_name: Some("Amara"),
            last_name: Some("Okafor"),
            date_of_birth: Some(date("2012-04-18")),
            gender: Some("female"),
            guardian_name: Some("Ngozi Okafor"),
            guardian_phone: Some("+234 803 555 0101"),
        };
        assert!(fields.problems(date("2025-09-01")).is_empty());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let fields = StudentFields {
            admission_no: Some("bad number!"),
            first_name: Some("  "),
            date_of_birth: Some(date("2030-01-01")),
            gender: Some("unknown"),
            guardian_phone: Some("call me"),
            ..Default::default()
        };
        let fields: Vec<_> = fields
            .problems(date("2025-09-01"))
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(
            fields,
            vec!["admission_no", "first_name", "date_of_birth", "gender", "guardian_phone"]
        );
    }

    #[test]
    fn test_normalize_gender() {
        assert_eq!(normalize_gender(Some(" Male ".to_string())), Some("male".to_string()));
        assert_eq!(normalize_gender(Some("".to_string())), None);
        assert_eq!(normalize_gender(None), None);
    }
}
