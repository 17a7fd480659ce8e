//! 学生 CSV 批量导入
//!
//! 表单字段：`file`（CSV）、`section_id`、`academic_year_id`，可选 `campus_id`。
//! 必需列 `admission_no, first_name, last_name`，可选列
//! `date_of_birth, gender, guardian_name, guardian_phone`。
//!
//! 校验失败的行计入 `failed`，学号重复（文件内或租户内已存在）的行计入 `skipped`，
//! 其余行连同注册记录在同一事务中写入。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use tracing::info;

use super::{StudentFields, StudentService, normalize_gender};
use crate::config::AppConfig;
use crate::models::audit::entities::AuditAction;
use crate::models::students::requests::{NewStudent, StudentImportBatch};
use crate::models::students::responses::{ImportRowError, StudentImportResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::academic_years::load_academic_year;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, conflict,
    current_principal, record_audit, respond,
};
use crate::services::sections::load_section;
use crate::services::settings::load_resolved_settings;

const REQUIRED_COLUMNS: [&str; 3] = ["admission_no", "first_name", "last_name"];

/// 导入解析错误
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "The file contains no data rows".to_string(),
        }
    }
}

/// CSV 中的一行原始数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CsvStudentRow {
    pub row: usize,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub guardian_name: String,
    pub guardian_phone: String,
}

/// 校验通过的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidStudentRow {
    pub row: usize,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

impl ValidStudentRow {
    fn into_new_student(self, tenant_id: i64, campus_id: i64, created_by: i64) -> NewStudent {
        NewStudent {
            tenant_id,
            campus_id,
            admission_no: self.admission_no,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            created_by: Some(created_by),
        }
    }
}

/// 上传表单
#[derive(Debug, Default)]
struct ImportForm {
    file: Vec<u8>,
    section_id: Option<String>,
    academic_year_id: Option<String>,
    campus_id: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn parse_csv(data: &[u8]) -> Result<Vec<CsvStudentRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header row: {e}")))?;
    // 表头不区分大小写，并忽略 UTF-8 BOM
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(ImportParseError::MissingColumn(column.to_string()));
        }
    }
    let column = |name: &str| header_map.get(name).copied();
    let (admission_idx, first_idx, last_idx) =
        (column("admission_no"), column("first_name"), column("last_name"));
    let (dob_idx, gender_idx, guardian_idx, phone_idx) = (
        column("date_of_birth"),
        column("gender"),
        column("guardian_name"),
        column("guardian_phone"),
    );

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let row = index + 2;
        let record = result
            .map_err(|e| ImportParseError::ParseFailed(format!("Failed to parse row {row}: {e}")))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        rows.push(CsvStudentRow {
            row,
            admission_no: cell(admission_idx),
            first_name: cell(first_idx),
            last_name: cell(last_idx),
            date_of_birth: cell(dob_idx),
            gender: cell(gender_idx),
            guardian_name: cell(guardian_idx),
            guardian_phone: cell(phone_idx),
        });
    }

    if rows.is_empty() {
        return Err(ImportParseError::EmptyFile);
    }
    Ok(rows)
}

/// 校验一行，返回该行全部字段错误
pub(crate) fn validate_row(
    row: &CsvStudentRow,
    today: NaiveDate,
) -> Result<ValidStudentRow, Vec<ImportRowError>> {
    let mut errors = Vec::new();

    let date_of_birth = match optional(&row.date_of_birth) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(ImportRowError::new(
                    row.row,
                    "date_of_birth",
                    "Date of birth must use the YYYY-MM-DD format",
                ));
                None
            }
        },
        None => None,
    };

    let gender = normalize_gender(optional(&row.gender));
    let guardian_name = optional(&row.guardian_name);
    let guardian_phone = optional(&row.guardian_phone);

    let fields = StudentFields {
        admission_no: Some(&row.admission_no),
        first_name: Some(&row.first_name),
        last_name: Some(&row.last_name),
        date_of_birth,
        gender: gender.as_deref(),
        guardian_name: guardian_name.as_deref(),
        guardian_phone: guardian_phone.as_deref(),
    };
    errors.extend(
        fields
            .problems(today)
            .into_iter()
            .map(|(field, msg)| ImportRowError::new(row.row, field, msg)),
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidStudentRow {
        row: row.row,
        admission_no: row.admission_no.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        date_of_birth,
        gender,
        guardian_name,
        guardian_phone,
    })
}

/// 导入计划：待写入的行与被拒绝的行
#[derive(Debug, Default)]
pub(crate) struct ImportPlan {
    pub rows: Vec<ValidStudentRow>,
    pub errors: Vec<ImportRowError>,
    pub failed: usize,
    pub skipped: usize,
}

impl ImportPlan {
    /// 校验所有行并剔除文件内重复的学号（保留首次出现的行）
    pub(crate) fn from_rows(rows: &[CsvStudentRow], today: NaiveDate) -> Self {
        let mut plan = Self::default();
        let mut seen = HashSet::new();

        for row in rows {
            match validate_row(row, today) {
                Ok(valid) => {
                    if seen.insert(valid.admission_no.clone()) {
                        plan.rows.push(valid);
                    } else {
                        plan.skipped += 1;
                        plan.errors.push(ImportRowError::new(
                            valid.row,
                            "admission_no",
                            format!("Duplicate admission number {} in file", valid.admission_no),
                        ));
                    }
                }
                Err(mut errors) => {
                    plan.failed += 1;
                    plan.errors.append(&mut errors);
                }
            }
        }
        plan
    }

    pub(crate) fn admission_nos(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.admission_no.clone()).collect()
    }

    /// 剔除租户内已存在的学号
    pub(crate) fn skip_existing(&mut self, existing: &HashSet<String>) {
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|r| !existing.contains(&r.admission_no));
        self.rows = kept;
        self.skipped += dropped.len();
        self.errors.extend(dropped.into_iter().map(|r| {
            ImportRowError::new(
                r.row,
                "admission_no",
                format!("Admission number {} already exists", r.admission_no),
            )
        }));
        self.errors.sort_by_key(|e| e.row);
    }
}

fn field_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim().to_string()
}

async fn read_form(payload: &mut Multipart, max_file_size: usize) -> Result<ImportForm, String> {
    let mut form = ImportForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to read form field: {e}"))?;
        let name = field.name().unwrap_or_default().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| format!("Failed to read upload data: {e}"))?;
            if data.len() + chunk.len() > max_file_size {
                return Err(format!("The uploaded file exceeds {max_file_size} bytes"));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "file" => form.file = data,
            "section_id" => form.section_id = Some(field_text(&data)),
            "academic_year_id" => form.academic_year_id = Some(field_text(&data)),
            "campus_id" => form.campus_id = optional(&field_text(&data)),
            _ => {}
        }
    }

    if form.file.is_empty() {
        return Err("No file field found in the upload".to_string());
    }
    Ok(form)
}

fn parse_form_id(value: Option<&str>, name: &str) -> Result<i64, HttpResponse> {
    crate::utils::extractor::parse_positive_id(value, name).map_err(|_| {
        bad_request(
            ErrorCode::BadRequest,
            format!("Form field '{name}' must be a positive integer"),
        )
    })
}

pub async fn import_students(
    service: &StudentService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let max_file_size = AppConfig::get().import.max_file_size;
    let form = match read_form(&mut payload, max_file_size).await {
        Ok(form) => form,
        Err(msg) => return Ok(bad_request(ErrorCode::FileUploadFailed, msg)),
    };
    respond(import(service, form, request).await)
}

async fn import(service: &StudentService, form: ImportForm, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;

    let section_id = parse_form_id(form.section_id.as_deref(), "section_id")?;
    let academic_year_id = parse_form_id(form.academic_year_id.as_deref(), "academic_year_id")?;
    let campus_id = match form.campus_id.as_deref() {
        Some(raw) => Some(parse_form_id(Some(raw), "campus_id")?),
        None => None,
    };

    // 1. 目标分班、学年与权限
    let storage = service.get_storage(request)?;
    let section = load_section(&storage, section_id).await?;
    principal
        .authorize(Resource::Student, Action::Write, section.scope())
        .or_forbidden()?;
    principal
        .authorize(Resource::Enrollment, Action::Write, section.scope())
        .or_forbidden()?;

    if campus_id.is_some_and(|c| c != section.campus_id) {
        return Err(bad_request(
            ErrorCode::EnrollmentScopeMismatch,
            "campus_id does not match the section's campus",
        ));
    }
    let year = load_academic_year(&storage, academic_year_id).await?;
    if year.tenant_id != section.tenant_id {
        return Err(bad_request(
            ErrorCode::EnrollmentScopeMismatch,
            "The academic year belongs to another tenant",
        ));
    }

    // 2. 解析与行数限制
    let rows = parse_csv(&form.file).map_err(|e| bad_request(e.error_code(), e.message()))?;
    let settings = load_resolved_settings(&storage, request, section.tenant_id).await?;
    if rows.len() as i64 > settings.import_max_rows {
        return Err(bad_request(
            ErrorCode::ImportFileDataInvalid,
            format!(
                "At most {} rows can be imported at once, the file has {}",
                settings.import_max_rows,
                rows.len()
            ),
        ));
    }

    // 3. 逐行校验与去重
    let mut plan = ImportPlan::from_rows(&rows, chrono::Utc::now().date_naive());
    if !plan.rows.is_empty() {
        let existing: HashSet<String> = storage
            .find_existing_admission_nos(section.tenant_id, &plan.admission_nos())
            .await
            .or_storage_failure("Failed to check existing admission numbers")?
            .into_iter()
            .collect();
        plan.skip_existing(&existing);
    }

    // 4. 分班容量对整批生效
    if let Some(capacity) = section.capacity
        && !plan.rows.is_empty()
    {
        let enrolled = storage
            .count_active_enrollments(section.id, year.id)
            .await
            .or_storage_failure("Failed to count enrollments")?;
        let remaining = section.remaining_seats(enrolled).unwrap_or(0);
        if (plan.rows.len() as u64) > remaining {
            return Err(conflict(
                ErrorCode::SectionFull,
                format!(
                    "Section capacity is {capacity}, {enrolled} enrolled; cannot add {} students",
                    plan.rows.len()
                ),
            ));
        }
    }

    // 5. 单事务写入
    let created = if plan.rows.is_empty() {
        0
    } else {
        let students = std::mem::take(&mut plan.rows)
            .into_iter()
            .map(|r| r.into_new_student(section.tenant_id, section.campus_id, principal.user_id))
            .collect();
        let created = storage
            .import_students(StudentImportBatch {
                section_id: section.id,
                academic_year_id: year.id,
                students,
            })
            .await
            .or_conflict(
                ErrorCode::ImportFailed,
                "Import rolled back: an admission number was taken concurrently",
                "Student import failed",
            )?;
        created.len()
    };

    if created > 0 {
        record_audit(
            &storage,
            request,
            &principal,
            AuditEvent::batch(AuditAction::Create, Resource::Student)
                .in_scope(section.scope())
                .summary(format!(
                    "imported {created} students into section {} ({})",
                    section.name, year.name
                )),
        )
        .await;
    }

    info!(
        "Student import into section {}: {} rows, {} created, {} skipped, {} failed",
        section.id,
        rows.len(),
        created,
        plan.skipped,
        plan.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentImportResponse {
            total: rows.len(),
            created,
            skipped: plan.skipped,
            failed: plan.failed,
            errors: plan.errors,
        },
        "Import completed",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    const SAMPLE: &str = "\u{feff}Admission_No,First_Name,Last_Name,Date_of_Birth,Gender\n\
        ADM-001,Amara,Okafor,2012-04-18,Female\n\
        ADM-002,Liam,Chen,,\n\
        ,,,\n\
        ADM-003,Sofia,,2012-13-01,unknown\n\
        ADM-001,Amara,Okafor,,\n";

    #[test]
    fn test_parse_csv_headers_and_blank_lines() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].admission_no, "ADM-001");
        assert_eq!(rows[0].gender, "Female");
        // 空行被跳过，但行号保持与文件一致
        assert_eq!(rows[2].row, 5);
        assert_eq!(rows[2].guardian_phone, "");
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"admission_no,first_name\nA1,Jo\n").unwrap_err();
        assert_eq!(err, ImportParseError::MissingColumn("last_name".to_string()));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_parse_csv_header_only() {
        let err = parse_csv(b"admission_no,first_name,last_name\n").unwrap_err();
        assert_eq!(err, ImportParseError::EmptyFile);
    }

    #[test]
    fn test_validate_row_reports_every_field() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let errors = validate_row(&rows[2], today()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["date_of_birth", "last_name", "gender"]);
        assert!(errors.iter().all(|e| e.row == 5));
    }

    #[test]
    fn test_validate_row_normalizes_values() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let valid = validate_row(&rows[0], today()).unwrap();
        assert_eq!(valid.gender.as_deref(), Some("female"));
        assert_eq!(valid.date_of_birth, NaiveDate::from_ymd_opt(2012, 4, 18));
        assert_eq!(valid.guardian_name, None);
    }

    #[test]
    fn test_plan_counts_failed_and_in_file_duplicates() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let plan = ImportPlan::from_rows(&rows, today());
        assert_eq!(plan.rows.len(), 2);
        assert_eq!(plan.failed, 1);
        assert_eq!(plan.skipped, 1);
        assert!(plan
            .errors
            .iter()
            .any(|e| e.row == 6 && e.field == "admission_no"));
    }

    #[test]
    fn test_plan_skips_existing_admission_numbers() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let mut plan = ImportPlan::from_rows(&rows, today());
        let existing: HashSet<String> = ["ADM-002".to_string()].into_iter().collect();
        plan.skip_existing(&existing);

        assert_eq!(plan.admission_nos(), vec!["ADM-001".to_string()]);
        assert_eq!(plan.skipped, 2);
        // 错误按行号排序
        let rows: Vec<_> = plan.errors.iter().map(|e| e.row).collect();
        let mut sorted = rows.clone();
        sorted.sort();
        assert_eq!(rows, sorted);
    }

    #[test]
    fn test_into_new_student() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let valid = validate_row(&rows[1], today()).unwrap();
        let student = valid.into_new_student(1, 10, 42);
        assert_eq!(student.tenant_id, 1);
        assert_eq!(student.campus_id, 10);
        assert_eq!(student.created_by, Some(42));
        assert_eq!(student.date_of_birth, None);
    }

    fn upload(school: &crate::services::testing::School, csv: &str) -> ImportForm {
        ImportForm {
            file: csv.as_bytes().to_vec(),
            section_id: Some(school.section_id.to_string()),
            academic_year_id: Some(school.academic_year_id.to_string()),
            campus_id: Some(school.campus_id.to_string()),
        }
    }

    #[actix_web::test]
    async fn test_import_enforces_capacity_for_whole_batch() {
        use crate::models::enrollments::requests::NewEnrollment;
        use crate::services::testing::*;
        use actix_web::http::StatusCode;

        let storage = memory_storage().await;
        let school = seed_school(&storage, "willow", Some(2)).await;
        let service = StudentService::with_storage(storage.clone());
        let request = request_as(&school.admin);

        let seated = seed_student(&storage, school.tenant_id, school.campus_id, "W-0").await;
        storage
            .create_enrollment(NewEnrollment {
                tenant_id: school.tenant_id,
                campus_id: school.campus_id,
                student_id: seated.id,
                section_id: school.section_id,
                academic_year_id: school.academic_year_id,
                created_by: None,
            })
            .await
            .unwrap();

        // 只剩一个名额，两行有效数据整体拒绝
        let two_rows = "admission_no,first_name,last_name\n\
            W-1,Ines,Moreau\n\
            W-2,Kofi,Mensah\n";
        let response = import(&service, upload(&school, two_rows), &request)
            .await
            .unwrap_err();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::CONFLICT, code(ErrorCode::SectionFull))
        );
        let existing = storage
            .find_existing_admission_nos(
                school.tenant_id,
                &["W-1".to_string(), "W-2".to_string()],
            )
            .await
            .unwrap();
        assert!(existing.is_empty());

        // 已存在的学号被跳过，不占用名额
        let with_duplicate = "admission_no,first_name,last_name\n\
            W-0,Ada,Seated\n\
            W-1,Ines,Moreau\n";
        let response = import(&service, upload(&school, with_duplicate), &request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["created"], 1);
        assert_eq!(json["data"]["skipped"], 1);
        assert_eq!(
            storage
                .count_active_enrollments(school.section_id, school.academic_year_id)
                .await
                .unwrap(),
            2
        );
    }
}
