use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static TENANT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]{2,32}$").expect("Invalid tenant code regex"));

static CAMPUS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid campus code regex"));

static ADMISSION_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9/_-]{1,32}$").expect("Invalid admission number regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{6,20}$").expect("Invalid phone regex"));

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username must be 3-32 characters of letters, numbers, dots, underscores or hyphens",
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 租户代码：小写字母、数字、连字符，2-32 位
pub fn validate_tenant_code(code: &str) -> Result<(), &'static str> {
    if !TENANT_CODE_RE.is_match(code) {
        return Err("Tenant code must be 2-32 characters of a-z, 0-9 or '-'");
    }
    Ok(())
}

pub fn validate_campus_code(code: &str) -> Result<(), &'static str> {
    if !CAMPUS_CODE_RE.is_match(code) {
        return Err("Campus code must be 1-32 characters of letters, numbers, '_' or '-'");
    }
    Ok(())
}

pub fn validate_admission_no(admission_no: &str) -> Result<(), &'static str> {
    if !ADMISSION_NO_RE.is_match(admission_no) {
        return Err("Admission number must be 1-32 characters of letters, numbers, '/', '_' or '-'");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<(), &'static str> {
    if !GENDERS.contains(&gender) {
        return Err("Gender must be one of: male, female, other");
    }
    Ok(())
}

/// 出生日期必须早于今天
pub fn validate_date_of_birth(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date >= today {
        return Err("Date of birth must be in the past");
    }
    Ok(())
}

/// 必填文本字段：去除首尾空白后非空且不超过 `max` 个字符
pub fn validate_required_text(value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("must not be empty".to_string());
    }
    if trimmed.chars().count() > max {
        return Err(format!("must be at most {max} characters"));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

const WEAK_PASSWORDS: [&str; 6] = [
    "password1",
    "password123",
    "qwerty123",
    "abcd1234",
    "welcome1",
    "school123",
];

/// 密码策略：至少 8 位，包含大写、小写字母和数字，且不在常见弱密码表中
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("ms.okafor").is_ok());
        assert!(validate_username("t_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("office@greenfield.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_tenant_code() {
        assert!(validate_tenant_code("greenfield-high").is_ok());
        assert!(validate_tenant_code("g1").is_ok());
        assert!(validate_tenant_code("G1").is_err());
        assert!(validate_tenant_code("a").is_err());
        assert!(validate_tenant_code("under_score").is_err());
        assert!(validate_tenant_code(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_admission_no_and_phone() {
        assert!(validate_admission_no("ADM/2025/001").is_ok());
        assert!(validate_admission_no("").is_err());
        assert!(validate_admission_no("ADM 001").is_err());
        assert!(validate_phone("+234 803 123 4567").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_gender() {
        assert!(validate_gender("female").is_ok());
        assert!(validate_gender("Female").is_err());
    }

    #[test]
    fn test_date_of_birth() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2012, 3, 14).unwrap();
        assert!(validate_date_of_birth(past, today).is_ok());
        assert!(validate_date_of_birth(today, today).is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Grade 7", 64).is_ok());
        assert!(validate_required_text("   ", 64).is_err());
        assert!(validate_required_text("abcdef", 5).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("Classroom42").is_valid);
    }

    #[test]
    fn test_password_rules() {
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
        assert!(
            validate_password("ABCD1234")
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
        assert!(
            validate_password("AbcdEfgh")
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
