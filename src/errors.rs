//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_scholarprep_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ScholarPrepError {
            $($variant(String),)*
        }

        impl ScholarPrepError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ScholarPrepError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ScholarPrepError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ScholarPrepError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl ScholarPrepError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ScholarPrepError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_scholarprep_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Import("E014", "Import Error"),
}

impl ScholarPrepError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ScholarPrepError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ScholarPrepError::NotFound(_))
    }
}

impl fmt::Display for ScholarPrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ScholarPrepError {}

// 唯一约束冲突单独映射为 Conflict，其余归为数据库操作错误
impl From<sea_orm::DbErr> for ScholarPrepError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                ScholarPrepError::Conflict(detail)
            }
            _ => ScholarPrepError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for ScholarPrepError {
    fn from(err: std::io::Error) -> Self {
        ScholarPrepError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ScholarPrepError {
    fn from(err: serde_json::Error) -> Self {
        ScholarPrepError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ScholarPrepError {
    fn from(err: chrono::ParseError) -> Self {
        ScholarPrepError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for ScholarPrepError {
    fn from(err: csv::Error) -> Self {
        ScholarPrepError::Import(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScholarPrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ScholarPrepError::cache_connection("test").code(), "E001");
        assert_eq!(ScholarPrepError::database_config("test").code(), "E003");
        assert_eq!(ScholarPrepError::validation("test").code(), "E007");
        assert_eq!(ScholarPrepError::conflict("test").code(), "E010");
        assert_eq!(ScholarPrepError::authentication("test").code(), "E012");
        assert_eq!(ScholarPrepError::import("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ScholarPrepError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            ScholarPrepError::not_found("test").error_type(),
            "Resource Not Found"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = ScholarPrepError::validation("Invalid admission number");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid admission number"));
    }

    #[test]
    fn test_plain_db_error_is_database_operation() {
        let err: ScholarPrepError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_csv_error_is_import() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"\xff\xfe"[..]);
        let err = reader
            .records()
            .next()
            .and_then(|r| r.err())
            .map(ScholarPrepError::from);
        assert!(matches!(err, Some(ScholarPrepError::Import(_))));
    }
}
