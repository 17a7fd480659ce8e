use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 配置值类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettingValueType {
    String,
    Integer,
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 已知的租户配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSettingKey {
    TenantDisplayName,
    ImportMaxRows,
    ExamDefaultDuration,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::TenantDisplayName => "tenant.display_name",
            KnownSettingKey::ImportMaxRows => "import.max_rows",
            KnownSettingKey::ExamDefaultDuration => "exams.default_duration_minutes",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::TenantDisplayName => SettingValueType::String,
            KnownSettingKey::ImportMaxRows | KnownSettingKey::ExamDefaultDuration => {
                SettingValueType::Integer
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            KnownSettingKey::TenantDisplayName => "Name shown in the admin panel header",
            KnownSettingKey::ImportMaxRows => "Maximum data rows accepted by one student import",
            KnownSettingKey::ExamDefaultDuration => "Duration used when an exam omits one",
        }
    }

    /// 整数配置的取值范围
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            KnownSettingKey::TenantDisplayName => None,
            KnownSettingKey::ImportMaxRows => Some((1, crate::config::MAX_IMPORT_ROWS)),
            KnownSettingKey::ExamDefaultDuration => Some((1, 600)),
        }
    }

    pub fn all() -> [Self; 3] {
        [
            KnownSettingKey::TenantDisplayName,
            KnownSettingKey::ImportMaxRows,
            KnownSettingKey::ExamDefaultDuration,
        ]
    }

    /// 校验并规范化待写入的值
    pub fn normalize_value(&self, raw: &str) -> Result<String, String> {
        let value = raw.trim();
        match self.value_type() {
            SettingValueType::String => {
                if value.is_empty() || value.chars().count() > 100 {
                    return Err(format!(
                        "{} must be 1 to 100 characters long",
                        self.as_str()
                    ));
                }
                Ok(value.to_string())
            }
            SettingValueType::Integer => {
                let parsed: i64 = value
                    .parse()
                    .map_err(|_| format!("{} must be an integer", self.as_str()))?;
                if let Some((min, max)) = self.integer_range()
                    && !(min..=max).contains(&parsed)
                {
                    return Err(format!(
                        "{} must be between {min} and {max}",
                        self.as_str()
                    ));
                }
                Ok(parsed.to_string())
            }
        }
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::all()
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 已保存的租户配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSetting {
    pub tenant_id: i64,
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

/// 合并默认值后的配置项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingView {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: String,
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 业务代码使用的已解析配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub display_name: String,
    pub import_max_rows: i64,
    pub exam_default_duration_minutes: i32,
}

/// 未设置时的默认值
#[derive(Debug, Clone)]
pub struct SettingDefaults {
    pub display_name: String,
    pub import_max_rows: i64,
    pub exam_default_duration_minutes: i32,
}

impl SettingDefaults {
    fn value_of(&self, key: KnownSettingKey) -> String {
        match key {
            KnownSettingKey::TenantDisplayName => self.display_name.clone(),
            KnownSettingKey::ImportMaxRows => self.import_max_rows.to_string(),
            KnownSettingKey::ExamDefaultDuration => self.exam_default_duration_minutes.to_string(),
        }
    }
}

/// 以默认值补齐租户未设置的键
pub fn merge_with_defaults(stored: &[TenantSetting], defaults: &SettingDefaults) -> Vec<SettingView> {
    KnownSettingKey::all()
        .into_iter()
        .map(|key| {
            let saved = stored.iter().find(|s| s.key == key.as_str());
            SettingView {
                key: key.as_str().to_string(),
                value: saved
                    .map(|s| s.value.clone())
                    .unwrap_or_else(|| defaults.value_of(key)),
                value_type: key.value_type(),
                description: key.description().to_string(),
                is_default: saved.is_none(),
                updated_at: saved.map(|s| s.updated_at),
            }
        })
        .collect()
}

impl ResolvedSettings {
    /// 由合并后的配置项构造，解析失败的值回退到默认值
    pub fn resolve(stored: &[TenantSetting], defaults: &SettingDefaults) -> Self {
        let lookup = |key: KnownSettingKey| {
            stored
                .iter()
                .find(|s| s.key == key.as_str())
                .and_then(|s| key.normalize_value(&s.value).ok())
        };

        Self {
            display_name: lookup(KnownSettingKey::TenantDisplayName)
                .unwrap_or_else(|| defaults.display_name.clone()),
            import_max_rows: lookup(KnownSettingKey::ImportMaxRows)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.import_max_rows),
            exam_default_duration_minutes: lookup(KnownSettingKey::ExamDefaultDuration)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.exam_default_duration_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SettingDefaults {
        SettingDefaults {
            display_name: "Greenfield High".to_string(),
            import_max_rows: 1000,
            exam_default_duration_minutes: 60,
        }
    }

    fn stored(key: &str, value: &str) -> TenantSetting {
        TenantSetting {
            tenant_id: 1,
            key: key.to_string(),
            value: value.to_string(),
            value_type: SettingValueType::Integer,
            updated_at: Utc::now(),
            updated_by: Some(1),
        }
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(
            "import.max_rows".parse::<KnownSettingKey>(),
            Ok(KnownSettingKey::ImportMaxRows)
        );
        assert!("jwt.secret".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_normalize_integer_ranges() {
        let key = KnownSettingKey::ImportMaxRows;
        assert_eq!(key.normalize_value(" 250 "), Ok("250".to_string()));
        assert!(key.normalize_value("0").is_err());
        assert!(key.normalize_value("5001").is_err());
        assert!(key.normalize_value("many").is_err());

        let key = KnownSettingKey::ExamDefaultDuration;
        assert!(key.normalize_value("600").is_ok());
        assert!(key.normalize_value("601").is_err());
    }

    #[test]
    fn test_normalize_string() {
        let key = KnownSettingKey::TenantDisplayName;
        assert_eq!(key.normalize_value("  North Campus  "), Ok("North Campus".to_string()));
        assert!(key.normalize_value("   ").is_err());
    }

    #[test]
    fn test_merge_with_defaults() {
        let views = merge_with_defaults(&[stored("import.max_rows", "200")], &defaults());
        assert_eq!(views.len(), 3);
        let max_rows = views.iter().find(|v| v.key == "import.max_rows").unwrap();
        assert_eq!(max_rows.value, "200");
        assert!(!max_rows.is_default);
        let name = views.iter().find(|v| v.key == "tenant.display_name").unwrap();
        assert_eq!(name.value, "Greenfield High");
        assert!(name.is_default);
    }

    #[test]
    fn test_resolve_falls_back_on_bad_values() {
        let resolved = ResolvedSettings::resolve(
            &[
                stored("exams.default_duration_minutes", "90"),
                stored("import.max_rows", "not-a-number"),
            ],
            &defaults(),
        );
        assert_eq!(resolved.exam_default_duration_minutes, 90);
        assert_eq!(resolved.import_max_rows, 1000);
        assert_eq!(resolved.display_name, "Greenfield High");
    }
}
