/// 转义 LIKE 模式中的通配符，使用户输入按字面匹配
///
/// PostgreSQL 与 MySQL 默认以 `\` 作为 LIKE 转义符。
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_like_pattern("Okafor"), "Okafor");
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("adm_01"), "adm\\_01");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
