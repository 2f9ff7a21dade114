use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

/// 转义 LIKE 模式中的通配符
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `column LIKE '%input%' ESCAPE '\'`，输入中的通配符按字面匹配
pub fn contains_literal<C: ColumnTrait>(column: C, input: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(input));
    Condition::all().add(column.like(LikeExpr::new(pattern).escape('\\')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("math"), "math");
        assert_eq!(escape_like_pattern("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
