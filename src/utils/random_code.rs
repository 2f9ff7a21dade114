use rand::Rng;
use rand::distr::Alphanumeric;

// 易混淆字符（0/O、1/I/L）不参与分享码
const SHARE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// 生成指定长度的字母数字随机串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成大写分享码，如 `QZ-7KQ2MX`
pub fn generate_share_code(prefix: &str, len: usize) -> String {
    let mut rng = rand::rng();
    let body: String = (0..len)
        .map(|_| SHARE_CODE_CHARSET[rng.random_range(0..SHARE_CODE_CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_length_and_charset() {
        let code = generate_random_code(16);
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_share_code_format() {
        let code = generate_share_code("HW", 6);
        assert!(code.starts_with("HW-"));
        assert_eq!(code.len(), 9);
        assert!(!code[3..].contains(['0', 'O', '1', 'I', 'L']));
    }
}
