use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::assessments::{
    entities::{Difficulty, Question},
    requests::QuestionInput,
};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static STUDENT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{2,32}$").expect("Invalid student code regex"));

pub const MAX_NAME_LEN: usize = 128;
pub const MAX_QUESTIONS: usize = 200;
pub const MAX_OPTIONS: usize = 10;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_student_code(code: &str) -> Result<(), &'static str> {
    if !STUDENT_CODE_RE.is_match(code) {
        return Err("Student code must be 2-32 letters, digits or hyphens");
    }
    Ok(())
}

/// 验证密码是否符合安全策略：至少 8 位，包含大小写字母和数字，不能是常见弱密码
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.len() < 8 {
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

    const WEAK: [&str; 6] = [
        "password1",
        "qwerty123",
        "abcd1234",
        "welcome1",
        "school123",
        "student1",
    ];
    if WEAK.iter().any(|weak| password.eq_ignore_ascii_case(weak)) {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// 非空且不超过长度上限的名称，返回去除首尾空白后的值
pub fn validate_name(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("{field} must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(trimmed.to_string())
}

/// 校验题目并按顺序编号（从 1 开始）
pub fn validate_questions(inputs: &[QuestionInput]) -> Result<Vec<Question>, String> {
    if inputs.is_empty() {
        return Err("At least one question is required".to_string());
    }
    if inputs.len() > MAX_QUESTIONS {
        return Err(format!("At most {MAX_QUESTIONS} questions are allowed"));
    }

    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let number = idx as i32 + 1;
            let text = input.text.trim();
            if text.is_empty() {
                return Err(format!("Question {number}: text must not be empty"));
            }
            if input.options.len() < 2 || input.options.len() > MAX_OPTIONS {
                return Err(format!(
                    "Question {number}: must have between 2 and {MAX_OPTIONS} options"
                ));
            }
            if input.options.iter().any(|o| o.trim().is_empty()) {
                return Err(format!("Question {number}: options must not be empty"));
            }
            if input.correct_option < 0 || input.correct_option as usize >= input.options.len() {
                return Err(format!(
                    "Question {number}: correct option {} is out of range",
                    input.correct_option
                ));
            }

            Ok(Question {
                number,
                text: text.to_string(),
                options: input.options.iter().map(|o| o.trim().to_string()).collect(),
                correct_option: input.correct_option,
                difficulty: input.difficulty.unwrap_or(Difficulty::Medium),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(options: &[&str], correct: i32) -> QuestionInput {
        QuestionInput {
            text: " 2 + 2 = ? ".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: correct,
            difficulty: None,
        }
    }

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_email("alice@school.edu").is_ok());
        assert!(validate_email("alice@school").is_err());
    }

    #[test]
    fn test_student_code() {
        assert!(validate_student_code("2026-0042").is_ok());
        assert!(validate_student_code("x").is_err());
        assert!(validate_student_code("bad code").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());
        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
        assert!(validate_password("Student1").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Quiz 1 ").unwrap(), "Quiz 1");
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_questions_numbered_from_one() {
        let questions =
            validate_questions(&[input(&["3", "4"], 1), input(&["a", "b", "c"], 0)]).unwrap();
        assert_eq!(questions[0].number, 1);
        assert_eq!(questions[1].number, 2);
        assert_eq!(questions[0].text, "2 + 2 = ?");
        assert_eq!(questions[0].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_questions_rejected() {
        assert!(validate_questions(&[]).is_err());
        assert!(validate_questions(&[input(&["only"], 0)]).is_err());
        assert!(validate_questions(&[input(&["a", "b"], 2)]).is_err());
        assert!(validate_questions(&[input(&["a", " "], 0)]).is_err());
    }
}
