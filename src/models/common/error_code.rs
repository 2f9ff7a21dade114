/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证与用户；3xxx 班级；4xxx 测评；5xxx 提交。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    UserStudentCodeAlreadyExists = 2007,
    UserNotFound = 2008,

    ClassNotFound = 3000,
    ClassAlreadyExists = 3001,
    ClassInviteCodeInvalid = 3002,
    ClassAlreadyJoined = 3003,
    ClassPermissionDenied = 3004,
    ClassMemberNotFound = 3005,

    AssessmentNotFound = 4000,
    AssessmentInvalid = 4001,
    AssessmentLocked = 4002,

    SubmissionNotFound = 5000,
    SubmissionInvalid = 5001,
    SubmissionClosed = 5002,
    SubmissionAlreadyExists = 5003,
    SubmissionAlreadyReviewed = 5004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::AssessmentNotFound as i32, 4000);
        assert_eq!(ErrorCode::SubmissionAlreadyReviewed as i32, 5004);
    }
}
