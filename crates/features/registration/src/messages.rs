//! User-facing texts of the registration form.

pub const FILL_ALL_FIELDS: &str = "모든 필드를 채워주세요.";
pub const SAVED: &str = "정보가 성공적으로 저장되었습니다! 🎉";
pub const SAVE_FAILED: &str = "저장에 실패했습니다. 다시 시도해주세요.";
pub const REMOTE_FAILED: &str = "서버와 통신하지 못했습니다. 잠시 후 다시 시도해주세요.";
pub const ALREADY_REGISTERED: &str = "이미 등록된 차량 번호입니다.";
pub const ALREADY_SUBMITTED: &str = "이미 제출되었습니다. 다시 제출하려면 새로고침해주세요.";
pub const IN_PROGRESS: &str = "등록을 처리하고 있습니다. 잠시만 기다려주세요.";

pub const PLATE_FORMAT: &str =
    "차량 번호 형식이 올바르지 않습니다. 예: 12가3456 또는 123가4567";
pub const PLATE_LENGTH: &str = "차량 번호는 공백을 제외하고 7자 또는 8자여야 합니다.";

pub const CLOSED: &str = "지금은 등록 가능 시간이 아닙니다.";
pub const OPEN_HOURS: &str = "등록 가능 시간";

pub const ADMIN_ON: &str = "관리자 모드가 활성화되었습니다.";
pub const ADMIN_OFF: &str = "관리자 모드가 해제되었습니다.";
pub const ADMIN_WRONG_PASSWORD: &str = "비밀번호가 올바르지 않습니다.";

pub const SESSION_EXPIRED: &str = "세션이 만료되었습니다. 새로고침해주세요.";

/// Confirmation line announcing the free parking grant.
#[must_use]
pub fn free_hours(hours: u32) -> String {
    format!("무료 주차 {hours}시간이 적용됩니다.")
}
