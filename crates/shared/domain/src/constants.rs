//! Deploy-time constants. Every value here is the default of a configuration key.

/// `OpenAPI` tag for infrastructure endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the registration form endpoints.
pub const REGISTRATION_TAG: &str = "Registration";

/// Korea Standard Time, UTC+9, in minutes.
pub const KST_OFFSET_MINUTES: i32 = 9 * 60;

/// Spreadsheet-backed registration endpoint (Google Apps Script web app).
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbwCPyjV8cUAvopipzo9B2L-fU5zh2EwmUQ2nApPyurw8zQns5hT5_NeCbBWQW_8RDEITg/exec";

/// Text of the exception the endpoint raises while its sheet has no data rows yet.
pub const DEFAULT_EMPTY_DATASET_MARKER: &str = "The number of rows in the range must be at least 1";

/// Shared administrator password.
///
/// This is a static secret shipped with the binary. Override it with `VREG__ADMIN__SECRET`
/// or the `admin.secret` key in any real deployment.
pub const DEFAULT_ADMIN_SECRET: &str = "admin1234";

/// Registration rules shown next to the operating windows while the form is closed.
pub const DEFAULT_POLICY_NOTICE: &str =
    "오전/오후 각 1회만 등록할 수 있습니다. 중복 등록은 불가하며, 시간 연장은 되지 않습니다.";

/// Remote timestamp format (civil time, microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
