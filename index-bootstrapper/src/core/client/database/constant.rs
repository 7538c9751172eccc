/// Database used for server-level commands such as `ping`.
pub const ADMIN_DATABASE: &str = "admin";

/// Name the client reports to the server, visible in `currentOp` and server logs.
pub const APP_NAME: &str = "index-bootstrapper";

// Server error codes, see https://www.mongodb.com/docs/manual/reference/error-codes/
pub const UNAUTHORIZED_CODE: i32 = 13;
pub const AUTHENTICATION_FAILED_CODE: i32 = 18;
pub const NAMESPACE_NOT_FOUND_CODE: i32 = 26;
pub const NAMESPACE_EXISTS_CODE: i32 = 48;
pub const INDEX_OPTIONS_CONFLICT_CODE: i32 = 85;
pub const INDEX_KEY_SPECS_CONFLICT_CODE: i32 = 86;
