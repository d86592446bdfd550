/// Error code registry for the pipeline
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Input/output errors
/// - 4000-4999: Row parse errors (recovered per row, never fatal)
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Input/output errors (3000-3999)
    pub const IO_READ_FAILED: u16 = 3001;
    pub const IO_WRITE_FAILED: u16 = 3002;
    pub const IO_SERIALIZATION_FAILED: u16 = 3011;

    // Row parse errors (4000-4999)
    pub const PARSE_UNTERMINATED_QUOTE: u16 = 4001;
    pub const PARSE_MALFORMED_ROW: u16 = 4002;
    pub const PARSE_LINE_BREAK: u16 = 4003;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "General configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_INVALID_TOML => "Configuration file is not valid TOML",
        ErrorCode::CONFIG_MISSING_REQUIRED => "Required option missing",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",

        ErrorCode::IO_READ_FAILED => "Failed to read input",
        ErrorCode::IO_WRITE_FAILED => "Failed to write output",
        ErrorCode::IO_SERIALIZATION_FAILED => "Failed to serialize report",

        ErrorCode::PARSE_UNTERMINATED_QUOTE => "Quoted field is not terminated",
        ErrorCode::PARSE_MALFORMED_ROW => "Row could not be tokenized",
        ErrorCode::PARSE_LINE_BREAK => "Line break outside a quoted field",

        ErrorCode::OTHER_GENERIC => "General error",
        _ => "Unknown error code",
    }
}
