//! Shared CLI constants.

/// Console session duration override, in minutes.
pub const DURATION_ENV: &str = "AWSCRED_DURATION";

/// Standard AWS SDK variables the console command reads credentials from.
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";

/// Login shell path used to pick a default shell.
pub const SHELL_ENV: &str = "SHELL";
