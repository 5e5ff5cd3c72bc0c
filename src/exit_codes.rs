//! Process exit codes for the jumplink binary.

/// Hints were printed or a navigation action was produced
pub const SUCCESS: i32 = 0;
/// The keystrokes cancelled the session or selected nothing
pub const NO_SELECTION: i32 = 1;
/// Bad input, configuration or I/O failure
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{NO_SELECTION, SUCCESS, TOOL_ERROR};

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn no_selection() -> ! {
        std::process::exit(NO_SELECTION);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
