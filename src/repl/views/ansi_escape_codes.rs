//! ANSI escape code constants for response styling

// ============================================================================
// TEXT ATTRIBUTES
// ============================================================================

pub const RESET: &str = "\x1b[0m"; // Reset all attributes
pub const BOLD: &str = "\x1b[1m"; // Bold/bright text
pub const DIM: &str = "\x1b[2m"; // Dimmed/faint text

// ============================================================================
// FOREGROUND COLORS
// ============================================================================

pub const FG_CYAN: &str = "\x1b[36m";
pub const FG_MAGENTA: &str = "\x1b[35m";
pub const FG_BRIGHT_RED: &str = "\x1b[91m";
pub const FG_BRIGHT_GREEN: &str = "\x1b[92m";
pub const FG_BRIGHT_BLUE: &str = "\x1b[94m";

// ============================================================================
// BACKGROUND COLORS
// ============================================================================

pub const BG_BLACK: &str = "\x1b[40m";

// ============================================================================
// COMPOSITE STYLES
// ============================================================================

/// Status line of a 2xx outcome
pub const STYLE_SUCCESS: &str = "\x1b[1m\x1b[92m\x1b[40m"; // BOLD + FG_BRIGHT_GREEN + BG_BLACK
/// Status line of any other outcome
pub const STYLE_FAILURE: &str = "\x1b[1m\x1b[91m\x1b[40m"; // BOLD + FG_BRIGHT_RED + BG_BLACK

/// Element names in pretty-printed XML
pub const STYLE_ELEMENT: &str = FG_BRIGHT_BLUE;
/// Attribute names in pretty-printed XML
pub const STYLE_ATTRIBUTE: &str = FG_CYAN;
/// Attribute values in pretty-printed XML
pub const STYLE_VALUE: &str = FG_MAGENTA;
/// Comments, declarations and processing instructions
pub const STYLE_MARKUP: &str = DIM;
