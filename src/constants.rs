//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Program identity shown by `-v` and `-h`
pub mod program {
    pub const NAME: &str = "xwifibar";

    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub const AUTHOR: &str = "John Chapin <john.chapin@gmail.com>";

    /// Class/instance pair written to WM_CLASS on every window we create
    pub const WM_CLASS: &[u8] = b"xwifibar\0xwifibar\0";
}

/// X11 protocol constants
pub mod x11 {
    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;

    /// Core font used for the tooltip text
    pub const TOOLTIP_FONT: &[u8] = b"fixed";

    /// Client message atom carrying a poll tick into the event queue
    pub const TICK_ATOM: &[u8] = b"_XWIFIBAR_TICK";

    /// Client message atom asking the event loop to shut down
    pub const SHUTDOWN_ATOM: &[u8] = b"_XWIFIBAR_SHUTDOWN";
}

/// Kernel wireless statistics
pub mod wireless {
    /// Tabular per-interface wireless statistics
    pub const PROC_PATH: &str = "/proc/net/wireless";

    /// Header lines preceding the per-interface rows
    pub const HEADER_LINES: usize = 2;

    /// Top of the driver's link quality scale
    pub const LINK_QUALITY_MAX: u8 = 92;
}

/// Built-in defaults
pub mod defaults {
    pub const INTERFACE: &str = "eth1";

    pub const BAR_WIDTH: u16 = 2;

    pub const POLL_INTERVAL_SECS: u64 = 1;
}

/// Fixed color names for the two bar segments
pub mod colors {
    pub const ON: &str = "green";

    pub const OFF: &str = "red";
}

/// Environment variable names
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    pub const WIRELESS_PATH: &str = "XWIFIBAR_WIRELESS_PATH";
}

/// Tooltip box metrics
pub mod tooltip {
    /// Horizontal padding between border and text
    pub const MARGIN_X: i16 = 10;

    /// Vertical padding between border and text
    pub const MARGIN_Y: i16 = 5;

    pub const BORDER_WIDTH: u16 = 2;
}
