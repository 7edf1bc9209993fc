//! Internal constants for Mermaid rendering.

use std::time::Duration;

/// Default Mermaid CLI executable.
pub const DEFAULT_PROGRAM: &str = "mmdc";

/// Default device scale factor (3x for print-quality PNGs).
pub const DEFAULT_SCALE: u32 = 3;

/// Default page width in pixels.
pub const DEFAULT_WIDTH: u32 = 2400;

/// Default background colour (transparent PNGs).
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Default timeout for rendering one diagram (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the `--version` availability probe (5 seconds).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
