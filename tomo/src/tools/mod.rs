//! Built-in tool functions.
//!
//! Two pure tools back the function-call router: a clock lookup and a
//! restricted arithmetic evaluator. Neither touches the network or the
//! model; the router decides when they apply.

pub mod calculator;

use chrono::Local;

/// Timestamp format used by the clock tool.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which tool handled a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Current date and time lookup.
    Clock,
    /// Arithmetic expression evaluation.
    Calculator,
}

impl ToolKind {
    /// Tool name as reported in logs and invocation records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clock => "get_current_time",
            Self::Calculator => "calculator",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of a single tool call: which tool ran, with what arguments,
/// and what it produced. Ephemeral, one per matched query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// The tool that ran.
    pub tool: ToolKind,
    /// Extracted arguments (empty for the clock).
    pub arguments: String,
    /// Formatted result shown to the user.
    pub output: String,
}

impl ToolInvocation {
    /// Create an invocation record.
    #[must_use]
    pub fn new(tool: ToolKind, arguments: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool,
            arguments: arguments.into(),
            output: output.into(),
        }
    }
}

impl std::fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}() -> {}", self.tool, self.output)
        } else {
            write!(f, "{}({}) -> {}", self.tool, self.arguments, self.output)
        }
    }
}

/// Get the current date and time as a formatted string.
///
/// Format: `YYYY-MM-DD HH:MM:SS`, local time. No failure mode.
#[must_use]
pub fn current_time() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}
