//! Function-call router.
//!
//! Inspects a user query and decides whether one of the built-in tools
//! applies. Matching is keyword/pattern based, not model based: the word
//! "time" (or "clock") selects the clock tool, and an arithmetic run such
//! as `15 * 7 + 23` selects the calculator. The clock intent is checked
//! first, so a clock query is never routed to the calculator.
//!
//! Routing outcomes are values, not exceptions:
//!
//! - `Ok(None)`: no tool applies; the caller falls back.
//! - `Ok(Some(invocation))`: a tool ran; display its output.
//! - `Err(_)`: a tool matched but failed (bad expression); recoverable,
//!   the caller falls back to plain generation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{RouterError, RouterResult};
use crate::tools::{self, ToolInvocation, ToolKind, calculator};

static CLOCK_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:time|clock)\b").expect("clock intent pattern"));

static CALC_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:calculate|compute)\b").expect("calc keyword pattern"));

static EXPR_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9 .()+\-*/]+").expect("expression candidate pattern"));

/// Keyword-based dispatcher over the built-in tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolRouter;

impl ToolRouter {
    /// Create a new router.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Route a query to a tool, if one applies.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] when a tool intent matched but the argument
    /// could not be extracted or evaluated. Callers treat this as "fall
    /// back", not as a fatal failure.
    pub fn route(&self, query: &str) -> RouterResult<Option<ToolInvocation>> {
        if CLOCK_INTENT.is_match(query) {
            debug!(query, "matched clock intent");
            let timestamp = tools::current_time();
            let reply = format!("The current time is {timestamp}.");
            return Ok(Some(ToolInvocation::new(ToolKind::Clock, "", reply)));
        }

        if let Some(expression) = extract_expression(query) {
            debug!(query, expression = %expression, "matched calculator intent");
            let value = calculator::evaluate(&expression)?;
            return Ok(Some(ToolInvocation::new(
                ToolKind::Calculator,
                expression,
                value.to_string(),
            )));
        }

        if CALC_KEYWORD.is_match(query) {
            debug!(query, "calculator keyword without an expression");
            return Err(RouterError::NoExpression);
        }

        Ok(None)
    }
}

/// Pull the first arithmetic run out of a query.
///
/// A run qualifies only if it contains at least one digit and at least one
/// operator; bare numbers ("I have 3 apples") are not calculations.
fn extract_expression(query: &str) -> Option<String> {
    for candidate in EXPR_CANDIDATE.find_iter(query) {
        let run = candidate.as_str().trim();
        let has_digit = run.bytes().any(|b| b.is_ascii_digit());
        let has_operator = run.bytes().any(|b| matches!(b, b'+' | b'-' | b'*' | b'/'));
        if has_digit && has_operator {
            return Some(run.to_string());
        }
    }
    None
}
