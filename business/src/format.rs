//! Display formatting leaves: token masking, scope joining, and relative
//! timestamps. Pure functions of their inputs; `now` is always a parameter so
//! tests can pin the clock.

use chrono::{DateTime, Utc};

/// Visible prefix length of a masked token.
const TOKEN_PREFIX_LEN: usize = 5;

/// Masks a token for display, keeping a short identifying prefix.
///
/// Tokens are opaque secrets; views that are allowed to show them still only
/// show enough to tell rows apart.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= TOKEN_PREFIX_LEN {
        return token.to_string();
    }
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{prefix}…")
}

/// Joins a scope list with ", " preserving the original order.
pub fn join_scopes(scopes: &[String]) -> String {
    scopes.join(", ")
}

/// Renders a timestamp relative to `now`.
///
/// `expiration` only changes how a missing value reads: an expiration that was
/// never set means the token does not expire.
pub fn format_timestamp(at: Option<DateTime<Utc>>, now: DateTime<Utc>, expiration: bool) -> String {
    let Some(at) = at else {
        return if expiration { "never".to_string() } else { String::new() };
    };

    let delta = at.signed_duration_since(now);
    let seconds = delta.num_seconds();
    if seconds >= 0 {
        format!("in {}", span(seconds))
    } else {
        format!("{} ago", span(-seconds))
    }
}

fn span(seconds: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    if seconds >= 2 * DAY {
        format!("{} days", seconds / DAY)
    } else if seconds >= 2 * HOUR {
        format!("{} hours", seconds / HOUR)
    } else if seconds >= 2 * MINUTE {
        format!("{} minutes", seconds / MINUTE)
    } else {
        format!("{seconds} seconds")
    }
}
