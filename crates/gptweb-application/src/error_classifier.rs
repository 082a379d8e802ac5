//! Maps remote failures to the text shown in the chat panel.

use gptweb_core::remote::RemoteError;

pub const BAD_REQUEST_MESSAGE: &str = "Your model and your settings may be incompatible or one of the request parameters is unknown. Reset your settings to default. (HTTP 400 Bad Request)";

pub const UNAUTHORIZED_MESSAGE: &str = "Make sure your API key is set and accurate. You can update it with the `Update settings` link. (HTTP 401 Unauthorized) Potential reasons: \r\n- 1. Invalid authentication\r\n- 2. Incorrect API key provided\r\n- 3. Incorrect organization provided\r\n See https://platform.openai.com/docs/guides/error-codes for more details.";

pub const FORBIDDEN_MESSAGE: &str =
    "Your token has expired. Please try authenticating again. (HTTP 403 Forbidden)";

pub const NOT_FOUND_MESSAGE: &str = "Your account and your model may be incompatible or you may have exhausted your subscription allowance. (HTTP 404 Not Found)";

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, try again later. (HTTP 429 Too Many Requests) Potential reasons: \r\n 1. You exceeded your current quota, please check your plan and billing details\r\n 2. You are sending requests too quickly\r\n 3. The engine is currently overloaded, please try again later\r\n See https://platform.openai.com/docs/guides/error-codes for more details.";

pub const SERVER_ERROR_MESSAGE: &str = "The server had an error while processing your request, please try again. (HTTP 500 Internal Server Error)\r\n See https://platform.openai.com/docs/guides/error-codes for more details.";

/// Separator placed between a classified message and the service's own message.
pub const REMOTE_MESSAGE_SEPARATOR: &str = "\n\n";

/// Produces the user-facing text for a failed completion.
///
/// Precedence: a reported status line (`"{status} {statusText}"`), then the
/// fixed message for a known status code, then the service's message, then
/// the error's generic description. A service message is appended to any
/// classified message.
pub fn classify_remote_error(error: &RemoteError) -> String {
    let remote_message = error
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty());

    match (classified_message(error), remote_message) {
        (Some(classified), Some(remote)) => {
            format!("{classified}{REMOTE_MESSAGE_SEPARATOR}{remote}")
        }
        (Some(classified), None) => classified,
        (None, Some(remote)) => remote.to_string(),
        (None, None) => error.describe(),
    }
}

fn classified_message(error: &RemoteError) -> Option<String> {
    if let Some(status_text) = &error.http_status_text {
        let status = error
            .http_status
            .map(|code| code.to_string())
            .unwrap_or_default();
        return Some(format!("{status} {status_text}").trim().to_string());
    }

    let fixed = match error.http_status? {
        400 => BAD_REQUEST_MESSAGE,
        401 => UNAUTHORIZED_MESSAGE,
        403 => FORBIDDEN_MESSAGE,
        404 => NOT_FOUND_MESSAGE,
        429 => RATE_LIMITED_MESSAGE,
        500 => SERVER_ERROR_MESSAGE,
        _ => return None,
    };
    Some(fixed.to_string())
}
