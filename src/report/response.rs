use super::palette::Palette;

const DIVIDER_WIDTH: usize = 50;
const LARGE_BODY_BYTES: usize = 1_000;
const LARGE_BODY_PREVIEW: usize = 200;

/// Reason phrase shown next to a status code.
#[must_use]
pub const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        200..=299 => "Success",
        300..=399 => "Redirection",
        400..=499 => "Client Error",
        500..=u16::MAX => "Server Error",
        _ => "Unknown",
    }
}

/// Status, sorted headers and a formatted body between two dividers.
#[must_use]
pub fn format_response(
    status: u16,
    headers: &[(String, String)],
    body: &str,
    palette: Palette,
) -> String {
    let divider = palette.info(&"─".repeat(DIVIDER_WIDTH));
    let status_line = palette.by_status(status, &format!("Status: {} {}", status, status_text(status)));

    let mut sorted: Vec<&(String, String)> = headers.iter().collect();
    sorted.sort_by(|left, right| left.0.cmp(&right.0));
    let header_block = if sorted.is_empty() {
        String::new()
    } else {
        let lines: String = sorted
            .iter()
            .map(|(key, value)| format!("  {}: {}\n", key, value))
            .collect();
        format!("{}\n{}\n", palette.header("Headers:"), lines)
    };

    let body_block = if body.is_empty() {
        String::new()
    } else {
        let content_type = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
            .map_or("", |(_, value)| value.as_str());
        format!(
            "{}\n{}\n",
            palette.header("Body:"),
            format_body(body, content_type, palette)
        )
    };

    format!(
        "{}\n{}\n\n{}{}{}\n",
        divider, status_line, header_block, body_block, divider
    )
}

fn format_body(body: &str, content_type: &str, palette: Palette) -> String {
    if content_type.contains("application/json") {
        return serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| body.to_owned());
    }
    if content_type.contains("text/") || body.len() <= LARGE_BODY_BYTES {
        return body.to_owned();
    }
    let preview: String = body.chars().take(LARGE_BODY_PREVIEW).collect();
    format!(
        "{}\n{}",
        palette.warning(&format!(
            "[ Large body - {} bytes - showing first {} characters ]",
            body.len(),
            LARGE_BODY_PREVIEW
        )),
        preview
    )
}
