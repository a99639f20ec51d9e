/// Formats a ticket counter value as the zero-padded display number.
///
/// Counters past 9999 keep their full width; numbers are never truncated.
pub fn format_ticket_number(count: u64) -> String {
    format!("{count:04}")
}

/// Normalizes a ticket channel name to the platform's lowercase slug rules.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims leading/trailing hyphens. An empty result falls back to
/// `ticket` so channel creation never submits a blank name.
pub fn slug_channel_name(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_hyphen = true;
    for ch in raw.chars() {
        let lowered = ch.to_ascii_lowercase();
        if lowered.is_ascii_alphanumeric() {
            slug.push(lowered);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        return "ticket".to_string();
    }
    slug
}
