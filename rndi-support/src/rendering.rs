//! Text rendering utilities for human-friendly error messages.
//!
//! Formats resolution chains, Rust type names and "did you mean?"
//! keyword suggestions for the container's error output.

/// Renders a resolution chain as a single line.
///
/// # Examples
/// ```
/// use rndi_support::rendering::render_chain;
///
/// let chain = vec!["Mailer", "transport", "Smtp", "transport"];
/// assert_eq!(render_chain(&chain), "Mailer → transport → Smtp → transport");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Strips module paths from a fully qualified type name.
///
/// Generic arguments keep their structure, only the path prefix of every
/// segment is dropped.
///
/// ```
/// use rndi_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("app::mail::Mailer"), "Mailer");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<app::config::Settings>"),
///     "Arc<Settings>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (idx, ch) in full_name.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            result.push_str(last_path_segment(&full_name[segment_start..idx]));
            result.push(ch);
            segment_start = idx + ch.len_utf8();
        }
    }

    result.push_str(last_path_segment(&full_name[segment_start..]));
    result
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Levenshtein distance between two strings, counted in chars.
///
/// ```
/// use rndi_support::rendering::edit_distance;
///
/// assert_eq!(edit_distance("greeting", "greting"), 1);
/// assert_eq!(edit_distance("", "abc"), 3);
/// ```
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Picks the registered keywords closest to `requested`.
///
/// A candidate qualifies when it contains (or is contained in) the
/// requested keyword, ignoring case, or when its edit distance is at most a
/// third of the requested length (minimum 1). Closest candidates come first.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let threshold = (requested_lower.chars().count() / 3).max(1);

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .copied()
        .filter(|candidate| *candidate != requested)
        .filter_map(|candidate| {
            let candidate_lower = candidate.to_lowercase();
            let distance = edit_distance(&requested_lower, &candidate_lower);

            let overlaps = !candidate_lower.is_empty()
                && !requested_lower.is_empty()
                && (candidate_lower.contains(&requested_lower)
                    || requested_lower.contains(&candidate_lower));

            (overlaps || distance <= threshold).then_some((distance, candidate))
        })
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}
