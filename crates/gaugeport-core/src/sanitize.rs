//! Identifier rewriting for the exposition grammar.

/// Replace every `/`, `-` and `.` in `name` with `_`.
///
/// Applied to metric names and parsed label keys. Total and idempotent.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '-' | '.' => '_',
            other => other,
        })
        .collect()
}
