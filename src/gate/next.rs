/// Accepts only same-origin relative targets: one leading `/`, never `//`.
///
/// Backslashes and control characters are refused as well since browsers
/// fold `/\host` into `//host`.
pub fn is_safe_next(candidate: &str) -> bool {
    candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control)
}
