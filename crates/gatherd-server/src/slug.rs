/// Derive a URL-safe slug from a display name.
///
/// Lowercases, collapses runs of whitespace and punctuation into single
/// hyphens, and strips leading/trailing hyphens. Deterministic: the same
/// name always yields the same slug, which is what scoped uniqueness checks
/// rely on.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
