//! Identifier conversions: snake_case for storage names, slugs for URLs.

/// Convert an identifier from CamelCase / camelCase to snake_case.
/// e.g. "AuthorId" -> "author_id", "HTTPRequest" -> "http_request"
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None => false,
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) => p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()),
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// ASCII-safe URL slug: lowercase alphanumerics separated by single hyphens.
/// Non-ASCII characters are dropped; any other ASCII character separates words.
/// e.g. "Blog Posts!" -> "blog-posts", "Café au lait" -> "caf-au-lait"
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii() {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_words_and_acronyms() {
        assert_eq!(to_snake_case("AuthorId"), "author_id");
        assert_eq!(to_snake_case("authorId"), "author_id");
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("Version2Name"), "version2_name");
    }

    #[test]
    fn slugify_is_lowercase_hyphenated() {
        assert_eq!(slugify("BlogPost"), "blogpost");
        assert_eq!(slugify("Blog Posts!"), "blog-posts");
        assert_eq!(slugify("  --Edge__case--  "), "edge-case");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("Order Items"), slugify("Order Items"));
    }
}
