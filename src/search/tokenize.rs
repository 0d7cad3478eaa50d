//! Label normalization and camel-case segmentation.

/// Normalizes text into its matching form: lower-cased, trimmed, with internal
/// whitespace runs collapsed to a single space.
///
/// Record search keys and queries both go through this function, so a query
/// typed exactly like a label always compares equal to that label's key.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

/// Extracts the lower-cased first letter of every name segment in a label.
///
/// Segments begin at:
/// - the first alphanumeric character after a separator: "All Classes" → "ac"
/// - a lowercase or digit → uppercase transition: "checkSize" → "cs"
/// - the last capital of an acronym followed by lowercase: "HTTPServer" → "hs"
///
/// Digits continue the current segment, so "Dct1d" is a single segment.
pub fn segment_initials(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    let mut initials = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            continue;
        }

        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        let starts_segment = match prev {
            None => true,
            Some(p) if !p.is_alphanumeric() => true,
            // camelCase boundary: "check" → "Size"
            Some(p) if c.is_uppercase() && (p.is_lowercase() || p.is_numeric()) => true,
            // end of an acronym run: "HTTP" → "Server"
            Some(p) if c.is_uppercase() && p.is_uppercase() => {
                next.is_some_and(char::is_lowercase)
            }
            Some(_) => false,
        };

        if starts_segment {
            initials.extend(c.to_lowercase());
        }
    }

    initials
}

/// Whether a normalized query may be matched against segment initials.
///
/// Only queries made entirely of alphanumeric characters qualify; a query with
/// spaces or punctuation can only ever match as a substring.
pub fn is_abbreviation_query(normalized: &str) -> bool {
    !normalized.is_empty() && normalized.chars().all(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("GradientCornerDetector", "gradientcornerdetector")]
    #[case("  All   Classes ", "all classes")]
    #[case("checkSize(double[], double[])", "checksize(double[], double[])")]
    #[case("\tTab\nSeparated", "tab separated")]
    #[case("", "")]
    #[case("   ", "")]
    fn test_normalize_text(#[case] input: &str, #[case] expected: &str) {
        check!(normalize_text(input) == expected);
    }

    #[rstest]
    #[case("GradientCornerDetector", "gcd")]
    #[case("Graph", "g")]
    #[case("All Classes", "ac")]
    #[case("checkSize(double[])", "csd")]
    #[case("HTTPServer", "hs")]
    #[case("DCT", "d")]
    #[case("Dct1dSlow", "ds")]
    #[case("Vec2D", "vd")]
    #[case("snake_case_name", "scn")]
    #[case("Dft1d.Double", "dd")]
    #[case("", "")]
    fn test_segment_initials(#[case] label: &str, #[case] expected: &str) {
        check!(segment_initials(label) == expected);
    }

    #[rstest]
    #[case("gcd", true)]
    #[case("g2d", true)]
    #[case("all classes", false)]
    #[case("check(", false)]
    #[case("", false)]
    fn test_is_abbreviation_query(#[case] query: &str, #[case] expected: bool) {
        check!(is_abbreviation_query(query) == expected);
    }

    #[rstest]
    #[case("Москва")]
    #[case("日本")]
    #[case("🦀")]
    fn test_unicode_handling(#[case] input: &str) {
        // Must not panic on non-ASCII labels
        let _ = segment_initials(input);
        let _ = normalize_text(input);
    }
}
