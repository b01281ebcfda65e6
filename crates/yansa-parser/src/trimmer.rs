//! Iterative prefix/suffix stripping.

/// Strips configured literal strings from both ends of a value until
/// nothing more comes off.
///
/// ```
/// use yansa_parser::Trimmer;
///
/// let trimmer = Trimmer::new([" ", "-"]);
/// assert_eq!(trimmer.trim("- - -Title- - -"), "Title");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trimmer {
    strings: Vec<String>,
}

impl Trimmer {
    /// Empty strings are ignored.
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: strings
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Each pass strips every configured string once from the start, in list
    /// order, then once from the end. Passes repeat while anything changed.
    pub fn trim<'a>(&self, text: &'a str) -> &'a str {
        self.trim_offset(text).1
    }

    /// Like [`Trimmer::trim`], also returning how many bytes came off the
    /// front.
    pub fn trim_offset<'a>(&self, text: &'a str) -> (usize, &'a str) {
        let mut current = text;
        let mut offset = 0;
        let mut changed = true;
        while changed {
            changed = false;
            for s in &self.strings {
                if let Some(rest) = current.strip_prefix(s.as_str()) {
                    offset += s.len();
                    current = rest;
                    changed = true;
                }
            }
            for s in &self.strings {
                if let Some(rest) = current.strip_suffix(s.as_str()) {
                    current = rest;
                    changed = true;
                }
            }
        }
        (offset, current)
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmer() -> Trimmer {
        Trimmer::new([" ", "-", "_", ".", "()", "[]"])
    }

    #[test]
    fn test_nested_wrapping() {
        let t = trimmer();
        assert_eq!(t.trim("- Studio -"), "Studio");
        assert_eq!(t.trim("___Text___"), "Text");
        assert_eq!(t.trim("...Name..."), "Name");
        assert_eq!(t.trim(".- Combo -."), "Combo");
    }

    #[test]
    fn test_everything_trimmable() {
        let t = trimmer();
        assert_eq!(t.trim("()"), "");
        assert_eq!(t.trim("()[]"), "");
        assert_eq!(t.trim(""), "");
    }

    #[test]
    fn test_inner_text_untouched() {
        let t = trimmer();
        assert_eq!(t.trim("Normal"), "Normal");
        assert_eq!(t.trim("A - B"), "A - B");
    }

    #[test]
    fn test_empty_strings_ignored() {
        let t = Trimmer::new(["", "-"]);
        assert_eq!(t.trim("-a-"), "a");
        assert!(Trimmer::new([""; 2]).is_empty());
    }

    #[test]
    fn test_offset_counts_leading_strips() {
        let t = trimmer();
        assert_eq!(t.trim_offset(".- Combo -."), (3, "Combo"));
        assert_eq!(t.trim_offset("Name..."), (0, "Name"));
        assert_eq!(t.trim_offset("()"), (2, ""));
    }

    #[test]
    fn test_idempotent() {
        let t = trimmer();
        for s in ["- a -", "(x)", "_-_.b._-_", "[]a[]"] {
            let once = t.trim(s);
            assert_eq!(t.trim(once), once);
        }
    }
}
