/// Remove the indentation shared by every non-blank line of `text`.
///
/// Blank lines at both ends are dropped first. Inner blank lines do not
/// constrain the common indent; they lose whatever leading characters fit.
/// Indentation is measured in characters, so a tab counts as one.
///
/// ```
/// use htmlsplit::html::dedent;
///
/// assert_eq!(dedent("\n    a {\n      color: red;\n    }\n  "), "a {\n  color: red;\n}");
/// ```
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(first) = lines.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    // A non-blank line exists, so rposition finds one too.
    let last = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(first);
    let relevant = &lines[first..=last];

    let min_indent = relevant
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    if min_indent == 0 {
        return relevant.join("\n");
    }

    relevant
        .iter()
        .map(|l| skip_chars(l, min_indent))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn skip_chars(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_common_indent() {
        assert_eq!(dedent("  a\n    b\n  c"), "a\n  b\nc");
    }

    #[test]
    fn trims_blank_edge_lines() {
        assert_eq!(dedent("\n\n   \n    x = 1;\n  \t\n"), "x = 1;");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(dedent(""), "");
        assert_eq!(dedent("   "), "");
        assert_eq!(dedent("\n \n\t\n"), "");
    }

    #[test]
    fn unindented_text_is_unchanged() {
        assert_eq!(dedent("a\n  b\n\nc"), "a\n  b\n\nc");
    }

    #[test]
    fn inner_blank_lines_do_not_limit_indent() {
        assert_eq!(dedent("    a\n\n    b"), "a\n\nb");
        // A short whitespace-only line loses everything it has.
        assert_eq!(dedent("    a\n  \n    b"), "a\n\nb");
        // A long one keeps its surplus.
        assert_eq!(dedent("  a\n      \n  b"), "a\n    \nb");
    }

    #[test]
    fn tabs_count_as_single_characters() {
        assert_eq!(dedent("\t\tfoo();\n\t\t\tbar();"), "foo();\n\tbar();");
    }

    #[test]
    fn multibyte_content_is_preserved() {
        assert_eq!(dedent("  ünï\n   cödé"), "ünï\n cödé");
    }

    proptest! {
        #[test]
        fn dedent_is_idempotent(text in "[ \ta-z{};\n]{0,80}") {
            let once = dedent(&text);
            prop_assert_eq!(dedent(&once), once.clone());
        }

        #[test]
        fn result_has_no_blank_edges(text in "[ \tab\n]{0,60}") {
            let out = dedent(&text);
            if let Some(first) = out.split('\n').next() {
                prop_assert!(out.is_empty() || !first.trim().is_empty());
            }
            if let Some(last) = out.split('\n').last() {
                prop_assert!(out.is_empty() || !last.trim().is_empty());
            }
        }
    }
}
