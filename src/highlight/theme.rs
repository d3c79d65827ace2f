use ratatui::style::{Modifier, Style};

use crate::theme::SyntaxColors;

/// Capture names handed to every grammar. A highlight id returned by
/// tree-sitter indexes into this list.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "escape",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "label",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Foreground style for a highlight id under the given syntax palette.
pub fn style_for_highlight(idx: usize, colors: &SyntaxColors) -> Style {
    let name = HIGHLIGHT_NAMES.get(idx).copied().unwrap_or("");
    let fg = match name.split('.').next().unwrap_or("") {
        "comment" => colors.comment,
        "keyword" => {
            return Style::default()
                .fg(colors.keyword)
                .add_modifier(Modifier::BOLD)
        }
        "string" | "escape" => colors.string,
        "number" | "constant" | "attribute" => colors.number,
        "function" => colors.function,
        "type" | "constructor" => colors.type_name,
        "variable" => colors.variable,
        "operator" => colors.operator,
        "property" | "label" => colors.property,
        "tag" => colors.tag,
        "punctuation" => colors.punctuation,
        _ => colors.default_fg,
    };
    Style::default().fg(fg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_dotted_names_use_parent_slot() {
        let theme = Theme::from_name("dracula");
        let idx = |n: &str| HIGHLIGHT_NAMES.iter().position(|h| *h == n).unwrap();

        assert_eq!(
            style_for_highlight(idx("function.method"), &theme.syntax).fg,
            Some(theme.syntax.function)
        );
        assert_eq!(
            style_for_highlight(idx("punctuation.bracket"), &theme.syntax).fg,
            Some(theme.syntax.punctuation)
        );
        assert!(style_for_highlight(idx("keyword"), &theme.syntax)
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(
            style_for_highlight(999, &theme.syntax).fg,
            Some(theme.syntax.default_fg)
        );
    }
}
