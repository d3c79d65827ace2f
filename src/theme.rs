use std::sync::OnceLock;

use ratatui::style::Color;
use serde::Deserialize;

use crate::git::types::FileStatus;

/// All semantic color slots for the hunkwatch UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,
    pub selection_inactive_bg: Color,

    // File list groups
    pub staged: Color,
    pub unstaged: Color,
    pub untracked: Color,

    // Diff
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_context_fg: Color,
    pub diff_hunk_header_fg: Color,
    pub line_number_fg: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,

    // Syntax highlighting
    pub syntax: SyntaxColors,
}

/// Syntax highlighting color slots.
#[derive(Debug, Clone)]
pub struct SyntaxColors {
    pub comment: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub type_name: Color,
    pub variable: Color,
    pub operator: Color,
    pub property: Color,
    pub tag: Color,
    pub punctuation: Color,
    pub default_fg: Color,
}

pub const THEME_NAMES: &[&str] = &["one-dark", "dracula", "github-dark"];

static CURRENT: OnceLock<Theme> = OnceLock::new();

/// Install the process-wide theme. Only the first call has an effect.
pub fn init(theme: Theme) {
    if CURRENT.set(theme).is_err() {
        tracing::debug!("theme already initialised");
    }
}

/// The installed theme, or the default one if `init` never ran.
pub fn current() -> &'static Theme {
    CURRENT.get_or_init(|| Theme::from_name(THEME_NAMES[0]))
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "dracula" => dracula(),
            "github-dark" => github_dark(),
            _ => one_dark(),
        }
    }

    /// Badge color for a file status in the list.
    pub fn status_color(&self, status: FileStatus) -> Color {
        match status {
            FileStatus::Added | FileStatus::Untracked => self.success,
            FileStatus::Deleted | FileStatus::Unmerged => self.error,
            FileStatus::Renamed | FileStatus::Copied => self.accent,
            FileStatus::Modified | FileStatus::TypeChanged => self.warning,
        }
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Serde-compatible override struct ──────────────────────────────

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub border: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub selection_bg: Option<String>,
    pub selection_inactive_bg: Option<String>,
    pub staged: Option<String>,
    pub unstaged: Option<String>,
    pub untracked: Option<String>,
    pub diff_add_bg: Option<String>,
    pub diff_del_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_context_fg: Option<String>,
    pub diff_hunk_header_fg: Option<String>,
    pub line_number_fg: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    #[serde(default)]
    pub syntax: Option<SyntaxOverrides>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct SyntaxOverrides {
    pub comment: Option<String>,
    pub keyword: Option<String>,
    pub string: Option<String>,
    pub number: Option<String>,
    pub function: Option<String>,
    pub type_name: Option<String>,
    pub variable: Option<String>,
    pub operator: Option<String>,
    pub property: Option<String>,
    pub tag: Option<String>,
    pub punctuation: Option<String>,
    pub default_fg: Option<String>,
}

pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) {
    macro_rules! apply {
        ($target:expr, $source:expr, $($field:ident),+ $(,)?) => {
            $(
                if let Some(ref hex) = $source.$field {
                    match parse_hex_color(hex) {
                        Some(c) => $target.$field = c,
                        None => tracing::warn!(
                            slot = stringify!($field),
                            "ignoring invalid color {hex:?}"
                        ),
                    }
                }
            )+
        };
    }

    apply!(
        theme,
        overrides,
        accent,
        border,
        text,
        text_muted,
        surface,
        selection_bg,
        selection_inactive_bg,
        staged,
        unstaged,
        untracked,
        diff_add_bg,
        diff_del_bg,
        diff_add_fg,
        diff_del_fg,
        diff_context_fg,
        diff_hunk_header_fg,
        line_number_fg,
        success,
        error,
        warning,
    );

    if let Some(ref syn) = overrides.syntax {
        apply!(
            theme.syntax,
            syn,
            comment,
            keyword,
            string,
            number,
            function,
            type_name,
            variable,
            operator,
            property,
            tag,
            punctuation,
            default_fg,
        );
    }
}

// ── Built-in themes ──────────────────────────────────────────────

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: Color::Cyan,
        border: Color::Rgb(62, 68, 81),
        text: Color::White,
        text_muted: Color::DarkGray,
        surface: Color::Rgb(30, 30, 30),
        selection_bg: Color::Rgb(40, 40, 50),
        selection_inactive_bg: Color::Rgb(35, 35, 45),
        staged: Color::Rgb(198, 120, 221),
        unstaged: Color::Rgb(97, 175, 239),
        untracked: Color::Rgb(152, 195, 121),
        diff_add_bg: Color::Rgb(0, 30, 0),
        diff_del_bg: Color::Rgb(40, 0, 0),
        diff_add_fg: Color::Green,
        diff_del_fg: Color::Red,
        diff_context_fg: Color::Rgb(171, 178, 191),
        diff_hunk_header_fg: Color::Magenta,
        line_number_fg: Color::Rgb(92, 99, 112),
        success: Color::Green,
        error: Color::Red,
        warning: Color::Yellow,
        syntax: SyntaxColors {
            comment: Color::Rgb(106, 115, 125),
            keyword: Color::Rgb(198, 120, 221),
            string: Color::Rgb(152, 195, 121),
            number: Color::Rgb(209, 154, 102),
            function: Color::Rgb(97, 175, 239),
            type_name: Color::Rgb(229, 192, 123),
            variable: Color::Rgb(171, 178, 191),
            operator: Color::Rgb(86, 182, 194),
            property: Color::Rgb(224, 108, 117),
            tag: Color::Rgb(224, 108, 117),
            punctuation: Color::Rgb(140, 140, 140),
            default_fg: Color::Rgb(171, 178, 191),
        },
    }
}

fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        accent: Color::Rgb(189, 147, 249),
        border: Color::Rgb(68, 71, 90),
        text: Color::Rgb(248, 248, 242),
        text_muted: Color::Rgb(98, 114, 164),
        surface: Color::Rgb(30, 31, 41),
        selection_bg: Color::Rgb(68, 71, 90),
        selection_inactive_bg: Color::Rgb(55, 58, 75),
        staged: Color::Rgb(255, 121, 198),
        unstaged: Color::Rgb(139, 233, 253),
        untracked: Color::Rgb(80, 250, 123),
        diff_add_bg: Color::Rgb(27, 75, 27),
        diff_del_bg: Color::Rgb(75, 24, 24),
        diff_add_fg: Color::Rgb(105, 255, 148),
        diff_del_fg: Color::Rgb(255, 107, 107),
        diff_context_fg: Color::Rgb(248, 248, 242),
        diff_hunk_header_fg: Color::Rgb(0, 215, 255),
        line_number_fg: Color::Rgb(98, 114, 164),
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(241, 250, 140),
        syntax: SyntaxColors {
            comment: Color::Rgb(98, 114, 164),
            keyword: Color::Rgb(255, 121, 198),
            string: Color::Rgb(241, 250, 140),
            number: Color::Rgb(189, 147, 249),
            function: Color::Rgb(80, 250, 123),
            type_name: Color::Rgb(139, 233, 253),
            variable: Color::Rgb(248, 248, 242),
            operator: Color::Rgb(255, 121, 198),
            property: Color::Rgb(189, 147, 249),
            tag: Color::Rgb(255, 121, 198),
            punctuation: Color::Rgb(248, 248, 242),
            default_fg: Color::Rgb(248, 248, 242),
        },
    }
}

fn github_dark() -> Theme {
    Theme {
        name: "github-dark".to_string(),
        accent: Color::Rgb(88, 166, 255),
        border: Color::Rgb(48, 54, 61),
        text: Color::Rgb(230, 237, 243),
        text_muted: Color::Rgb(125, 133, 144),
        surface: Color::Rgb(22, 27, 34),
        selection_bg: Color::Rgb(38, 50, 72),
        selection_inactive_bg: Color::Rgb(30, 40, 58),
        staged: Color::Rgb(188, 140, 255),
        unstaged: Color::Rgb(88, 166, 255),
        untracked: Color::Rgb(63, 185, 80),
        diff_add_bg: Color::Rgb(18, 40, 24),
        diff_del_bg: Color::Rgb(50, 18, 18),
        diff_add_fg: Color::Rgb(63, 185, 80),
        diff_del_fg: Color::Rgb(248, 81, 73),
        diff_context_fg: Color::Rgb(230, 237, 243),
        diff_hunk_header_fg: Color::Rgb(188, 140, 255),
        line_number_fg: Color::Rgb(110, 118, 129),
        success: Color::Rgb(63, 185, 80),
        error: Color::Rgb(248, 81, 73),
        warning: Color::Rgb(210, 153, 34),
        syntax: SyntaxColors {
            comment: Color::Rgb(125, 133, 144),
            keyword: Color::Rgb(255, 123, 114),
            string: Color::Rgb(165, 214, 255),
            number: Color::Rgb(121, 192, 255),
            function: Color::Rgb(210, 168, 255),
            type_name: Color::Rgb(255, 166, 87),
            variable: Color::Rgb(230, 237, 243),
            operator: Color::Rgb(255, 123, 114),
            property: Color::Rgb(121, 192, 255),
            tag: Color::Rgb(126, 231, 135),
            punctuation: Color::Rgb(125, 133, 144),
            default_fg: Color::Rgb(230, 237, 243),
        },
    }
}
