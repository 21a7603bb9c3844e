use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// WUBRG order, matching `Theme::mana`
const MANA_CODES: [char; 5] = ['W', 'U', 'B', 'R', 'G'];

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    /// One style per color code, in WUBRG order
    pub mana: [Style; 5],
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            mana: [
                Style::new().bright_white().bold(),
                Style::new().blue().bold(),
                Style::new().bright_black().bold(),
                Style::new().red().bold(),
                Style::new().green().bold(),
            ],
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            mana: std::array::from_fn(|_| Style::new()),
        }
    }

    /// Style for a single color code; codes outside WUBRG are muted
    pub fn color_code(&self, code: char) -> Style {
        let code = code.to_ascii_uppercase();
        MANA_CODES
            .iter()
            .position(|c| *c == code)
            .map(|i| self.mana[i].clone())
            .unwrap_or_else(|| self.muted.clone())
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
