use ratatui::style::Color;

/// Colors used by the pager
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Motion indicators
    pub scrolling: Color,
    pub gliding: Color,
    pub idle: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            scrolling: Color::Rgb(0xd8, 0xa6, 0x57),
            gliding: Color::Rgb(0x7d, 0xae, 0xa3),
            idle: Color::Rgb(0xa9, 0xb6, 0x65),
            accent: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}
