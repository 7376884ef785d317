use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const PROCESS: Color = Color::TrueColor {
    r: 0xa5,
    g: 0xcf,
    b: 0x80,
};
pub const PORT: Color = Color::TrueColor {
    r: 0xed,
    g: 0xad,
    b: 0x56,
};
pub const CARRIER: Color = Color::Cyan;
