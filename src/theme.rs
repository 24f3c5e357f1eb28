use ratatui::style::Color;
use std::hash::{DefaultHasher, Hash, Hasher};

const MINT: Color = Color::Rgb(0x8e, 0xe8, 0xcf);
const YELLOW: Color = Color::Rgb(0xff, 0xea, 0x85);
const LAVENDER: Color = Color::Rgb(0xc3, 0xb1, 0xe1);
const PERIWINKLE: Color = Color::Rgb(0x8f, 0xa8, 0xff);
const LIGHT_BLUE: Color = Color::Rgb(0xa5, 0xd8, 0xff);
const PEACH: Color = Color::Rgb(0xff, 0xc0, 0x9f);

const PALETTE: [Color; 6] = [MINT, YELLOW, LAVENDER, PERIWINKLE, LIGHT_BLUE, PEACH];

/// Card tint for a company. Known companies have fixed colors; anything
/// else hashes into the palette so the same name always gets the same tint.
pub fn company_color(company: &str) -> Color {
    match company {
        "Google" => PEACH,
        "GitHub" => YELLOW,
        "LinkedIn" => LAVENDER,
        "Amazon" => PERIWINKLE,
        "Microsoft" => LIGHT_BLUE,
        "Tesla" => MINT,
        other => {
            let mut hasher = DefaultHasher::new();
            other.hash(&mut hasher);
            PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_companies_have_fixed_colors() {
        assert_eq!(company_color("Google"), PEACH);
        assert_eq!(company_color("Tesla"), MINT);
        assert_eq!(company_color("GitHub"), YELLOW);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(company_color("ACME"), company_color("ACME"));
        assert!(PALETTE.contains(&company_color("ACME")));
        assert!(PALETTE.contains(&company_color("Initech")));
    }
}
