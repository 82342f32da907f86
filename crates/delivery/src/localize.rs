//! Localized welcome message rendering.
//!
//! The locale is an explicit parameter threaded from the user record, never
//! process-global state, so concurrent deliveries for different users cannot
//! race on it.

const WELCOME_EN: &str =
    "All set, welcome to Herald 🙌!\nYou will soon receive your notifications right here!";
const WELCOME_FR: &str =
    "C'est parti, bienvenue sur Herald 🙌 !\nVous recevrez bientôt vos notifications ici !";

/// Render the welcome direct message for a locale code.
///
/// Matches on the primary language subtag (`fr-CA` renders French). Total
/// over all inputs: unknown locales fall back to English.
pub fn welcome_text(locale: &str) -> &'static str {
    let language = locale.split(['-', '_']).next().unwrap_or_default();
    match language {
        "fr" => WELCOME_FR,
        _ => WELCOME_EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_locale() {
        assert_eq!(welcome_text("en"), WELCOME_EN);
    }

    #[test]
    fn test_french_locale() {
        assert_eq!(welcome_text("fr"), WELCOME_FR);
    }

    #[test]
    fn test_regional_variants_match_primary_subtag() {
        assert_eq!(welcome_text("fr-CA"), WELCOME_FR);
        assert_eq!(welcome_text("fr_FR"), WELCOME_FR);
        assert_eq!(welcome_text("en-GB"), WELCOME_EN);
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(welcome_text("de"), WELCOME_EN);
        assert_eq!(welcome_text(""), WELCOME_EN);
    }
}
