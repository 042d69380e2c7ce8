//! Access-restriction phrase detection.

/// Lowercase phrases that mark a text as a login or subscription gate.
pub const PAYWALL_INDICATORS: &[&str] = &[
    "login",
    "subscribe",
    "sign up",
    "premium",
    "members only",
    "end of free content",
    "to access this material",
    "please log in",
];

/// Returns true if the text contains any known access-restriction phrase, ignoring case.
///
/// # Example
///
/// ```rust
/// use referent_core::is_paywalled;
///
/// assert!(is_paywalled("Subscribe to keep reading"));
/// assert!(!is_paywalled("The river rose two metres overnight."));
/// ```
pub fn is_paywalled(text: &str) -> bool {
    let lower = text.to_lowercase();
    PAYWALL_INDICATORS.iter().any(|indicator| lower.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Please LOG IN to continue")]
    #[case("SUBSCRIBE now")]
    #[case("Sign Up for our newsletter")]
    #[case("This is a Premium story")]
    #[case("Members only area")]
    #[case("End of free content.")]
    #[case("To access this material, register")]
    #[case("Login required")]
    fn test_indicators_match_case_insensitively(#[case] text: &str) {
        assert!(is_paywalled(text));
    }

    #[rstest]
    #[case("")]
    #[case("An ordinary paragraph about the harvest.")]
    #[case("Sign-up sheets were posted at the library")]
    #[case("Log in later")]
    fn test_ordinary_text_is_not_flagged(#[case] text: &str) {
        assert!(!is_paywalled(text));
    }
}
