use crate::i18n::Language;

/// All localized user-facing strings for a language.
///
/// Placeholders are written as `{name}` and filled with [`fill`].
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Success Messages ====================
    /// Placeholders: {email}, {activity}
    pub signed_up: &'static str,

    /// Placeholders: {email}, {activity}
    pub unregistered: &'static str,

    // ==================== Business Rejections ====================
    pub activity_not_found: &'static str,

    pub already_registered: &'static str,

    pub not_registered: &'static str,

    pub activity_full: &'static str,

    // ==================== Request Validation ====================
    pub invalid_email: &'static str,

    /// Placeholders: {code}
    pub unsupported_language: &'static str,

    pub invalid_request: &'static str,
}

impl LanguageStrings {
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language.code() {
            "hu" => &HUNGARIAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    pub fn signed_up_message(&self, email: &str, activity: &str) -> String {
        fill(self.signed_up, &[("email", email), ("activity", activity)])
    }

    pub fn unregistered_message(&self, email: &str, activity: &str) -> String {
        fill(self.unregistered, &[("email", email), ("activity", activity)])
    }
}

/// Replace each `{key}` placeholder in `template` with its value.
///
/// Substitution is a single pass over the template: inserted values are
/// never scanned again, so a value that itself looks like `{key}` (email
/// local parts may contain braces) is copied through literally. Unknown
/// placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                text.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                text.push('{');
                rest = after;
            }
        }
    }

    text.push_str(rest);
    text
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    signed_up: "Signed up {email} for {activity}",
    unregistered: "Unregistered {email} from {activity}",

    activity_not_found: "Activity not found",
    already_registered: "Student already signed up for this activity",
    not_registered: "Student is not signed up for this activity",
    activity_full: "Activity is full",

    invalid_email: "Invalid email address",
    unsupported_language: "Unsupported language: {code}",
    invalid_request: "Invalid request",
};

// ==================== Hungarian Strings ====================

pub const HUNGARIAN_STRINGS: LanguageStrings = LanguageStrings {
    signed_up: "{email} sikeresen jelentkezett: {activity}",
    unregistered: "{email} leiratkozott: {activity}",

    activity_not_found: "A tevékenység nem található",
    already_registered: "A diák már jelentkezett erre a tevékenységre",
    not_registered: "A diák nem jelentkezett erre a tevékenységre",
    activity_full: "A tevékenység betelt",

    invalid_email: "Érvénytelen e-mail cím",
    unsupported_language: "Nem támogatott nyelv: {code}",
    invalid_request: "Érvénytelen kérés",
};
