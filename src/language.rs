use serde::Deserialize;

/// A target language: short code used for file naming, display name used in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLanguageEntry")]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

impl LanguageEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Unchecked `[[languages]]` table from the config file.
#[derive(Deserialize)]
struct RawLanguageEntry {
    code: String,
    name: String,
}

impl TryFrom<RawLanguageEntry> for LanguageEntry {
    type Error = String;

    fn try_from(raw: RawLanguageEntry) -> std::result::Result<Self, Self::Error> {
        let code = validate_code(raw.code.trim())?;
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(format!("Language '{}' has an empty name", code));
        }
        Ok(LanguageEntry::new(code, name))
    }
}

/// Codes end up in output file names.
fn validate_code(code: &str) -> std::result::Result<&str, String> {
    if code.is_empty() {
        return Err("Language code must not be empty".to_string());
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!(
            "Invalid language code: '{}'. Use letters, digits, '-' or '_'",
            code
        ));
    }
    Ok(code)
}

impl std::fmt::Display for LanguageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}

/// Parses `de=German`, or a bare `de` resolved through the built-in table.
impl std::str::FromStr for LanguageEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('=') {
            Some((code, name)) => {
                let (code, name) = (code.trim(), name.trim());
                if code.is_empty() || name.is_empty() {
                    return Err(format!(
                        "Invalid language: '{}'. Use CODE=NAME, e.g. de=German",
                        s
                    ));
                }
                Ok(LanguageEntry::new(validate_code(code)?, name))
            }
            None => {
                if s.is_empty() {
                    return Err("Language code must not be empty".to_string());
                }
                language_code_to_name(s)
                    .map(|name| LanguageEntry::new(s.to_lowercase(), name))
                    .ok_or_else(|| {
                        format!(
                            "Unknown language code: {}. Give a display name with {}=Name",
                            s, s
                        )
                    })
            }
        }
    }
}

/// The languages translated when nothing else is configured.
pub fn default_languages() -> Vec<LanguageEntry> {
    vec![LanguageEntry::new("de", "German")]
}

/// Convert language code to human-readable name for better prompting.
pub fn language_code_to_name(code: &str) -> Option<&'static str> {
    let lowercase = code.to_lowercase();
    let name = match lowercase.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "bn" => "Bengali",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "id" => "Indonesian",
        "ms" => "Malay",
        "tl" => "Tagalog",
        "nl" => "Dutch",
        "pl" => "Polish",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "cs" => "Czech",
        "sv" => "Swedish",
        "da" => "Danish",
        "fi" => "Finnish",
        "no" => "Norwegian",
        "el" => "Greek",
        "he" => "Hebrew",
        "hu" => "Hungarian",
        "ro" => "Romanian",
        "bg" => "Bulgarian",
        "hr" => "Croatian",
        "sk" => "Slovak",
        "sl" => "Slovenian",
        "lt" => "Lithuanian",
        "lv" => "Latvian",
        "et" => "Estonian",
        _ => return None,
    };
    Some(name)
}
