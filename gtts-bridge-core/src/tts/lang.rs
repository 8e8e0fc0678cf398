//! Language codes accepted by the Google Translate speech endpoint

use super::types::Language;
use crate::error::TtsError;

const LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fr-CA", "French (Canada)"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("ha", "Hausa"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iw", "Hebrew"),
    ("ja", "Japanese"),
    ("jw", "Javanese"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi (Gurmukhi)"),
    ("pl", "Polish"),
    ("pt", "Portuguese (Brazil)"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("yue", "Cantonese"),
    ("zh", "Chinese (Mandarin)"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Mandarin/Taiwan)"),
];

pub fn supported_languages() -> Vec<Language> {
    LANGUAGES
        .iter()
        .map(|(code, name)| Language {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn is_supported(code: &str) -> bool {
    LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Map regional codes the service used to accept onto their current form.
/// Unknown codes pass through untouched.
pub fn fallback_deprecated(code: &str) -> &str {
    let lower = code.to_lowercase();
    match lower.as_str() {
        "en-us" | "en-ca" | "en-uk" | "en-gb" | "en-au" | "en-gh" | "en-in" | "en-ie"
        | "en-nz" | "en-ng" | "en-ph" | "en-za" | "en-tz" => {
            tracing::warn!(lang = code, "Deprecated language code, using 'en'");
            "en"
        }
        "fr-fr" => "fr",
        "pt-br" => "pt",
        "es-es" | "es-us" => "es",
        "zh-cn" => "zh-CN",
        "zh-tw" => "zh-TW",
        _ => code,
    }
}

/// Normalize `code` and make sure the service knows it.
pub fn resolve(code: &str) -> Result<String, TtsError> {
    let resolved = fallback_deprecated(code);
    if is_supported(resolved) {
        Ok(resolved.to_string())
    } else {
        Err(TtsError::Validation(format!("Language not supported: {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_supported() {
        assert_eq!(resolve("ar").unwrap(), "ar");
    }

    #[test]
    fn test_deprecated_codes_fall_back() {
        assert_eq!(resolve("en-us").unwrap(), "en");
        assert_eq!(resolve("EN-GB").unwrap(), "en");
        assert_eq!(resolve("zh-cn").unwrap(), "zh-CN");
        assert_eq!(resolve("pt-br").unwrap(), "pt");
    }

    #[test]
    fn test_unknown_language_rejected() {
        let err = resolve("xx").unwrap_err();
        assert_eq!(err.to_string(), "Language not supported: xx");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_codes_are_case_sensitive_outside_fallbacks() {
        assert!(is_supported("zh-TW"));
        assert!(!is_supported("ZH"));
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let langs = supported_languages();
        let mut codes: Vec<_> = langs.iter().map(|l| l.code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), langs.len());
    }
}
