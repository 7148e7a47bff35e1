//! Locale resolution for the verification surface.

/// Requested locale meaning "negotiate from the browser languages".
pub const AUTO_LOCALE: &str = "auto";

/// Resolve the locale to launch with.
///
/// An explicit request is returned unchanged. `"auto"` walks the browser's
/// preferred languages in order, taking the first exact match (case
/// insensitive) or, failing that, the first supported locale sharing the
/// primary subtag. Falls back to `fallback`.
pub fn negotiate_locale(
    requested: &str,
    browser_languages: &[String],
    supported: &[String],
    fallback: &str,
) -> String {
    if !requested.eq_ignore_ascii_case(AUTO_LOCALE) && !requested.trim().is_empty() {
        return requested.to_string();
    }
    for lang in browser_languages {
        let lang = lang.trim().replace('_', "-");
        if let Some(exact) = supported.iter().find(|s| s.eq_ignore_ascii_case(&lang)) {
            return exact.clone();
        }
        let primary = primary_subtag(&lang);
        if let Some(partial) = supported
            .iter()
            .find(|s| primary_subtag(s).eq_ignore_ascii_case(primary))
        {
            return partial.clone();
        }
    }
    fallback.to_string()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_locale_passes_through() {
        assert_eq!(negotiate_locale("fr", &strings(&["de"]), &strings(&["en"]), "en"), "fr");
    }

    #[test]
    fn auto_prefers_exact_then_primary() {
        let supported = strings(&["en", "de", "pt-BR"]);
        assert_eq!(negotiate_locale("auto", &strings(&["pt-br", "en"]), &supported, "en"), "pt-BR");
        assert_eq!(negotiate_locale("auto", &strings(&["de-AT"]), &supported, "en"), "de");
        assert_eq!(negotiate_locale("AUTO", &strings(&["pt_PT"]), &supported, "en"), "pt-BR");
    }

    #[test]
    fn auto_falls_back() {
        let supported = strings(&["en", "de"]);
        assert_eq!(negotiate_locale("auto", &strings(&["ja-JP"]), &supported, "en"), "en");
        assert_eq!(negotiate_locale("auto", &[], &supported, "de"), "de");
    }
}
