//! Known crawler and bot user-agent signatures.

/// Search engine crawlers.
pub const SEARCH_ENGINES: &[&str] = &[
    "googlebot",
    "google-inspectiontool",
    "adsbot-google",
    "mediapartners-google",
    "bingbot",
    "bingpreview",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "yandeximages",
    "sogou",
    "exabot",
    "applebot",
    "petalbot",
    "seznambot",
    "qwantify",
];

/// Social network link-preview fetchers.
pub const SOCIAL_PREVIEWS: &[&str] = &[
    "facebookexternalhit",
    "facebot",
    "twitterbot",
    "linkedinbot",
    "slackbot",
    "slack-imgproxy",
    "discordbot",
    "whatsapp",
    "telegrambot",
    "pinterest",
    "redditbot",
    "embedly",
    "skypeuripreview",
    "vkshare",
];

/// SEO and site-audit crawlers.
pub const SEO_CRAWLERS: &[&str] = &[
    "ahrefsbot",
    "semrushbot",
    "mj12bot",
    "dotbot",
    "rogerbot",
    "screaming frog",
    "serpstatbot",
    "blexbot",
    "dataforseobot",
];

/// Headless browser and automation markers.
pub const HEADLESS_MARKERS: &[&str] = &["headlesschrome", "phantomjs", "lighthouse", "chrome-lighthouse"];

/// Generic substrings that indicate automation.
pub const GENERIC: &[&str] = &["bot", "crawler", "spider", "scraper"];

/// The first signature matching the user agent, case-insensitively.
pub fn matching_signature(user_agent: &str) -> Option<&'static str> {
    let ua = user_agent.to_ascii_lowercase();
    if ua.trim().is_empty() {
        return None;
    }
    [SEARCH_ENGINES, SOCIAL_PREVIEWS, SEO_CRAWLERS, HEADLESS_MARKERS, GENERIC]
        .into_iter()
        .flatten()
        .copied()
        .find(|sig| ua.contains(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_crawlers_match() {
        let googlebot = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        assert_eq!(matching_signature(googlebot), Some("googlebot"));
        assert_eq!(
            matching_signature("facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"),
            Some("facebookexternalhit")
        );
        assert_eq!(matching_signature("Mozilla/5.0 (compatible; AhrefsBot/7.0)"), Some("ahrefsbot"));
    }

    #[test]
    fn generic_substrings_match() {
        assert_eq!(matching_signature("my-little-scraper/0.1"), Some("scraper"));
        assert_eq!(matching_signature("SomeCrawler"), Some("crawler"));
    }

    #[test]
    fn ordinary_browsers_do_not_match() {
        let chrome = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        let safari = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        assert_eq!(matching_signature(chrome), None);
        assert_eq!(matching_signature(safari), None);
        assert_eq!(matching_signature(""), None);
    }
}
