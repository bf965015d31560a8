use crate::models::Replacement;

use super::table::{Entries, RuleTableConfig};

fn literal(pairs: &[(&str, &str)]) -> Entries {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Replacement::from(*value)))
        .collect()
}

/// The built-in rule table tuned for Zoom and Whisper meeting transcripts
pub fn builtin_table() -> RuleTableConfig {
    // Plurals and conjugations come for free ("vpns" -> "VPNs"), at the risk of
    // touching longer words, so only distinctive keys belong here.
    let mut exact = literal(&[
        ("cpu", "CPU"),
        ("vpn", "VPN"),
        ("iphone", "iPhone"),
        ("ipad", "iPad"),
        ("google", "Google"),
        ("Google assistant", "Google Assistant"),
        ("youtube", "YouTube"),
        ("instagram", "Instagram"),
        ("android", "Android"),
        ("huawei", "Huawei"),
        ("motorola", "Motorola"),
        ("fitbit", "Fitbit"),
        ("gopro", "GoPro"),
        ("Siri shortcut", "Siri Shortcut"),
    ]);

    // Filler words go, and a capitalised filler hands its capital to the next word.
    exact.push((
        r"\bU[mh],? (?P<lower>[a-z]?)".to_string(),
        Replacement::computed(|caps| caps["lower"].to_uppercase()),
    ));
    exact.push((r"\bu[mh],? ".to_string(), Replacement::from("")));

    let exact_whole_word = literal(&[
        ("i", "I"),
        ("homekit", "HomeKit"),
        ("siri", "Siri"),
        ("icloud", "iCloud"),
        ("ios", "iOS"),
        ("iot", "IoT"),
        ("discord", "Discord"),
        ("https", "HTTPS"),
        ("http", "HTTP"),
        ("home depot", "Home Depot"),
        ("best buy", "Best Buy"),
        ("alexa", "Alexa"),
        ("seo", "SEO"),
        ("hello fresh", "Hello Fresh"),
        ("internet", "Internet"),
        ("gdpr", "GDPR"),
        ("adsense", "AdSense"),
        ("bluetooth", "Bluetooth"),
        ("ethernet", "Ethernet"),
        ("hdmi", "HDMI"),
        ("US", "U.S."),
    ]);

    // Key and value must differ by more than case, or the rule never settles.
    let insensitive = literal(&[
        ("k-animity", "k-anonymity"),
        ("home kits?", "HomeKit"),
        ("home kids?", "HomeKit"),
        ("smart thing", "SmartThing"),
        ("series shortcut", "Siri Shortcut"),
        ("home pod", "HomePod"),
        ("nord vpn", "NordVPN"),
        ("more vpn", "NordVPN"),
        ("nordvpns", "NordVPN's"),
        ("express vpn", "ExpressVPN"),
        ("wi fi", "Wi-Fi"),
        ("wifi", "Wi-Fi"),
        ("internet connected", "Internet-connected"),
        ("WEBVTT", ""),
    ]);

    let insensitive_whole_word = literal(&[
        ("coven", "COVID"),
        ("i cloud", "iCloud"),
        ("mag safe", "MagSafe"),
        ("wire shark", "Wireshark"),
    ]);

    let preserving = literal(&[
        ("deep fake", "deepfake"),
        ("the identification", "de-identification"),
        ("de identification", "de-identification"),
        ("smart log", "smart lock"),
        ("data set", "dataset"),
    ]);

    let repeats = [
        "the", "a", "an", "but", "and", "or", "if", "then", "so", "this", "that", "those",
        "these", "I", "my", "I'm", "I'll", "I've", "I'd", "you", "your", "we", "our", "we're",
        "we'll", "we've", "we'd", "they", "their", "it", "its", "it's", "is", "are", "was",
        "were", "can", "will", "may", "might", "who", "what", "where", "when", "why", "how",
        "about", "as", "at", "by", "for", "from", "in", "like", "of", "on", "to", "with",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    RuleTableConfig {
        exact,
        exact_whole_word,
        insensitive,
        insensitive_whole_word,
        preserving,
        preserving_whole_word: Vec::new(),
        repeats,
        repeats_ignore_case: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::engine::apply;
    use crate::rules::table::RuleTable;

    fn clean(text: &str) -> String {
        let rules = RuleTable::new(builtin_table()).build().unwrap();
        apply(text, &rules).unwrap().0
    }

    #[test]
    fn test_builtin_table_compiles() {
        let config = builtin_table();
        let rules = RuleTable::new(config.clone()).build().unwrap();
        assert_eq!(rules.len(), config.entry_count() + config.repeats.len());
    }

    #[test]
    fn test_capitalization_fixes() {
        assert_eq!(clean("i bought an iphone and two vpns"), "I bought an iPhone and two VPNs");
        assert_eq!(clean("curiosity about ios"), "curiosity about iOS");
        assert_eq!(clean("a bonus for the US"), "a bonus for the U.S.");
    }

    #[test]
    fn test_filler_words() {
        assert_eq!(clean("Well. Um, so it works"), "Well. So it works");
        assert_eq!(clean("it uh, works"), "it works");
        assert_eq!(clean("the umbrella"), "the umbrella");
    }

    #[test]
    fn test_transcription_fixes() {
        assert_eq!(clean("my Home Kits and wire shark"), "my HomeKit and Wireshark");
        assert_eq!(clean("Deep fake videos and a data set"), "Deepfake videos and a dataset");
    }

    #[test]
    fn test_stutter() {
        assert_eq!(clean("and and, and we we went"), "and we went");
    }

    #[test]
    fn test_output_is_stable() {
        let once = clean("So so i think the the Home Kit data set is, um, fine");
        assert_eq!(clean(&once), once);
    }
}
