//! Built-in language data: ISO 639 codes with display names and flags,
//! plus free-form aliases accepted on the command line.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native: &'static str,
    pub flag: &'static str,
    /// Whether the framework ships rule templates for this language.
    pub supported: bool,
}

impl Language {
    pub const fn new(
        code: &'static str,
        name: &'static str,
        native: &'static str,
        flag: &'static str,
        supported: bool,
    ) -> Self {
        Self {
            code,
            name,
            native,
            flag,
            supported,
        }
    }
}

pub(crate) const LANGUAGES: &[Language] = &[
    Language::new("en", "English", "English", "🇺🇸", true),
    Language::new("ja", "Japanese", "日本語", "🇯🇵", true),
    Language::new("id", "Indonesian", "Bahasa Indonesia", "🇮🇩", true),
    Language::new("zh", "Chinese", "中文", "🇨🇳", false),
    Language::new("af", "Afrikaans", "Afrikaans", "🇿🇦", false),
    Language::new("sq", "Albanian", "Shqip", "🇦🇱", false),
    Language::new("am", "Amharic", "አማርኛ", "🇪🇹", false),
    Language::new("ar", "Arabic", "العربية", "🇸🇦", false),
    Language::new("hy", "Armenian", "Հայերեն", "🇦🇲", false),
    Language::new("az", "Azerbaijani", "Azərbaycan dili", "🇦🇿", false),
    Language::new("eu", "Basque", "Euskera", "🇪🇸", false),
    Language::new("be", "Belarusian", "Беларуская", "🇧🇾", false),
    Language::new("bn", "Bengali", "বাংলা", "🇧🇩", false),
    Language::new("bs", "Bosnian", "Bosanski", "🇧🇦", false),
    Language::new("bg", "Bulgarian", "Български", "🇧🇬", false),
    Language::new("ca", "Catalan", "Català", "🇪🇸", false),
    Language::new("ceb", "Cebuano", "Cebuano", "🇵🇭", false),
    Language::new("ny", "Chichewa", "Chichewa", "🇲🇼", false),
    Language::new("co", "Corsican", "Corsu", "🇫🇷", false),
    Language::new("hr", "Croatian", "Hrvatski", "🇭🇷", false),
    Language::new("cs", "Czech", "Čeština", "🇨🇿", false),
    Language::new("da", "Danish", "Dansk", "🇩🇰", false),
    Language::new("nl", "Dutch", "Nederlands", "🇳🇱", false),
    Language::new("eo", "Esperanto", "Esperanto", "🏴‍☠️", false),
    Language::new("et", "Estonian", "Eesti", "🇪🇪", false),
    Language::new("tl", "Filipino", "Filipino", "🇵🇭", false),
    Language::new("fi", "Finnish", "Suomi", "🇫🇮", false),
    Language::new("fr", "French", "Français", "🇫🇷", false),
    Language::new("fy", "Frisian", "Frysk", "🇳🇱", false),
    Language::new("gl", "Galician", "Galego", "🇪🇸", false),
    Language::new("ka", "Georgian", "ქართული", "🇬🇪", false),
    Language::new("de", "German", "Deutsch", "🇩🇪", false),
    Language::new("el", "Greek", "Ελληνικά", "🇬🇷", false),
    Language::new("gu", "Gujarati", "ગુજરાતી", "🇮🇳", false),
    Language::new("ht", "Haitian Creole", "Kreyòl ayisyen", "🇭🇹", false),
    Language::new("ha", "Hausa", "Hausa", "🇳🇬", false),
    Language::new("haw", "Hawaiian", "ʻŌlelo Hawaiʻi", "🇺🇸", false),
    Language::new("iw", "Hebrew", "עברית", "🇮🇱", false),
    Language::new("hi", "Hindi", "हिन्दी", "🇮🇳", false),
    Language::new("hmn", "Hmong", "Hmong", "🇨🇳", false),
    Language::new("hu", "Hungarian", "Magyar", "🇭🇺", false),
    Language::new("is", "Icelandic", "Íslenska", "🇮🇸", false),
    Language::new("ig", "Igbo", "Igbo", "🇳🇬", false),
    Language::new("ga", "Irish", "Gaeilge", "🇮🇪", false),
    Language::new("it", "Italian", "Italiano", "🇮🇹", false),
    Language::new("jv", "Javanese", "Basa Jawa", "🇮🇩", false),
    Language::new("kn", "Kannada", "ಕನ್ನಡ", "🇮🇳", false),
    Language::new("kk", "Kazakh", "Қазақ тілі", "🇰🇿", false),
    Language::new("km", "Khmer", "ខ្មែរ", "🇰🇭", false),
    Language::new("ko", "Korean", "한국어", "🇰🇷", false),
    Language::new("ku", "Kurdish (Kurmanji)", "Kurdî", "🇹🇷", false),
    Language::new("ky", "Kyrgyz", "Кыргызча", "🇰🇬", false),
    Language::new("lo", "Lao", "ລາວ", "🇱🇦", false),
    Language::new("la", "Latin", "Latina", "🏛️", false),
    Language::new("lv", "Latvian", "Latviešu", "🇱🇻", false),
    Language::new("lt", "Lithuanian", "Lietuvių", "🇱🇹", false),
    Language::new("lb", "Luxembourgish", "Lëtzebuergesch", "🇱🇺", false),
    Language::new("mk", "Macedonian", "Македонски", "🇲🇰", false),
    Language::new("mg", "Malagasy", "Malagasy", "🇲🇬", false),
    Language::new("ms", "Malay", "Bahasa Melayu", "🇲🇾", false),
    Language::new("ml", "Malayalam", "മലയാളം", "🇮🇳", false),
    Language::new("mt", "Maltese", "Malti", "🇲🇹", false),
    Language::new("mi", "Maori", "Māori", "🇳🇿", false),
    Language::new("mr", "Marathi", "मराठी", "🇮🇳", false),
    Language::new("mn", "Mongolian", "Монгол", "🇲🇳", false),
    Language::new("my", "Myanmar (Burmese)", "မြန်မာစာ", "🇲🇲", false),
    Language::new("ne", "Nepali", "नेपाली", "🇳🇵", false),
    Language::new("no", "Norwegian", "Norsk", "🇳🇴", false),
    Language::new("ps", "Pashto", "پښتو", "🇦🇫", false),
    Language::new("fa", "Persian", "فارسی", "🇮🇷", false),
    Language::new("pl", "Polish", "Polski", "🇵🇱", false),
    Language::new("pt", "Portuguese", "Português", "🇵🇹", false),
    Language::new("pa", "Punjabi", "ਪੰਜਾਬੀ", "🇮🇳", false),
    Language::new("ro", "Romanian", "Română", "🇷🇴", false),
    Language::new("ru", "Russian", "Русский", "🇷🇺", false),
    Language::new("sm", "Samoan", "Gagana Samoa", "🇼🇸", false),
    Language::new("gd", "Scots Gaelic", "Gàidhlig", "🇬🇧", false),
    Language::new("sr", "Serbian", "Српски", "🇷🇸", false),
    Language::new("st", "Sesotho", "Sesotho", "🇱🇸", false),
    Language::new("sn", "Shona", "Shona", "🇿🇼", false),
    Language::new("sd", "Sindhi", "سنڌي", "🇵🇰", false),
    Language::new("si", "Sinhala", "සිංහල", "🇱🇰", false),
    Language::new("sk", "Slovak", "Slovenčina", "🇸🇰", false),
    Language::new("sl", "Slovenian", "Slovenščina", "🇸🇮", false),
    Language::new("so", "Somali", "Soomaali", "🇸🇴", false),
    Language::new("es", "Spanish", "Español", "🇪🇸", false),
    Language::new("su", "Sundanese", "Basa Sunda", "🇮🇩", false),
    Language::new("sw", "Swahili", "Kiswahili", "🇹🇿", false),
    Language::new("sv", "Swedish", "Svenska", "🇸🇪", false),
    Language::new("tg", "Tajik", "Тоҷикӣ", "🇹🇯", false),
    Language::new("ta", "Tamil", "தமிழ்", "🇮🇳", false),
    Language::new("te", "Telugu", "తెలుగు", "🇮🇳", false),
    Language::new("th", "Thai", "ไทย", "🇹🇭", false),
    Language::new("tr", "Turkish", "Türkçe", "🇹🇷", false),
    Language::new("uk", "Ukrainian", "Українська", "🇺🇦", false),
    Language::new("ur", "Urdu", "اردو", "🇵🇰", false),
    Language::new("uz", "Uzbek", "Oʻzbekcha", "🇺🇿", false),
    Language::new("vi", "Vietnamese", "Tiếng Việt", "🇻🇳", false),
    Language::new("cy", "Welsh", "Cymraeg", "🇬🇧", false),
    Language::new("xh", "Xhosa", "isiXhosa", "🇿🇦", false),
    Language::new("yi", "Yiddish", "ייִדיש", "🇮🇱", false),
    Language::new("yo", "Yoruba", "Yorùbá", "🇳🇬", false),
    Language::new("zu", "Zulu", "isiZulu", "🇿🇦", false),
];

/// Alias to canonical code. Keys are matched case-insensitively.
pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("english", "en"),
    ("eng", "en"),
    ("us", "en"),
    ("american", "en"),
    ("british", "en"),
    ("japanese", "ja"),
    ("japan", "ja"),
    ("jp", "ja"),
    ("nihongo", "ja"),
    ("indonesian", "id"),
    ("indonesia", "id"),
    ("indo", "id"),
    ("bahasa", "id"),
    ("chinese", "zh"),
    ("china", "zh"),
    ("mandarin", "zh"),
    ("cn", "zh"),
    ("simplified", "zh"),
    ("中文", "zh"),
    ("afrikaans", "af"),
    ("african", "af"),
    ("albanian", "sq"),
    ("shqip", "sq"),
    ("amharic", "am"),
    ("amhara", "am"),
    ("arabic", "ar"),
    ("العربية", "ar"),
    ("عربي", "ar"),
    ("armenian", "hy"),
    ("Հայերեն", "hy"),
    ("հայերեն", "hy"),
    ("azerbaijani", "az"),
    ("azeri", "az"),
    ("basque", "eu"),
    ("euskera", "eu"),
    ("belarusian", "be"),
    ("Беларуская", "be"),
    ("беларуская", "be"),
    ("bengali", "bn"),
    ("বাংলা", "bn"),
    ("bangla", "bn"),
    ("bosnian", "bs"),
    ("bosanski", "bs"),
    ("bulgarian", "bg"),
    ("Български", "bg"),
    ("български", "bg"),
    ("catalan", "ca"),
    ("català", "ca"),
    ("cebuano", "ceb"),
    ("chichewa", "ny"),
    ("corsican", "co"),
    ("corsu", "co"),
    ("croatian", "hr"),
    ("hrvatski", "hr"),
    ("czech", "cs"),
    ("čeština", "cs"),
    ("danish", "da"),
    ("dansk", "da"),
    ("dutch", "nl"),
    ("nederlands", "nl"),
    ("esperanto", "eo"),
    ("estonian", "et"),
    ("eesti", "et"),
    ("filipino", "tl"),
    ("finnish", "fi"),
    ("suomi", "fi"),
    ("french", "fr"),
    ("français", "fr"),
    ("frisian", "fy"),
    ("frysk", "fy"),
    ("galician", "gl"),
    ("galego", "gl"),
    ("georgian", "ka"),
    ("ქართული", "ka"),
    ("german", "de"),
    ("deutsch", "de"),
    ("greek", "el"),
    ("Ελληνικά", "el"),
    ("gujarati", "gu"),
    ("ગુજરાતી", "gu"),
    ("haitian", "ht"),
    ("creole", "ht"),
    ("kreyòl", "ht"),
    ("hausa", "ha"),
    ("hawaiian", "haw"),
    ("ʻŌlelo", "haw"),
    ("hebrew", "iw"),
    ("עברית", "iw"),
    ("hindi", "hi"),
    ("हिन्दी", "hi"),
    ("हिंदी", "hi"),
    ("hmong", "hmn"),
    ("hungarian", "hu"),
    ("magyar", "hu"),
    ("icelandic", "is"),
    ("íslenska", "is"),
    ("igbo", "ig"),
    ("irish", "ga"),
    ("gaeilge", "ga"),
    ("italian", "it"),
    ("italiano", "it"),
    ("javanese", "jv"),
    ("jawa", "jv"),
    ("jv", "jv"),
    ("kannada", "kn"),
    ("ಕನ್ನಡ", "kn"),
    ("kazakh", "kk"),
    ("Қазақ", "kk"),
    ("khmer", "km"),
    ("ខ្មែរ", "km"),
    ("korean", "ko"),
    ("한국어", "ko"),
    ("조선말", "ko"),
    ("kurdish", "ku"),
    ("kurmanji", "ku"),
    ("kurdî", "ku"),
    ("kyrgyz", "ky"),
    ("Кыргызча", "ky"),
    ("кыргызча", "ky"),
    ("lao", "lo"),
    ("ລາວ", "lo"),
    ("ພາສາລາວ", "lo"),
    ("latin", "la"),
    ("latina", "la"),
    ("latvian", "lv"),
    ("latviešu", "lv"),
    ("lithuanian", "lt"),
    ("lietuvių", "lt"),
    ("luxembourgish", "lb"),
    ("lëtzebuergesch", "lb"),
    ("macedonian", "mk"),
    ("Македонски", "mk"),
    ("malagasy", "mg"),
    ("malay", "ms"),
    ("bahasa_melayu", "ms"),
    ("malayalam", "ml"),
    ("മലയാളം", "ml"),
    ("maltese", "mt"),
    ("malti", "mt"),
    ("maori", "mi"),
    ("māori", "mi"),
    ("marathi", "mr"),
    ("मराठी", "mr"),
    ("mongolian", "mn"),
    ("Монгол", "mn"),
    ("myanmar", "my"),
    ("burmese", "my"),
    ("မြန်မာစာ", "my"),
    ("nepali", "ne"),
    ("नेपाली", "ne"),
    ("norwegian", "no"),
    ("norsk", "no"),
    ("pashto", "ps"),
    ("پښتو", "ps"),
    ("persian", "fa"),
    ("farsi", "fa"),
    ("فارسی", "fa"),
    ("polish", "pl"),
    ("polski", "pl"),
    ("portuguese", "pt"),
    ("português", "pt"),
    ("punjabi", "pa"),
    ("ਪੰਜਾਬੀ", "pa"),
    ("romanian", "ro"),
    ("română", "ro"),
    ("russian", "ru"),
    ("Русский", "ru"),
    ("русский", "ru"),
    ("samoan", "sm"),
    ("scots", "gd"),
    ("gaelic", "gd"),
    ("gàidhlig", "gd"),
    ("serbian", "sr"),
    ("Српски", "sr"),
    ("sesotho", "st"),
    ("shona", "sn"),
    ("sindhi", "sd"),
    ("سنڌي", "sd"),
    ("sinhala", "si"),
    ("සිංහල", "si"),
    ("slovak", "sk"),
    ("slovenčina", "sk"),
    ("slovenian", "sl"),
    ("slovenščina", "sl"),
    ("somali", "so"),
    ("soomaali", "so"),
    ("spanish", "es"),
    ("español", "es"),
    ("sundanese", "su"),
    ("sunda", "su"),
    ("swahili", "sw"),
    ("kiswahili", "sw"),
    ("swedish", "sv"),
    ("svenska", "sv"),
    ("tajik", "tg"),
    ("Тоҷикӣ", "tg"),
    ("tamil", "ta"),
    ("தமிழ்", "ta"),
    ("telugu", "te"),
    ("తెలుగు", "te"),
    ("thai", "th"),
    ("ไทย", "th"),
    ("turkish", "tr"),
    ("türkçe", "tr"),
    ("ukrainian", "uk"),
    ("Українська", "uk"),
    ("urdu", "ur"),
    ("اردو", "ur"),
    ("uzbek", "uz"),
    ("oʻzbekcha", "uz"),
    ("vietnamese", "vi"),
    ("tiếng_việt", "vi"),
    ("welsh", "cy"),
    ("cymraeg", "cy"),
    ("xhosa", "xh"),
    ("isixhosa", "xh"),
    ("yiddish", "yi"),
    ("ייִדיש", "yi"),
    ("yoruba", "yo"),
    ("yorùbá", "yo"),
    ("zulu", "zu"),
    ("isizulu", "zu"),
];
