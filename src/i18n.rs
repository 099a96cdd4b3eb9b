//! Internationalization (i18n) module.
//!
//! Provides localized strings for section titles, CLI output, and donor
//! prompts. English is the default; Dutch is available because most donor
//! studies using this tool run in the Netherlands. The architecture supports
//! adding more languages in the future.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Dutch
    Nl,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "nl", "en_US", "nl_NL").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "nl" => Some(Self::Nl),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from the `LANG` / `LC_MESSAGES` environment variables.
pub fn detect_system_lang() -> Lang {
    std::env::var("DONORLENS_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $nl:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Nl => $nl,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "donorlens \u{2014} extract per-participant insight from donated data exports (chat logs, account info, location and browser history) without crashing on malformed input.",
    "donorlens \u{2014} haal inzichten per deelnemer uit gedoneerde data-exports (chatlogs, accountinformatie, locatie- en browsergeschiedenis) zonder vast te lopen op ongeldige invoer."
);

// ── Section titles ───────────────────────────────────────────────

msg!(
    overview_title,
    "The following data is extracted from the file:",
    "De volgende gegevens zijn uit het bestand gehaald:"
);
msg!(
    log_title,
    "Extraction log",
    "Wij ontvingen de volgende waarschuwingen:"
);
msg!(
    account_title,
    "The account info file consists of:",
    "Het account informatie bestand bestaat uit:"
);
msg!(
    location_overall_title,
    "Overall",
    "Totaaloverzicht"
);
msg!(
    browser_title,
    "News and other website visits",
    "Bezoeken aan nieuws- en overige websites"
);

// ── Column labels ────────────────────────────────────────────────

msg!(col_groups, "Number of groups", "Aantal groepen");
msg!(col_contacts, "Number of contacts", "Aantal contacten");
msg!(col_message, "Message", "Omschrijving");

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_verbose,
    "Verbose logging (-v info, -vv debug, -vvv trace)",
    "Uitgebreide logging (-v info, -vv debug, -vvv trace)"
);
msg!(
    help_lang,
    "Language (en, nl). Defaults to system locale",
    "Taal (en, nl). Standaard de systeemtaal"
);
msg!(
    help_cmd_chat,
    "Extract participant features from a chat export",
    "Haal deelnemerskenmerken uit een chat-export"
);
msg!(
    help_cmd_account,
    "Extract group and contact counts from an account info export",
    "Haal groeps- en contactaantallen uit een account-info-export"
);
msg!(
    help_cmd_location,
    "Extract activity summaries from a semantic location history export",
    "Haal activiteitsoverzichten uit een locatiegeschiedenis-export"
);
msg!(
    help_cmd_browser,
    "Extract website visit summaries from a browser history export",
    "Haal websitebezoek-overzichten uit een browsergeschiedenis-export"
);
