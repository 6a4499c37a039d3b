//! User-facing message catalog.
//!
//! Handlers never hard-code user-visible text; they ask the `Translator` for a key.
//! Lookup order: configured locale → English → the key itself.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Unknown or empty tags fall back to English.
    /// Region subtags are ignored (`es-MX` → `Es`).
    pub fn parse(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "es" => Self::Es,
            _ => Self::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

const EN: &[(&str, &str)] = &[
    (
        "create_subscription_error",
        "We could not enable notifications. Please try again later.",
    ),
    (
        "remove_subscription_error",
        "We could not disable notifications. Please try again later.",
    ),
];

const ES: &[(&str, &str)] = &[
    (
        "create_subscription_error",
        "No pudimos activar las notificaciones. Inténtalo de nuevo más tarde.",
    ),
    (
        "remove_subscription_error",
        "No pudimos desactivar las notificaciones. Inténtalo de nuevo más tarde.",
    ),
];

fn catalog(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => EN,
        Locale::Es => ES,
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    catalog(locale)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.locale, key)
            .or_else(|| lookup(Locale::En, key))
            .unwrap_or(key)
    }
}
