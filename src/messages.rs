/*!
 * User-visible messages.
 *
 * Errors shown on the card are localized; log output stays in English.
 */

use serde::{Deserialize, Serialize};

/// Language of user-visible messages
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ko,
}

/// Message shown when a clip fails and playback stops
pub fn playback_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Failed to play audio",
        Locale::Ko => "오디오 재생에 실패했습니다",
    }
}

/// Message shown when the vocabulary could not be loaded
pub fn catalog_load_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Failed to load vocabulary",
        Locale::Ko => "단어 목록을 불러오지 못했습니다",
    }
}

/// Label for the reveal/hide translation control
pub fn translation_toggle_label(locale: Locale, shown: bool) -> &'static str {
    match (locale, shown) {
        (Locale::En, false) => "Show meaning",
        (Locale::En, true) => "Hide meaning",
        (Locale::Ko, false) => "뜻 보기",
        (Locale::Ko, true) => "뜻 숨기기",
    }
}
