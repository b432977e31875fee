//! Russian-aware name ordering for ranking tie-breaks.
//!
//! Follows the usual `ru` collation closely enough for university names:
//! punctuation and spaces < digits < Cyrillic < Latin < everything else;
//! letters compare case-insensitively first, `ё` sorts with `е` and accented
//! Latin letters with their base letter, and only then do the accents and the
//! letter case break ties. Punctuation keeps its own order (`_` < `-` < `,` <
//! `;` < `:` < `!` < `?` < `.` ...).

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Punct,
    Digit,
    Cyrillic,
    Latin,
    Other,
}

/// Primary weight of a character plus its secondary and tertiary flags.
#[derive(Debug, Clone, Copy)]
struct Weight {
    primary: (Class, u32),
    /// `ё` vs `е`, `é` vs `e`.
    accent: bool,
    upper: bool,
}

fn weigh(c: char) -> Weight {
    let upper = c.is_uppercase();
    let lower = c.to_lowercase().next().unwrap_or(c);
    let (base, accent) = match lower {
        'ё' => ('е', true),
        other => match fold_latin(other) {
            Some(base) => (base, true),
            None => (other, false),
        },
    };

    let class = match base {
        'а'..='я' => Class::Cyrillic,
        '\u{0450}'..='\u{04FF}' => Class::Cyrillic,
        'a'..='z' => Class::Latin,
        c if c.is_ascii_digit() => Class::Digit,
        c if c.is_whitespace() || c.is_ascii_punctuation() => Class::Punct,
        c if c.is_alphabetic() => Class::Other,
        _ => Class::Punct,
    };

    // Cyrillic letters outside а..я follow the Russian alphabet.
    let code = match (class, base) {
        (Class::Cyrillic, 'а'..='я') => base as u32,
        (Class::Cyrillic, _) => base as u32 + 0x100,
        (Class::Punct, _) => punct_rank(base),
        _ => base as u32,
    };

    Weight {
        primary: (class, code),
        accent,
        upper,
    }
}

/// Punctuation and symbols in collation order; anything unlisted sorts after.
const PUNCT_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn punct_rank(c: char) -> u32 {
    if c.is_whitespace() {
        return 0;
    }
    match PUNCT_ORDER.chars().position(|p| p == c) {
        Some(i) => i as u32 + 1,
        None => PUNCT_ORDER.chars().count() as u32 + 1 + c as u32,
    }
}

/// Base letter of an accented lowercase Latin letter.
fn fold_latin(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

/// Compare two names the way a Russian reader would alphabetize them.
///
/// Total: names that collate equally fall back to code-point order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let wa: Vec<Weight> = a.chars().map(weigh).collect();
    let wb: Vec<Weight> = b.chars().map(weigh).collect();

    let primary = wa.iter().map(|w| w.primary).cmp(wb.iter().map(|w| w.primary));
    let accent = || wa.iter().map(|w| w.accent).cmp(wb.iter().map(|w| w.accent));
    // Lowercase first.
    let case = || wa.iter().map(|w| w.upper).cmp(wb.iter().map(|w| w.upper));

    primary
        .then_with(accent)
        .then_with(case)
        .then_with(|| a.cmp(b))
}
