//! Locale numeral formatting.
//!
//! Maps ASCII digits to Arabic-Indic glyphs (and back). Anything that is not
//! an ASCII digit passes through untouched, so strings that were already
//! converted are left as they are.

use std::borrow::Cow;

/// Arabic-Indic digit glyphs, indexed by digit value.
const ARABIC_INDIC: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// A value that can be rendered as a decimal string.
///
/// Returns `None` for absent values (`None`, JSON null), which format as `""`.
pub trait Numeral {
    fn decimal(&self) -> Option<Cow<'_, str>>;
}

macro_rules! impl_numeral_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeral for $t {
                fn decimal(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_numeral_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Numeral for str {
    fn decimal(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl Numeral for String {
    fn decimal(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl<T: Numeral + ?Sized> Numeral for &T {
    fn decimal(&self) -> Option<Cow<'_, str>> {
        (**self).decimal()
    }
}

impl<T: Numeral> Numeral for Option<T> {
    fn decimal(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|v| v.decimal())
    }
}

impl Numeral for serde_json::Value {
    fn decimal(&self) -> Option<Cow<'_, str>> {
        match self {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Convert every ASCII digit in `value` to its Arabic-Indic glyph.
///
/// ```
/// use docportal_kernel::numerals::to_locale_digits;
///
/// assert_eq!(to_locale_digits(&123), "١٢٣");
/// assert_eq!(to_locale_digits(&None::<u32>), "");
/// ```
pub fn to_locale_digits<V: Numeral + ?Sized>(value: &V) -> String {
    let Some(decimal) = value.decimal() else {
        return String::new();
    };

    decimal
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                ARABIC_INDIC[usize::from(c as u8 - b'0')]
            } else {
                c
            }
        })
        .collect()
}

/// Convert Arabic-Indic digits back to ASCII, leaving everything else alone.
pub fn to_ascii_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match ARABIC_INDIC.iter().position(|&g| g == c) {
            Some(d) => char::from(b'0' + d as u8),
            None => c,
        })
        .collect()
}
