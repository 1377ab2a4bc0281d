//! Pattern flags, numbered like the host's `re` module so values can be passed through unchanged.

use bitflags::bitflags;

bitflags! {
    /// Flags controlling how a pattern is parsed and matched.
    ///
    /// The set is immutable once a [`Regex`](crate::Regex) is built; the matcher threads it
    /// through every recursive call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// Case-insensitive matching (`re.I`).
        const IGNORECASE = 0x0002;
        /// Locale-dependent classes (`re.L`). Only meaningful for byte patterns.
        const LOCALE = 0x0004;
        /// `^` and `$` match at line boundaries (`re.M`).
        const MULTILINE = 0x0008;
        /// `.` matches newline (`re.S`).
        const DOTALL = 0x0010;
        /// Unicode classes (`re.U`), the host default for text patterns.
        const UNICODE = 0x0020;
        /// Whitespace and `#` comments in the pattern are ignored (`re.X`).
        const VERBOSE = 0x0040;
        /// ASCII-only classes and case folding (`re.A`).
        const ASCII = 0x0100;
    }
}

impl Flags {
    /// Maps an inline flag letter, as in `(?ai)`, to its flag.
    pub fn from_letter(letter: char) -> Option<Flags> {
        match letter {
            'a' => Some(Flags::ASCII),
            'i' => Some(Flags::IGNORECASE),
            'L' => Some(Flags::LOCALE),
            'm' => Some(Flags::MULTILINE),
            's' => Some(Flags::DOTALL),
            'u' => Some(Flags::UNICODE),
            'x' => Some(Flags::VERBOSE),
            _ => None,
        }
    }

    /// True when ASCII case folding applies.
    pub fn ascii_ignorecase(self) -> bool {
        self.contains(Flags::IGNORECASE | Flags::ASCII)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_flags() {
        assert_eq!(Flags::from_letter('s'), Some(Flags::DOTALL));
        assert_eq!(Flags::from_letter('a'), Some(Flags::ASCII));
        assert_eq!(Flags::from_letter('q'), None);
    }

    #[test]
    fn ascii_ignorecase_needs_both() {
        assert!(!Flags::IGNORECASE.ascii_ignorecase());
        assert!((Flags::IGNORECASE | Flags::ASCII).ascii_ignorecase());
    }
}
