//! One-character expressions: a normalized union of inclusive character ranges.

use std::fmt;

use smallvec::SmallVec;

/// The set of characters a single-character pattern node accepts.
///
/// Ranges are kept sorted, non-overlapping and non-adjacent, so two classes accepting the
/// same characters compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CharClass {
    ranges: SmallVec<[(char, char); 4]>,
}

impl CharClass {
    /// The class accepting nothing.
    pub fn empty() -> Self {
        CharClass::default()
    }

    /// Exactly one character.
    pub fn single(ch: char) -> Self {
        CharClass::range(ch, ch)
    }

    /// The inclusive range `lo..=hi`. An inverted range is empty.
    pub fn range(lo: char, hi: char) -> Self {
        let mut class = CharClass::empty();
        if lo <= hi {
            class.ranges.push((lo, hi));
        }
        class
    }

    /// Union of several classes.
    pub fn union_all<I: IntoIterator<Item = CharClass>>(classes: I) -> Self {
        let mut ranges: SmallVec<[(char, char); 4]> = SmallVec::new();
        for class in classes {
            ranges.extend(class.ranges);
        }
        CharClass::normalize(ranges)
    }

    /// Union of `self` and `other`.
    pub fn union(&self, other: &CharClass) -> Self {
        CharClass::union_all([self.clone(), other.clone()])
    }

    /// Removes `ch`, splitting a range if needed.
    pub fn without(&self, ch: char) -> Self {
        let mut ranges = SmallVec::new();
        for &(lo, hi) in &self.ranges {
            if ch < lo || ch > hi {
                ranges.push((lo, hi));
                continue;
            }
            if let Some(before) = step_back(ch) {
                if lo <= before {
                    ranges.push((lo, before));
                }
            }
            if let Some(after) = step_forward(ch) {
                if after <= hi {
                    ranges.push((after, hi));
                }
            }
        }
        CharClass { ranges }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The normalized ranges, in ascending order.
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    fn normalize(mut ranges: SmallVec<[(char, char); 4]>) -> Self {
        ranges.retain(|(lo, hi)| lo <= hi);
        ranges.sort_unstable();
        let mut merged: SmallVec<[(char, char); 4]> = SmallVec::new();
        for (lo, hi) in ranges {
            match merged.last_mut() {
                Some(last) if step_forward(last.1).is_none_or(|next| lo <= next) => {
                    if hi > last.1 {
                        last.1 = hi;
                    }
                }
                _ => merged.push((lo, hi)),
            }
        }
        CharClass { ranges: merged }
    }
}

/// The next scalar value, skipping the surrogate gap.
pub fn step_forward(ch: char) -> Option<char> {
    match ch {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(ch as u32 + 1),
    }
}

/// The previous scalar value, skipping the surrogate gap.
pub fn step_back(ch: char) -> Option<char> {
    match ch {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        _ => char::from_u32(ch as u32 - 1),
    }
}

impl fmt::Debug for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for &(lo, hi) in &self.ranges {
            if lo == hi {
                write!(f, "{}", lo.escape_debug())?;
            } else {
                write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())?;
            }
        }
        write!(f, "]")
    }
}
