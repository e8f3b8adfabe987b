//! Undo/redo chord detection.

use smol_str::SmolStr;

/// A key press: the `key` value plus modifier state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: SmolStr,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// `mod+<key>` with exactly the given shift state: `mod` is Cmd on Apple
    /// platforms and Ctrl elsewhere, and no other modifier may be held.
    fn is_mod(&self, key: &str, shift: bool, apple: bool) -> bool {
        let (mod_key, other) = if apple {
            (self.meta, self.ctrl)
        } else {
            (self.ctrl, self.meta)
        };
        mod_key && !other && !self.alt && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// `mod+z`.
pub fn is_undo(chord: &KeyChord, apple: bool) -> bool {
    chord.is_mod("z", false, apple)
}

/// `mod+shift+z`, or `mod+y` off Apple platforms.
pub fn is_redo(chord: &KeyChord, apple: bool) -> bool {
    chord.is_mod("z", true, apple) || (!apple && chord.is_mod("y", false, apple))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo() {
        assert!(is_undo(&KeyChord::new("z").ctrl(), false));
        assert!(is_undo(&KeyChord::new("z").meta(), true));
        assert!(!is_undo(&KeyChord::new("z").ctrl(), true));
        assert!(!is_undo(&KeyChord::new("z").ctrl().alt(), false));
        assert!(!is_undo(&KeyChord::new("Z").ctrl().shift(), false));
    }

    #[test]
    fn test_redo() {
        assert!(is_redo(&KeyChord::new("Z").ctrl().shift(), false));
        assert!(is_redo(&KeyChord::new("z").meta().shift(), true));
        assert!(is_redo(&KeyChord::new("y").ctrl(), false));
        assert!(!is_redo(&KeyChord::new("y").meta(), true));
        assert!(!is_redo(&KeyChord::new("z").ctrl(), false));
    }
}
