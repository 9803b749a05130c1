use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

use crate::variant::Variant;

/// Key caps drawn under the game so the user sees the shortcut being pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCap {
    Modifier,
    C,
    V,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyIndicators {
    modifier: bool,
    c: bool,
    v: bool,
}

impl KeyIndicators {
    pub fn press(&mut self, cap: KeyCap) {
        *self.slot(cap) = true;
    }

    pub fn release(&mut self, cap: KeyCap) {
        *self.slot(cap) = false;
    }

    pub fn is_pressed(&self, cap: KeyCap) -> bool {
        match cap {
            KeyCap::Modifier => self.modifier,
            KeyCap::C => self.c,
            KeyCap::V => self.v,
        }
    }

    pub fn any_pressed(&self) -> bool {
        self.modifier || self.c || self.v
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, cap: KeyCap) -> &mut bool {
        match cap {
            KeyCap::Modifier => &mut self.modifier,
            KeyCap::C => &mut self.c,
            KeyCap::V => &mut self.v,
        }
    }
}

/// Clipboard activity in the current round. Tracked, never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastAction {
    pub copied: bool,
    pub pasted: bool,
    pub used_cmd: bool,
}

/// The modifier a variant's shortcuts are taught with
pub fn shortcut_modifier(variant: Variant) -> KeyModifiers {
    match variant {
        Variant::Mac => KeyModifiers::SUPER,
        Variant::Windows | Variant::Selection => KeyModifiers::CONTROL,
    }
}

/// Whether a key event is a copy/paste/select-all style shortcut.
///
/// Terminals only report ⌘ with the keyboard enhancement protocol, so
/// Ctrl is accepted for every variant.
pub fn is_shortcut(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

/// The cap a key code itself stands for, ignoring held modifiers
pub fn cap_for_code(variant: Variant, code: KeyCode) -> Option<KeyCap> {
    match code {
        KeyCode::Modifier(m) => {
            let is_variant_modifier = match variant {
                Variant::Mac => matches!(
                    m,
                    ModifierKeyCode::LeftSuper
                        | ModifierKeyCode::RightSuper
                        | ModifierKeyCode::LeftMeta
                        | ModifierKeyCode::RightMeta
                ),
                Variant::Windows | Variant::Selection => matches!(
                    m,
                    ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl
                ),
            };
            is_variant_modifier.then_some(KeyCap::Modifier)
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'c' => Some(KeyCap::C),
            'v' => Some(KeyCap::V),
            _ => None,
        },
        _ => None,
    }
}

/// The character a key event types into the field.
///
/// With alternate-key reporting the terminal sends the shifted character
/// itself; without it a letter arrives in lower case with SHIFT held.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Some(c.to_uppercase().next().unwrap_or(c))
        }
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

/// Caps that light up for `key` in `variant`
pub fn caps_for(variant: Variant, key: &KeyEvent) -> Vec<KeyCap> {
    let own = cap_for_code(variant, key.code);
    let mut caps = Vec::new();

    if own == Some(KeyCap::Modifier) || key.modifiers.contains(shortcut_modifier(variant)) {
        caps.push(KeyCap::Modifier);
    }
    if let Some(cap @ (KeyCap::C | KeyCap::V)) = own {
        caps.push(cap);
    }

    caps
}
