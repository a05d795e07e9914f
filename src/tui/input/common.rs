use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::text_input::TextInput;

/// Line-editing keys shared by every text field. Returns false when the key
/// is not an editing key.
pub(super) fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (_, KeyCode::Backspace) if key.modifiers.contains(KeyModifiers::ALT) => input.delete_word(),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => input.delete_word(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => input.clear(),
        (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => input.home(),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => input.end(),
        (_, KeyCode::Backspace) => input.backspace(),
        (_, KeyCode::Delete) => input.delete(),
        (_, KeyCode::Left) => input.left(),
        (_, KeyCode::Right) => input.right(),
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            input.insert(c)
        }
        _ => return false,
    }
    true
}

/// Map a base key to its US-layout shifted symbol.
/// Returns None if the key is not a shiftable symbol (or is already shifted).
pub(super) fn shift_symbol(c: char) -> Option<char> {
    match c {
        '`' => Some('~'),
        '1' => Some('!'),
        '2' => Some('@'),
        '3' => Some('#'),
        '4' => Some('$'),
        '5' => Some('%'),
        '6' => Some('^'),
        '7' => Some('&'),
        '8' => Some('*'),
        '9' => Some('('),
        '0' => Some(')'),
        '-' => Some('_'),
        '=' => Some('+'),
        '[' => Some('{'),
        ']' => Some('}'),
        '\\' => Some('|'),
        ';' => Some(':'),
        '\'' => Some('"'),
        ',' => Some('<'),
        '.' => Some('>'),
        '/' => Some('?'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty protocol sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE) + SHIFT`,
/// and `Char(base_symbol) + SHIFT` instead of `Char(shifted_symbol)`.
///
/// For traditional terminals (e.g. Warp) this is a no-op:
/// - Already-uppercase letters: `'P'.is_ascii_lowercase()` = false → skip
/// - Already-shifted symbols: `shift_symbol('>')` = None → skip
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            // Shift+p → Char('P') with SHIFT preserved
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            // Shift+. → Char('>') with SHIFT removed
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}
