use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;

/// Single key bindings written the vim way: `q`, `G`, `<c-c>`, `<a-x>`, `<space>`, `<f1>`.
#[derive(Default)]
pub struct Keymap {
    bindings: HashMap<(KeyCode, KeyModifiers), &'static str>,
}

impl Keymap {
    pub fn bind(mut self, binding: &str, action: &'static str) -> Self {
        match parse_binding(binding) {
            Some(key) => {
                if let Some(old) = self.bindings.insert(key, action) {
                    error!("Binding {} rebound from '{}' to '{}'", binding, old, action);
                }
            }
            None => error!("Cannot parse key binding '{}'", binding),
        }
        self
    }

    pub fn action(&self, key: &KeyEvent) -> Option<&'static str> {
        let mut modifiers = key.modifiers;
        // the case of the character already tells about shift
        if let KeyCode::Char(_) = key.code {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        self.bindings.get(&(key.code, modifiers)).copied()
    }
}

fn parse_binding(binding: &str) -> Option<(KeyCode, KeyModifiers)> {
    let Some(inner) = binding.strip_prefix('<').and_then(|b| b.strip_suffix('>')) else {
        return single_char(binding).map(|c| (KeyCode::Char(c), KeyModifiers::NONE));
    };
    let lower = inner.to_ascii_lowercase();
    let named = match lower.as_str() {
        "space" => Some(KeyCode::Char(' ')),
        "enter" | "cr" => Some(KeyCode::Enter),
        "esc" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "lt" => Some(KeyCode::Char('<')),
        _ => None,
    };
    if let Some(code) = named {
        return Some((code, KeyModifiers::NONE));
    }
    if let Some(digits) = lower.strip_prefix('f') {
        if let Ok(n) = digits.parse::<u8>() {
            return Some((KeyCode::F(n), KeyModifiers::NONE));
        }
    }
    let (modifiers, key) = match lower.get(..2) {
        Some("c-") => (KeyModifiers::CONTROL, &inner[2..]),
        Some("a-") => (KeyModifiers::ALT, &inner[2..]),
        _ => return None,
    };
    single_char(key).map(|c| (KeyCode::Char(c), modifiers))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{parse_binding, Keymap};

    macro_rules! key {
        ($k:expr) => {
            KeyEvent::new(KeyCode::Char($k), KeyModifiers::NONE)
        };
    }

    #[test]
    fn parse() {
        assert_eq!(parse_binding("a"), Some((KeyCode::Char('a'), KeyModifiers::NONE)));
        assert_eq!(parse_binding("<c-c>"), Some((KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(parse_binding("<C-d>"), Some((KeyCode::Char('d'), KeyModifiers::CONTROL)));
        assert_eq!(parse_binding("<a-x>"), Some((KeyCode::Char('x'), KeyModifiers::ALT)));
        assert_eq!(parse_binding("<space>"), Some((KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(parse_binding("<f11>"), Some((KeyCode::F(11), KeyModifiers::NONE)));
        assert_eq!(parse_binding("<"), Some((KeyCode::Char('<'), KeyModifiers::NONE)));
        assert_eq!(parse_binding("gg"), None);
        assert_eq!(parse_binding("<x-y>"), None);
        assert_eq!(parse_binding(""), None);
    }

    #[test]
    fn lookup() {
        let keymap = Keymap::default()
            .bind("q", "quit")
            .bind("<c-c>", "quit")
            .bind("G", "bottom")
            .bind("not a key", "ignored");
        assert_eq!(keymap.action(&key!('q')), Some("quit"));
        assert_eq!(
            keymap.action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some("quit")
        );
        assert_eq!(keymap.action(&key!('c')), None);
        assert_eq!(
            keymap.action(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some("bottom")
        );
        assert_eq!(keymap.action(&key!('g')), None);
    }
}
