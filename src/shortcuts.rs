//! ショートカット設定の管理。

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ショートカット設定の全体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortcuts {
    pub form: FormShortcuts,
    pub input_box: InputBoxShortcuts,
}

/// フォーム画面のショートカット。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormShortcuts {
    pub quit: Vec<String>,
    pub submit: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub toggle: Vec<String>,
    pub activate: Vec<String>,
}

/// InputBoxのショートカット。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBoxShortcuts {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub backspace: Vec<String>,
    pub delete: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub home: Vec<String>,
    pub end: Vec<String>,
    pub clear_line: Vec<String>,
}

impl Shortcuts {
    /// TOMLから読み込み、無ければデフォルトを返す。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        // 既存ファイルを読み込んでパースする。
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            form: FormShortcuts {
                quit: keys(&["q"]),
                submit: keys(&["Ctrl+s"]),
                next: keys(&["Down", "Tab", "j"]),
                prev: keys(&["Up", "k"]),
                toggle: keys(&["Space"]),
                activate: keys(&["Enter"]),
            },
            input_box: InputBoxShortcuts {
                confirm: keys(&["Enter"]),
                cancel: keys(&["Esc"]),
                backspace: keys(&["Backspace"]),
                delete: keys(&["Delete"]),
                left: keys(&["Left"]),
                right: keys(&["Right"]),
                home: keys(&["Home"]),
                end: keys(&["End"]),
                clear_line: keys(&["Ctrl+u"]),
            },
        }
    }
}

/// KeyEventがいずれかのショートカット文字列と一致するか判定する。
pub fn matches_shortcut(key: &KeyEvent, shortcuts: &[String]) -> bool {
    shortcuts
        .iter()
        .filter_map(|s| parse_shortcut(s))
        .any(|(mods, code)| key.modifiers == mods && key.code == code)
}

/// "Ctrl+u" や "Enter" のような表記を修飾キーとキーコードへ変換する。
fn parse_shortcut(shortcut: &str) -> Option<(KeyModifiers, KeyCode)> {
    // 最後の要素がキー本体、それより前が修飾キー。
    let (mods_str, key_str) = match shortcut.rsplit_once('+') {
        Some((m, k)) if !k.is_empty() => (m, k),
        _ => ("", shortcut),
    };

    let mut mods = KeyModifiers::empty();
    for m in mods_str.split('+').filter(|m| !m.is_empty()) {
        mods |= match m.to_ascii_lowercase().as_str() {
            "ctrl" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let code = match key_str.to_ascii_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        // 単一文字は大文字小文字を区別して Char として扱う。
        _ => {
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

/// ショートカットの表示用文字列。
pub fn format_keys(keys: &[String]) -> String {
    keys.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_matches_shortcut_simple_char() {
        // 単一文字の一致判定を検証する。
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty());
        assert!(matches_shortcut(&key, &keys(&["q"])));
        assert!(!matches_shortcut(&key, &keys(&["w"])));
    }

    #[test]
    fn test_matches_shortcut_with_modifier() {
        // 修飾キー付きの一致判定を検証する。
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(matches_shortcut(&key, &keys(&["Ctrl+s"])));
        assert!(matches_shortcut(&key, &keys(&["ctrl+s"])));
        assert!(!matches_shortcut(&key, &keys(&["s"])));
    }

    #[test]
    fn test_matches_shortcut_space_and_plus() {
        // Space と "+" そのものの判定を検証する。
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty());
        assert!(matches_shortcut(&space, &keys(&["Space"])));
        let plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::empty());
        assert!(matches_shortcut(&plus, &keys(&["+"])));
    }

    #[test]
    fn test_matches_shortcut_multiple_keys() {
        // 複数キーバインドの一致判定を検証する。
        let bindings = keys(&["Down", "j"]);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::empty());
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty());
        let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::empty());
        assert!(matches_shortcut(&down, &bindings));
        assert!(matches_shortcut(&j, &bindings));
        assert!(!matches_shortcut(&k, &bindings));
    }

    #[test]
    fn test_unknown_modifier_never_matches() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty());
        assert!(!matches_shortcut(&key, &keys(&["Hyper+x"])));
    }
}
