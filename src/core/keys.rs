//! Key-name normalization and per-platform shortcut bindings
//!
//! Agents speak a platform-neutral key vocabulary ("ControlOrMeta", "ArrowLeft",
//! "Escape", ...). Input backends expect short canonical tokens ("ctrl",
//! "left", "esc", ...). Everything platform-specific lives in [`KeyBindings`].

/// Platform family, as far as keyboard shortcuts are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    pub fn bindings(self) -> &'static KeyBindings {
        match self {
            Platform::MacOs => &MACOS_BINDINGS,
            Platform::Other => &DEFAULT_BINDINGS,
        }
    }
}

/// Platform-specific shortcuts, in canonical key tokens
#[derive(Debug, PartialEq, Eq)]
pub struct KeyBindings {
    /// Token for "ControlOrMeta"
    pub primary_modifier: &'static str,
    pub focus_address_bar: &'static [&'static str],
    pub history_back: &'static [&'static str],
    pub history_forward: &'static [&'static str],
    pub select_all: &'static [&'static str],
    /// OS application launcher (Spotlight), if the platform has one that grabs focus
    pub app_launcher: Option<&'static [&'static str]>,
}

impl KeyBindings {
    /// Whether `keys` (already normalized) opens the OS application launcher
    pub fn is_app_launcher<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        self.app_launcher.is_some_and(|launcher| {
            launcher.len() == keys.len()
                && launcher.iter().zip(keys).all(|(a, b)| *a == b.as_ref())
        })
    }
}

pub static MACOS_BINDINGS: KeyBindings = KeyBindings {
    primary_modifier: "command",
    focus_address_bar: &["command", "l"],
    history_back: &["command", "["],
    history_forward: &["command", "]"],
    select_all: &["command", "a"],
    app_launcher: Some(&["command", "space"]),
};

pub static DEFAULT_BINDINGS: KeyBindings = KeyBindings {
    primary_modifier: "ctrl",
    focus_address_bar: &["ctrl", "l"],
    history_back: &["alt", "left"],
    history_forward: &["alt", "right"],
    select_all: &["ctrl", "a"],
    app_launcher: None,
};

/// Alias -> canonical token, for every platform-independent key
static KEY_ALIASES: &[(&str, &str)] = &[
    ("control", "ctrl"),
    ("ctrl", "ctrl"),
    ("alt", "alt"),
    ("option", "alt"),
    ("return", "enter"),
    ("enter", "enter"),
    ("escape", "esc"),
    ("esc", "esc"),
    ("space", "space"),
    ("spacebar", "space"),
    ("pageup", "pageup"),
    ("page_up", "pageup"),
    ("pagedown", "pagedown"),
    ("page_down", "pagedown"),
    ("arrowleft", "left"),
    ("left", "left"),
    ("arrowright", "right"),
    ("right", "right"),
    ("arrowup", "up"),
    ("up", "up"),
    ("arrowdown", "down"),
    ("down", "down"),
    ("delete", "delete"),
    ("backspace", "backspace"),
];

/// Map a key name to the canonical token the input backend understands
///
/// Matching is case-insensitive and ignores surrounding whitespace. Unknown
/// names (single characters, function keys, ...) pass through lowercased.
pub fn normalize_key(key: &str, bindings: &KeyBindings) -> String {
    let key = key.trim().to_lowercase();

    match key.as_str() {
        "controlormeta" | "meta" | "command" => bindings.primary_modifier.to_string(),
        name => KEY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other(key: &str) -> String {
        normalize_key(key, &DEFAULT_BINDINGS)
    }

    fn mac(key: &str) -> String {
        normalize_key(key, &MACOS_BINDINGS)
    }

    #[test]
    fn test_primary_modifier_per_platform() {
        for alias in ["ControlOrMeta", "meta", "COMMAND"] {
            assert_eq!(mac(alias), "command");
            assert_eq!(other(alias), "ctrl");
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(other("Control"), "ctrl");
        assert_eq!(other("Option"), "alt");
        assert_eq!(other("Return"), "enter");
        assert_eq!(other("Escape"), "esc");
        assert_eq!(other("Spacebar"), "space");
        assert_eq!(other("Page_Up"), "pageup");
        assert_eq!(other("PageDown"), "pagedown");
        assert_eq!(other("ArrowLeft"), "left");
        assert_eq!(other("ArrowRight"), "right");
        assert_eq!(other("ArrowUp"), "up");
        assert_eq!(other("ArrowDown"), "down");
        assert_eq!(other("Delete"), "delete");
        assert_eq!(other("BackSpace"), "backspace");
    }

    #[test]
    fn test_passthrough_is_lowercased() {
        assert_eq!(other("A"), "a");
        assert_eq!(other("F5"), "f5");
        assert_eq!(other("  Tab "), "tab");
        assert_eq!(other("unknownkey123"), "unknownkey123");
    }

    #[test]
    fn test_app_launcher_only_on_macos() {
        assert!(MACOS_BINDINGS.is_app_launcher(&["command", "space"]));
        assert!(!MACOS_BINDINGS.is_app_launcher(&["command"]));
        assert!(!MACOS_BINDINGS.is_app_launcher(&["space", "command"]));
        assert!(!DEFAULT_BINDINGS.is_app_launcher(&["ctrl", "space"]));
    }

    #[test]
    fn test_platform_bindings() {
        assert_eq!(Platform::MacOs.bindings().history_back, &["command", "["]);
        assert_eq!(Platform::Other.bindings().history_forward, &["alt", "right"]);
        assert_eq!(Platform::Other.bindings().focus_address_bar, &["ctrl", "l"]);
    }
}
