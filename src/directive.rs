//! Directive catalog and selection rules
//!
//! A directive is a single named transformation instruction ("fix typos",
//! "use a professional tone", "translate to English"). Directives either
//! stand alone or belong to a single-select group where activating one
//! deactivates its siblings.

use tracing::{debug, warn};

use crate::store::DirectiveSelection;

/// Single-select groups within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveGroup {
    /// Writing tone (professional vs. friendly)
    Tone,
    /// Target language
    Translation,
}

/// One selectable transformation directive
#[derive(Debug, Clone)]
pub struct DirectiveOption {
    /// Stable key, unique within the catalog
    pub key: &'static str,
    /// Human-readable label for display
    pub label: &'static str,
    /// Natural-language instruction sent to the correction service
    pub instruction_text: &'static str,
    /// Whether this directive is currently selected
    pub active: bool,
    /// Single-select group membership, if any
    pub group: Option<DirectiveGroup>,
}

/// The directive catalog with its current selection state
///
/// Options are created once from the built-in catalog and never destroyed
/// during a session; only their `active` flags change.
#[derive(Debug, Clone)]
pub struct DirectiveSet {
    options: Vec<DirectiveOption>,
}

impl Default for DirectiveSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DirectiveSet {
    /// Build the built-in catalog with default selections
    pub fn builtin() -> Self {
        Self {
            options: vec![
                DirectiveOption {
                    key: "fix",
                    label: "Oprava preklepov",
                    instruction_text: "Oprav preklepy a diakritiku.",
                    active: true,
                    group: None,
                },
                DirectiveOption {
                    key: "professional",
                    label: "Profesionálny",
                    instruction_text: "Použi neutrálny, formálny a profesionálny štýl.",
                    active: false,
                    group: Some(DirectiveGroup::Tone),
                },
                DirectiveOption {
                    key: "friendly",
                    label: "Priateľský",
                    instruction_text: "Použi priateľský, hovorový tón.",
                    active: true,
                    group: Some(DirectiveGroup::Tone),
                },
                DirectiveOption {
                    key: "toen",
                    label: "Prelož do angličtiny",
                    instruction_text: "Prelož do angličtiny.",
                    active: false,
                    group: Some(DirectiveGroup::Translation),
                },
                DirectiveOption {
                    key: "tosk",
                    label: "Prelož do slovenčiny",
                    instruction_text: "Prelož do slovenčiny.",
                    active: false,
                    group: Some(DirectiveGroup::Translation),
                },
            ],
        }
    }

    /// All options in stable catalog order
    pub fn list_options(&self) -> &[DirectiveOption] {
        &self.options
    }

    /// Whether the option with the given key is currently active
    pub fn is_active(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key && o.active)
    }

    /// Flip one option's selection state
    ///
    /// Activating an option that belongs to a single-select group deactivates
    /// every sibling in that group atomically. An unknown key is a logged
    /// no-op: the persisted selection state and the catalog may drift across
    /// releases, and that must never fail a restore.
    pub fn set_active(&mut self, key: &str, active: bool) {
        let Some(idx) = self.options.iter().position(|o| o.key == key) else {
            warn!(%key, "set_active: unknown directive key, ignoring");
            return;
        };

        if active && let Some(group) = self.options[idx].group {
            for option in self.options.iter_mut().filter(|o| o.group == Some(group)) {
                option.active = false;
            }
        }

        self.options[idx].active = active;
        debug!(%key, active, "set_active: selection changed");
    }

    /// Instruction texts of every active option, in catalog order
    pub fn active_descriptions(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.active)
            .map(|o| o.instruction_text.to_string())
            .collect()
    }

    /// Current selection state for persistence
    pub fn selection_snapshot(&self) -> Vec<DirectiveSelection> {
        self.options
            .iter()
            .map(|o| DirectiveSelection {
                key: o.key.to_string(),
                active: o.active,
            })
            .collect()
    }

    /// Apply persisted selections onto the catalog
    ///
    /// Keys that no longer exist are ignored; options absent from the saved
    /// state keep their defaults. Each entry goes through [`set_active`], so
    /// a legacy snapshot with several options checked in one single-select
    /// group restores with only the last of them active - the group
    /// invariant holds even for saved state this build never wrote.
    pub fn apply_selections(&mut self, selections: &[DirectiveSelection]) {
        for saved in selections {
            self.set_active(&saved.key, saved.active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_stable() {
        let set = DirectiveSet::builtin();
        let keys: Vec<_> = set.list_options().iter().map(|o| o.key).collect();
        assert_eq!(keys, vec!["fix", "professional", "friendly", "toen", "tosk"]);
    }

    #[test]
    fn test_single_select_group_has_at_most_one_active() {
        let mut set = DirectiveSet::builtin();

        // friendly is active by default; activating professional must displace it
        set.set_active("professional", true);

        assert!(set.is_active("professional"));
        assert!(!set.is_active("friendly"));

        let tone_active = set
            .list_options()
            .iter()
            .filter(|o| o.group == Some(DirectiveGroup::Tone) && o.active)
            .count();
        assert_eq!(tone_active, 1);
    }

    #[test]
    fn test_independent_option_toggles_freely() {
        let mut set = DirectiveSet::builtin();

        set.set_active("fix", false);
        assert!(!set.is_active("fix"));

        set.set_active("fix", true);
        assert!(set.is_active("fix"));
        // toggling fix leaves the tone group alone
        assert!(set.is_active("friendly"));
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut set = DirectiveSet::builtin();
        let before: Vec<_> = set.list_options().iter().map(|o| o.active).collect();

        set.set_active("no-such-directive", true);

        let after: Vec<_> = set.list_options().iter().map(|o| o.active).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_active_descriptions_follow_catalog_order() {
        let mut set = DirectiveSet::builtin();
        set.set_active("tosk", true);

        let descriptions = set.active_descriptions();
        assert_eq!(
            descriptions,
            vec![
                "Oprav preklepy a diakritiku.".to_string(),
                "Použi priateľský, hovorový tón.".to_string(),
                "Prelož do slovenčiny.".to_string(),
            ]
        );
    }

    #[test]
    fn test_apply_selections_ignores_unknown_keys() {
        let mut set = DirectiveSet::builtin();
        let before: Vec<_> = set.list_options().iter().map(|o| o.active).collect();

        set.apply_selections(&[DirectiveSelection {
            key: "unknown-key".to_string(),
            active: true,
        }]);

        let after: Vec<_> = set.list_options().iter().map(|o| o.active).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_apply_selections_normalizes_single_select_groups() {
        let mut set = DirectiveSet::builtin();

        // A hand-edited or pre-grouping snapshot can carry both tone options
        // checked; the restore must still leave exactly one active.
        set.apply_selections(&[
            DirectiveSelection {
                key: "professional".to_string(),
                active: true,
            },
            DirectiveSelection {
                key: "friendly".to_string(),
                active: true,
            },
        ]);

        assert!(!set.is_active("professional"));
        assert!(set.is_active("friendly"));
        let tone_active = set
            .list_options()
            .iter()
            .filter(|o| o.group == Some(DirectiveGroup::Tone) && o.active)
            .count();
        assert_eq!(tone_active, 1);
    }

    #[test]
    fn test_apply_selections_restores_known_keys() {
        let mut set = DirectiveSet::builtin();
        set.apply_selections(&[
            DirectiveSelection {
                key: "fix".to_string(),
                active: false,
            },
            DirectiveSelection {
                key: "toen".to_string(),
                active: true,
            },
        ]);

        assert!(!set.is_active("fix"));
        assert!(set.is_active("toen"));
    }
}
