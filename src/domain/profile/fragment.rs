//! Rendering a profile into a system-prompt personalization fragment.
//!
//! The fragment is built from an ordered list of producers. Each producer
//! looks at one aspect of the profile and either contributes a line or
//! stays silent, so empty lists never leave dangling labels in the prompt.

use std::fmt;

use super::Profile;

/// Produces one optional line of the personalization fragment.
type FragmentProducer = fn(&Profile) -> Option<String>;

/// Producers in render order.
const PRODUCERS: &[FragmentProducer] = &[
    preferred_name,
    tone_directive,
    preferred_phrases,
    avoided_phrases,
    known_triggers,
    regulation_techniques,
];

const HEADER: &str = "User-specific communication preferences:";

/// Additional system-prompt text derived from a stored profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalizationFragment(String);

impl PersonalizationFragment {
    /// Renders the fragment for a profile.
    pub fn render(profile: &Profile) -> Self {
        let lines: Vec<String> = PRODUCERS
            .iter()
            .filter_map(|produce| produce(profile))
            .collect();

        Self(format!("{}\n{}", HEADER, lines.join("\n")))
    }

    /// Appends the fragment after a base system prompt.
    ///
    /// Base instructions come first so universal safety guidance always
    /// outranks user-specific styling.
    pub fn append_to(&self, base_system_prompt: &str) -> String {
        format!("{}\n\n{}", base_system_prompt.trim_end(), self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonalizationFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the final system prompt, with or without personalization.
pub fn personalize(base_system_prompt: &str, fragment: Option<&PersonalizationFragment>) -> String {
    match fragment {
        Some(fragment) => fragment.append_to(base_system_prompt),
        None => base_system_prompt.to_string(),
    }
}

fn quoted_list(items: &[String]) -> Option<String> {
    let items: Vec<String> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("\"{}\"", s))
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

fn plain_list(items: &[String]) -> Option<String> {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

fn preferred_name(profile: &Profile) -> Option<String> {
    let name = profile.preferred_name.trim();
    (!name.is_empty()).then(|| format!("- Address the user as {}.", name))
}

fn tone_directive(profile: &Profile) -> Option<String> {
    Some(format!(
        "- Tone: {}",
        profile.communication_guidelines.tone.directive()
    ))
}

fn preferred_phrases(profile: &Profile) -> Option<String> {
    quoted_list(&profile.communication_guidelines.do_phrases)
        .map(|list| format!("- Phrases that help: {}", list))
}

fn avoided_phrases(profile: &Profile) -> Option<String> {
    quoted_list(&profile.communication_guidelines.avoid_phrases)
        .map(|list| format!("- Never use these phrases: {}", list))
}

fn known_triggers(profile: &Profile) -> Option<String> {
    plain_list(&profile.crisis_signals.triggers)
        .map(|list| format!("- Known triggers to steer around: {}", list))
}

fn regulation_techniques(profile: &Profile) -> Option<String> {
    plain_list(&profile.crisis_signals.self_regulation_techniques)
        .map(|list| format!("- Prefer these self-regulation techniques: {}", list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProfileId;
    use crate::domain::profile::Tone;

    fn full_profile() -> Profile {
        Profile::new(ProfileId::new(), "Sam")
            .with_tone(Tone::Direct)
            .with_do_phrases(vec!["one step at a time".to_string()])
            .with_avoid_phrases(vec!["calm down".to_string()])
            .with_triggers(vec!["crowds".to_string(), "deadlines".to_string()])
            .with_techniques(vec!["box breathing".to_string()])
    }

    #[test]
    fn renders_every_section_in_order() {
        let fragment = PersonalizationFragment::render(&full_profile());
        let text = fragment.as_str();

        let positions: Vec<usize> = [
            "Address the user as Sam",
            "Tone:",
            "Phrases that help: \"one step at a time\"",
            "Never use these phrases: \"calm down\"",
            "Known triggers to steer around: crowds, deadlines",
            "Prefer these self-regulation techniques: box breathing",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn omits_empty_sections() {
        let profile = Profile::new(ProfileId::new(), "Sam");
        let text = PersonalizationFragment::render(&profile).to_string();

        assert!(text.contains("Tone:"));
        assert!(!text.contains("Phrases that help"));
        assert!(!text.contains("Never use these phrases"));
        assert!(!text.contains("Known triggers"));
        assert!(!text.contains("self-regulation"));
    }

    #[test]
    fn blank_entries_do_not_render_labels() {
        let profile = Profile::new(ProfileId::new(), "Sam")
            .with_do_phrases(vec!["  ".to_string()]);
        let text = PersonalizationFragment::render(&profile).to_string();
        assert!(!text.contains("Phrases that help"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let profile = full_profile();
        assert_eq!(
            PersonalizationFragment::render(&profile),
            PersonalizationFragment::render(&profile)
        );
    }

    #[test]
    fn fragment_is_appended_after_base_prompt() {
        let fragment = PersonalizationFragment::render(&full_profile());
        let prompt = personalize("BASE SAFETY RULES", Some(&fragment));

        assert!(prompt.starts_with("BASE SAFETY RULES"));
        assert!(prompt.ends_with(fragment.as_str()));
    }

    #[test]
    fn no_fragment_keeps_base_prompt() {
        assert_eq!(personalize("BASE", None), "BASE");
    }
}
