// Script statistics and synthesis cost estimate

use std::fmt;

use crate::script::DialogueScript;

/// Approximate ElevenLabs price in USD per 1000 characters
pub const COST_PER_1000_CHARS: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStats {
    pub lines: usize,
    pub characters: usize,
    pub words: usize,
    pub estimated_cost_usd: f64,
    pub estimated_duration_secs: f64,
}

impl ScriptStats {
    pub fn from_script(script: &DialogueScript, words_per_minute: u32) -> Self {
        let characters = script
            .lines()
            .iter()
            .map(|l| l.text.chars().count())
            .sum();
        let words = script
            .lines()
            .iter()
            .map(|l| l.text.split_whitespace().count())
            .sum();

        let estimated_duration_secs = if words_per_minute == 0 {
            0.0
        } else {
            words as f64 / f64::from(words_per_minute) * 60.0
        };

        Self {
            lines: script.len(),
            characters,
            words,
            estimated_cost_usd: characters as f64 / 1000.0 * COST_PER_1000_CHARS,
            estimated_duration_secs,
        }
    }
}

impl fmt::Display for ScriptStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lines: {}, Words: {}, Characters: {}, Estimated duration: ~{:.0} seconds, Estimated cost: ${:.4}",
            self.lines,
            self.words,
            self.characters,
            self.estimated_duration_secs,
            self.estimated_cost_usd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DialogueLine;

    #[test]
    fn test_stats() {
        let script = DialogueScript::new(vec![
            DialogueLine::new("Ravi", "Arre yaar"),
            DialogueLine::new("Priya", "Haan bol na, kya hua?"),
        ]);
        let stats = ScriptStats::from_script(&script, 150);

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.characters, 9 + 21);
        assert_eq!(stats.words, 7);
        assert!((stats.estimated_cost_usd - 0.009).abs() < 1e-9);
        assert!((stats.estimated_duration_secs - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_script() {
        let stats = ScriptStats::from_script(&DialogueScript::default(), 150);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.estimated_cost_usd, 0.0);
        assert_eq!(stats.estimated_duration_secs, 0.0);
    }

    #[test]
    fn test_display_includes_words_and_duration() {
        let script = DialogueScript::new(vec![
            DialogueLine::new("Ravi", "Arre yaar"),
            DialogueLine::new("Priya", "Haan bol na, kya hua?"),
        ]);
        let summary = ScriptStats::from_script(&script, 150).to_string();

        assert_eq!(
            summary,
            "Lines: 2, Words: 7, Characters: 30, Estimated duration: ~3 seconds, Estimated cost: $0.0090"
        );
    }
}
