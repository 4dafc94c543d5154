//! Rule-based sentiment scoring for short social-media text.
//!
//! Valences follow the VADER convention (-4.0..=4.0 per word) and the summed
//! valence is squashed into a compound score in [-1, 1].

use std::collections::HashMap;

use crate::models::MoodLabel;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCREMENT: f64 = 0.293;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NEGATION_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: MoodLabel,
    pub compound: f64,
}

impl Sentiment {
    pub fn from_compound(compound: f64) -> Self {
        let compound = compound.clamp(-1.0, 1.0);
        Self {
            label: label_for(compound),
            compound,
        }
    }

    pub fn neutral() -> Self {
        Self {
            label: MoodLabel::Neutral,
            compound: 0.0,
        }
    }
}

pub fn label_for(compound: f64) -> MoodLabel {
    if compound >= POSITIVE_THRESHOLD {
        MoodLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        MoodLabel::Negative
    } else {
        MoodLabel::Neutral
    }
}

/// Anything that can turn free text into a label and compound score.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> Sentiment;
}

pub struct LexiconScorer {
    valences: HashMap<String, f64>,
    negations: Vec<&'static str>,
    boosters: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        let entries: &[(&str, f64)] = &[
            // positive
            ("love", 3.2),
            ("loved", 2.9),
            ("loving", 2.9),
            ("lovely", 2.8),
            ("happy", 2.7),
            ("happiest", 3.2),
            ("great", 3.1),
            ("amazing", 2.8),
            ("awesome", 3.1),
            ("beautiful", 2.9),
            ("best", 3.2),
            ("good", 1.9),
            ("nice", 1.8),
            ("fun", 2.3),
            ("excited", 1.4),
            ("exciting", 2.2),
            ("enjoy", 2.2),
            ("enjoyed", 2.3),
            ("glad", 2.0),
            ("grateful", 2.0),
            ("thanks", 1.9),
            ("thank", 1.5),
            ("cute", 2.0),
            ("cool", 1.3),
            ("proud", 2.1),
            ("win", 2.8),
            ("wonderful", 2.7),
            ("yay", 2.4),
            ("lol", 1.8),
            ("haha", 2.0),
            ("perfect", 2.7),
            ("inspiring", 2.3),
            ("relaxing", 1.7),
            ("delicious", 2.7),
            ("congrats", 2.4),
            ("like", 1.5),
            ("free", 1.9),
            ("friend", 2.2),
            ("friends", 2.1),
            ("smile", 1.5),
            // negative
            ("sad", -2.1),
            ("hate", -2.7),
            ("hated", -3.2),
            ("angry", -2.3),
            ("annoyed", -1.6),
            ("annoying", -1.7),
            ("bad", -2.5),
            ("worst", -3.1),
            ("awful", -2.0),
            ("terrible", -2.1),
            ("horrible", -2.5),
            ("tired", -1.9),
            ("lonely", -1.5),
            ("alone", -1.0),
            ("cry", -2.1),
            ("crying", -2.1),
            ("upset", -1.6),
            ("stressed", -1.4),
            ("stress", -1.8),
            ("anxious", -1.0),
            ("worried", -1.2),
            ("miss", -0.6),
            ("boring", -1.3),
            ("bored", -1.1),
            ("ugh", -1.8),
            ("hurt", -2.4),
            ("pain", -2.3),
            ("fail", -2.5),
            ("failed", -2.3),
            ("sorry", -0.3),
            ("sick", -1.7),
            ("broke", -1.8),
            ("scam", -2.4),
            ("disappointed", -1.9),
            ("depressed", -2.3),
            ("worse", -2.1),
            ("wrong", -2.1),
            ("mad", -2.2),
            ("fear", -2.2),
            ("ruined", -2.8),
        ];

        let boosters: &[(&str, f64)] = &[
            ("very", BOOSTER_INCREMENT),
            ("really", BOOSTER_INCREMENT),
            ("so", BOOSTER_INCREMENT),
            ("extremely", BOOSTER_INCREMENT),
            ("totally", BOOSTER_INCREMENT),
            ("absolutely", BOOSTER_INCREMENT),
            ("super", BOOSTER_INCREMENT),
            ("incredibly", BOOSTER_INCREMENT),
            ("barely", -BOOSTER_INCREMENT),
            ("slightly", -BOOSTER_INCREMENT),
            ("somewhat", -BOOSTER_INCREMENT),
            ("kinda", -BOOSTER_INCREMENT),
        ];

        Self {
            valences: entries
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
            negations: vec![
                "not", "no", "never", "nothing", "nobody", "none", "cannot", "cant", "can't",
                "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "isnt", "isn't",
                "wasnt", "wasn't", "wont", "won't", "aint", "ain't", "without",
            ],
            boosters: boosters
                .iter()
                .map(|(word, delta)| (word.to_string(), *delta))
                .collect(),
        }
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|negation| *negation == word)
    }

    /// Summed word valence before normalization.
    fn raw_valence(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|token| !token.is_empty())
            .collect();
        let lowered: Vec<String> = tokens.iter().map(|token| token.to_lowercase()).collect();

        // Emphasis through capitals only counts when the text is not shouting throughout.
        let caps_differential = {
            let upper = tokens.iter().filter(|token| is_all_caps(token)).count();
            upper > 0 && upper < tokens.len()
        };

        let mut total: f64 = 0.0;
        for (index, word) in lowered.iter().enumerate() {
            let Some(&base) = self.valences.get(word) else {
                continue;
            };

            let mut valence = base;
            if caps_differential && is_all_caps(tokens[index]) {
                valence += CAPS_INCREMENT * base.signum();
            }

            let window_start = index.saturating_sub(NEGATION_WINDOW);
            for (distance, previous) in lowered[window_start..index].iter().rev().enumerate() {
                if let Some(&delta) = self.boosters.get(previous) {
                    let damping = match distance {
                        0 => 1.0,
                        1 => 0.95,
                        _ => 0.9,
                    };
                    valence += delta * damping * base.signum();
                }
            }

            if lowered[window_start..index]
                .iter()
                .any(|previous| self.is_negation(previous))
            {
                valence *= NEGATION_SCALAR;
            }

            total += valence;
        }

        if total != 0.0 {
            let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
            total += exclamations as f64 * EXCLAMATION_INCREMENT * total.signum();
        }

        total
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Sentiment {
        let valence = self.raw_valence(text);
        if valence == 0.0 {
            return Sentiment::neutral();
        }
        let compound = valence / (valence * valence + NORMALIZATION_ALPHA).sqrt();
        Sentiment::from_compound(compound)
    }
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_neutral() {
        let scorer = LexiconScorer::new();
        let sentiment = scorer.score("");
        assert_eq!(sentiment.label, MoodLabel::Neutral);
        assert_eq!(sentiment.compound, 0.0);
    }

    #[test]
    fn positive_and_negative_text() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("I love this beach").label, MoodLabel::Positive);
        assert_eq!(scorer.score("worst day ever, so tired").label, MoodLabel::Negative);
    }

    #[test]
    fn negation_flips_polarity() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("this is good");
        let negated = scorer.score("this is not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn boosters_and_exclamations_intensify() {
        let scorer = LexiconScorer::new();
        let base = scorer.score("happy");
        let boosted = scorer.score("very happy");
        let shouted = scorer.score("happy!!!");
        assert!(boosted.compound > base.compound);
        assert!(shouted.compound > base.compound);
    }

    #[test]
    fn compound_stays_in_range() {
        let scorer = LexiconScorer::new();
        let text = "love love love amazing awesome best great perfect!!!!";
        let sentiment = scorer.score(text);
        assert!(sentiment.compound <= 1.0 && sentiment.compound > 0.9);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(label_for(0.05), MoodLabel::Positive);
        assert_eq!(label_for(0.049), MoodLabel::Neutral);
        assert_eq!(label_for(-0.05), MoodLabel::Negative);
        assert_eq!(label_for(-0.049), MoodLabel::Neutral);
    }
}
