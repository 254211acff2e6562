//! # Question Bank Module
//!
//! Holds the fixed list of reflective questions the bot asks. The list is
//! built once at startup and never mutated afterwards.

use rand::Rng;

use crate::errors::ConfigError;

/// Questions asked by default, in display order.
///
/// From "10 powerful questions to ask yourself every day" (The Ascent).
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "Who do you want to be?",
    "What are you grateful for?",
    "What will you do about the things that matter most?",
    "Which reality can you accept instead of fighting against it?",
    "How can you make someone smile?",
    "Are you a little better than yesterday?",
    "Have you protected your planet?",
    "Have you made healthier choices?",
    "Have you expressed your love for your family and friends?",
];

/// Immutable, non-empty list of questions
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<String>,
    fingerprint: u32,
}

impl QuestionBank {
    /// Build a bank from the given questions.
    ///
    /// Fails with [`ConfigError::EmptyQuestionBank`] when the list is empty.
    pub fn new<I, S>(questions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<String> = questions.into_iter().map(Into::into).collect();
        if questions.is_empty() {
            return Err(ConfigError::EmptyQuestionBank);
        }

        let fingerprint = fingerprint_questions(&questions);
        Ok(Self {
            questions,
            fingerprint,
        })
    }

    /// Pick a uniformly random question using the thread-local generator
    pub fn pick_random(&self) -> &str {
        self.pick_random_with(&mut rand::thread_rng())
    }

    /// Pick a uniformly random question using the supplied generator
    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // non-empty by construction
        let index = rng.gen_range(0..self.questions.len());
        &self.questions[index]
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    /// Position of `question` in the bank, if present
    pub fn index_of(&self, question: &str) -> Option<usize> {
        self.questions.iter().position(|q| q == question)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }

    /// Stable 32-bit hash of the question list.
    ///
    /// Two banks with the same questions in the same order share a
    /// fingerprint across processes and deployments.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        let questions: Vec<String> = DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect();
        let fingerprint = fingerprint_questions(&questions);
        Self {
            questions,
            fingerprint,
        }
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a over every question, each preceded by its byte length
fn fingerprint_questions(questions: &[String]) -> u32 {
    questions.iter().fold(FNV_OFFSET_BASIS, |hash, question| {
        let length = (question.len() as u64).to_le_bytes();
        length
            .iter()
            .chain(question.as_bytes())
            .fold(hash, |hash, byte| {
                (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_empty_bank_rejected() {
        let result = QuestionBank::new(Vec::<String>::new());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyQuestionBank);
    }

    #[test]
    fn test_default_bank_matches_default_questions() {
        let bank = QuestionBank::default();
        assert_eq!(bank.len(), DEFAULT_QUESTIONS.len());
        assert_eq!(bank.get(1), Some("What are you grateful for?"));
        assert_eq!(bank.index_of("Who do you want to be?"), Some(0));
        assert_eq!(bank.index_of("Not a question"), None);
        assert!(!bank.is_empty());
    }

    #[test]
    fn test_pick_random_stays_in_range_and_varies() {
        let bank = QuestionBank::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let question = bank.pick_random_with(&mut rng);
            assert!(bank.index_of(question).is_some());
            seen.insert(question.to_string());
        }

        assert!(seen.len() > 1, "expected more than one distinct question");
    }

    #[test]
    fn test_single_question_bank_always_returns_it() {
        let bank = QuestionBank::new(["Only one?"]).unwrap();
        for _ in 0..20 {
            assert_eq!(bank.pick_random(), "Only one?");
        }
    }

    #[test]
    fn test_fingerprint_depends_on_content_and_order() {
        let a = QuestionBank::new(["A?", "B?"]).unwrap();
        let same = QuestionBank::new(["A?", "B?"]).unwrap();
        let reordered = QuestionBank::new(["B?", "A?"]).unwrap();
        let joined = QuestionBank::new(["A?\nB?"]).unwrap();

        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), reordered.fingerprint());
        assert_ne!(a.fingerprint(), joined.fingerprint());
        assert_eq!(
            QuestionBank::default().fingerprint(),
            QuestionBank::new(DEFAULT_QUESTIONS.iter().copied())
                .unwrap()
                .fingerprint()
        );
    }
}
