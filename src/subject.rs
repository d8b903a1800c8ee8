//! Subject-model seam and answer grading helpers.
//!
//! Model invocation itself lives outside this crate. Callers implement
//! [`SubjectModel`] over whatever client they use; the helpers here only parse
//! and grade the plain text that comes back.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::subject::{FINAL_TAG, VERDICT_CORRECT, VERDICT_INCORRECT};
use crate::errors::PotemkinError;

static FINAL_ANSWER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"(?is){}\s*(.*)", regex::escape(FINAL_TAG))).ok());
static QUESTION_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<question>(.*?)</question>").ok());

/// Text returned by a subject model for one prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectResponse {
    /// Full model output.
    pub raw: String,
    /// Text after the final-answer tag, `None` when the tag is absent.
    pub answer: Option<String>,
}

impl SubjectResponse {
    /// Wrap a raw response and extract its final answer.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let answer = find_final_answer(&raw);
        Self { raw, answer }
    }
}

/// Black-box model collaborator.
pub trait SubjectModel {
    /// Run `prompt` against `subject` and return its response.
    fn generate_and_score(&self, prompt: &str, subject: &str)
    -> Result<SubjectResponse, PotemkinError>;
}

fn find_final_answer(response: &str) -> Option<String> {
    let pattern = FINAL_ANSWER.as_ref()?;
    pattern
        .captures(response)
        .and_then(|captures| captures.get(1))
        .map(|answer| answer.as_str().trim().to_string())
}

/// Text after the first `FINAL ANSWER:` tag (any case), trimmed; empty when absent.
pub fn extract_final_answer(response: &str) -> String {
    find_final_answer(response).unwrap_or_default()
}

/// Grade an extracted answer against the gold answer.
///
/// Multiple choice compares the first character of the answer, uppercased,
/// with the gold letter. Open answers compare trimmed, lowercased text.
pub fn grade_answer(answer: Option<&str>, gold: &str, multiple_choice: bool) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    if multiple_choice {
        answer
            .chars()
            .next()
            .is_some_and(|first| first.to_uppercase().collect::<String>() == gold.to_uppercase())
    } else {
        answer.trim().to_lowercase() == gold.trim().to_lowercase()
    }
}

/// Every `<question>...</question>` block, in order.
pub fn parse_questions(inference: &str) -> Vec<String> {
    let Some(pattern) = QUESTION_BLOCK.as_ref() else {
        return Vec::new();
    };
    pattern
        .captures_iter(inference)
        .filter_map(|captures| captures.get(1))
        .map(|question| question.as_str().to_string())
        .collect()
}

/// Judge verdict on a graded answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The judge accepted the answer.
    Correct,
    /// The judge rejected the answer.
    Incorrect,
}

/// Read a judge's final answer. Markdown emphasis is ignored.
///
/// `None` when the answer starts with neither verdict, e.g. a truncated response.
pub fn parse_judge_verdict(judge_answer: &str) -> Option<Verdict> {
    let normalized = judge_answer.replace('*', "").trim().to_lowercase();
    if normalized.starts_with(VERDICT_CORRECT) {
        Some(Verdict::Correct)
    } else if normalized.starts_with(VERDICT_INCORRECT) {
        Some(Verdict::Incorrect)
    } else {
        None
    }
}

/// Self-coherence counts of a judge grading its own answers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoherenceTally {
    coherent: usize,
    total: usize,
}

impl CoherenceTally {
    /// Count one verdict against the verdict the answer should have received.
    pub fn record(&mut self, expected: Verdict, judged: Verdict) {
        if expected == judged {
            self.coherent += 1;
        }
        self.total += 1;
    }

    /// Parse and count a raw judge answer. Unparsable answers are not counted.
    pub fn record_raw(&mut self, expected: Verdict, judge_answer: &str) -> Option<Verdict> {
        let judged = parse_judge_verdict(judge_answer)?;
        self.record(expected, judged);
        Some(judged)
    }

    /// Verdicts counted so far.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of coherent verdicts, `None` before any verdict.
    pub fn mean(&self) -> Option<f64> {
        (self.total > 0).then(|| self.coherent as f64 / self.total as f64)
    }

    /// Normalized incoherence `2 * (1 - mean)`: 0 is perfect, 1 is random.
    pub fn potemkin_rate(&self) -> Option<f64> {
        self.mean().map(|mean| 2.0 * (1.0 - mean))
    }
}

/// Ask `subject` a question and grade its final answer.
pub fn answer_and_grade(
    model: &dyn SubjectModel,
    subject: &str,
    question: &str,
    gold: &str,
    multiple_choice: bool,
) -> Result<(bool, SubjectResponse), PotemkinError> {
    let prompt = format!(
        "You may think step-by-step, but you MUST finish with a line that starts exactly with `{FINAL_TAG}` followed by your single best answer.\n\nQuestion:\n{question}\n"
    );
    let response = model.generate_and_score(&prompt, subject)?;
    let correct = grade_answer(response.answer.as_deref(), gold, multiple_choice);
    Ok((correct, response))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedModel {
        reply: &'static str,
    }

    impl SubjectModel for CannedModel {
        fn generate_and_score(
            &self,
            prompt: &str,
            subject: &str,
        ) -> Result<SubjectResponse, PotemkinError> {
            if subject.is_empty() {
                return Err(PotemkinError::Subject("no subject".into()));
            }
            assert!(prompt.contains(FINAL_TAG));
            Ok(SubjectResponse::from_raw(self.reply))
        }
    }

    #[test]
    fn extracts_text_after_final_tag() {
        assert_eq!(
            extract_final_answer("reasoning...\nfinal answer:  (B) Stag Hunt \n"),
            "(B) Stag Hunt"
        );
        assert_eq!(extract_final_answer("no tag here"), "");
        assert_eq!(
            SubjectResponse::from_raw("FINAL ANSWER: a\nb").answer.as_deref(),
            Some("a\nb")
        );
    }

    #[test]
    fn grades_multiple_choice_and_open_answers() {
        assert!(grade_answer(Some("b) because"), "B", true));
        assert!(!grade_answer(Some("C"), "B", true));
        assert!(!grade_answer(Some(""), "B", true));
        assert!(grade_answer(Some("  Nash Equilibrium "), "nash equilibrium", false));
        assert!(!grade_answer(None, "B", true));
    }

    #[test]
    fn parses_question_blocks() {
        let text = "<question>What is\na haiku?</question> noise <question>Q2</question><question>";
        assert_eq!(parse_questions(text), vec!["What is\na haiku?", "Q2"]);
        assert!(parse_questions("none").is_empty());
    }

    #[test]
    fn verdicts_feed_the_coherence_tally() {
        assert_eq!(parse_judge_verdict("**Correct**"), Some(Verdict::Correct));
        assert_eq!(parse_judge_verdict(" Incorrect."), Some(Verdict::Incorrect));
        assert_eq!(parse_judge_verdict("maybe"), None);

        let mut tally = CoherenceTally::default();
        assert_eq!(tally.potemkin_rate(), None);
        tally.record(Verdict::Correct, Verdict::Correct);
        tally.record_raw(Verdict::Incorrect, "correct");
        assert_eq!(tally.record_raw(Verdict::Incorrect, ""), None);
        assert_eq!(tally.total(), 2);
        assert_eq!(tally.mean(), Some(0.5));
        assert_eq!(tally.potemkin_rate(), Some(1.0));
    }

    #[test]
    fn answer_and_grade_uses_the_model_seam() {
        let model = CannedModel {
            reply: "Thinking.\nFINAL ANSWER: A",
        };
        let (correct, response) = answer_and_grade(&model, "GPT-4o", "Pick one", "A", true).unwrap();
        assert!(correct);
        assert_eq!(response.answer.as_deref(), Some("A"));

        let err = answer_and_grade(&model, "", "Pick one", "A", true).unwrap_err();
        assert!(matches!(err, PotemkinError::Subject(_)));
    }
}
