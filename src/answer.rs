use serde::Serialize;

/// Outcome of checking an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Nothing submitted yet
    Unknown,
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_judged(self) -> bool {
        self != Verdict::Unknown
    }
}

/// Compare a submission with the target, ignoring case and surrounding
/// whitespace. A missing submission is `Unknown`.
pub fn check(submission: Option<&str>, target: &str) -> Verdict {
    match submission {
        None => Verdict::Unknown,
        Some(answer) if normalize(answer) == normalize(target) => Verdict::Correct,
        Some(_) => Verdict::Incorrect,
    }
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
