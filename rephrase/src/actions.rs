//! Text actions and their prompt templates

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Rephrase,
    FixGrammar,
    Summarize,
    Explain,
    Analogy,
    /// Forward the text unchanged
    Send,
}

impl Action {
    /// Build the prompt sent to the provider for `input`
    pub fn compose(&self, input: &str) -> String {
        let instruction = match self {
            Self::Rephrase => "Rephrase the following sentence in a clearer way:",
            Self::FixGrammar => "Fix any grammar and punctuation mistakes in this sentence:",
            Self::Summarize => "Summarize this sentence in simple words, make a bullet points:",
            Self::Explain => "Explain this sentence in simple words:",
            Self::Analogy => "Give this sentence an analogy:",
            Self::Send => return input.to_string(),
        };
        format!("{}\n{}", instruction, input)
    }
}

pub const SUGGESTION_PROMPT: &str =
    "Provide 20 concise prompt suggestions for asking ChatGPT. Give me straight in bullet points";

/// Split a suggestion reply into one trimmed suggestion per non-empty line
pub fn parse_suggestions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
