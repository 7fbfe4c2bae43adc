use crate::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAnswer {
    Accept,
    Decline,
    Reprompt,
}

/// Empty input declines; a single `y` or `n` (any case) decides; anything else asks again.
pub fn parse_confirmation(raw: &str) -> ConfirmationAnswer {
    let mut tokens = raw.split_whitespace();
    let Some(answer) = tokens.next() else {
        return ConfirmationAnswer::Decline;
    };

    if tokens.next().is_some() {
        return ConfirmationAnswer::Reprompt;
    }

    if answer.eq_ignore_ascii_case("y") {
        ConfirmationAnswer::Accept
    } else if answer.eq_ignore_ascii_case("n") {
        ConfirmationAnswer::Decline
    } else {
        ConfirmationAnswer::Reprompt
    }
}

/// Terminal side of the confirmation loop.
#[async_trait]
pub trait Confirmer: Send {
    /// Show `prompt` and return the raw answer, or `None` once input is exhausted.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Called before asking again after an answer that was neither yes nor no.
    fn reject(&mut self, _answer: &str) {}
}

/// Loops on `confirmer` until the operator accepts or declines.
pub async fn confirm(confirmer: &mut dyn Confirmer, prompt: &str) -> Result<bool> {
    loop {
        let Some(raw) = confirmer.ask(prompt).await? else {
            return Ok(false);
        };

        match parse_confirmation(&raw) {
            ConfirmationAnswer::Accept => return Ok(true),
            ConfirmationAnswer::Decline => return Ok(false),
            ConfirmationAnswer::Reprompt => confirmer.reject(&raw),
        }
    }
}
