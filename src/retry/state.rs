/// What the last attempt means for the logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Retryable,
    Fatal,
}

/// Position of one logical call inside its attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Attempting { attempt: u32 },
    WaitingBetweenAttempts { attempts_made: u32 },
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl AttemptState {
    pub fn start() -> Self {
        AttemptState::Attempting { attempt: 1 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptState::Succeeded { .. } | AttemptState::Exhausted { .. }
        )
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        match *self {
            AttemptState::Attempting { attempt } => attempt - 1,
            AttemptState::WaitingBetweenAttempts { attempts_made } => attempts_made,
            AttemptState::Succeeded { attempts } | AttemptState::Exhausted { attempts } => attempts,
        }
    }

    /// Transition once the current attempt has resolved. No-op outside `Attempting`.
    pub fn after_attempt(self, verdict: Verdict, max_attempts: u32) -> Self {
        let AttemptState::Attempting { attempt } = self else {
            return self;
        };
        match verdict {
            Verdict::Success => AttemptState::Succeeded { attempts: attempt },
            Verdict::Retryable if attempt < max_attempts => AttemptState::WaitingBetweenAttempts {
                attempts_made: attempt,
            },
            Verdict::Retryable | Verdict::Fatal => AttemptState::Exhausted { attempts: attempt },
        }
    }

    /// Transition once the inter-attempt delay has elapsed. No-op outside `WaitingBetweenAttempts`.
    pub fn after_delay(self) -> Self {
        match self {
            AttemptState::WaitingBetweenAttempts { attempts_made } => AttemptState::Attempting {
                attempt: attempts_made + 1,
            },
            other => other,
        }
    }
}
