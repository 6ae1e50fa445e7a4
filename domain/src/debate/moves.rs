//! Rhetorical moves offered to debaters each turn.

/// A rhetorical move a node is nudged to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhetoricalMove {
    Challenge,
    Analogy,
    ConcessionPivot,
    DirectQuestion,
    EmotionalSpike,
}

impl RhetoricalMove {
    pub const ALL: [RhetoricalMove; 5] = [
        RhetoricalMove::Challenge,
        RhetoricalMove::Analogy,
        RhetoricalMove::ConcessionPivot,
        RhetoricalMove::DirectQuestion,
        RhetoricalMove::EmotionalSpike,
    ];

    /// Suggested move for a given turn; rotates so consecutive turns differ.
    pub fn for_turn(turn_index: usize) -> Self {
        Self::ALL[turn_index % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RhetoricalMove::Challenge => "CHALLENGE",
            RhetoricalMove::Analogy => "ANALOGY",
            RhetoricalMove::ConcessionPivot => "CONCESSION + PIVOT",
            RhetoricalMove::DirectQuestion => "DIRECT QUESTION",
            RhetoricalMove::EmotionalSpike => "EMOTIONAL SPIKE",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            RhetoricalMove::Challenge => "\"That's wrong, and here's why...\"",
            RhetoricalMove::Analogy => "Draw a sharp, clear parallel to something real",
            RhetoricalMove::ConcessionPivot => {
                "Admit one tiny thing, then flip it against them"
            }
            RhetoricalMove::DirectQuestion => {
                "Throw a rhetorical bomb the others must react to"
            }
            RhetoricalMove::EmotionalSpike => {
                "Show conviction (frustration, surprise, urgency) briefly, then reason"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_turns_differ() {
        for turn in 0..20 {
            assert_ne!(RhetoricalMove::for_turn(turn), RhetoricalMove::for_turn(turn + 1));
        }
    }
}
