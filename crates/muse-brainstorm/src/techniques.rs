use std::fmt;

/// Brainstorming techniques, indexed by how stuck the user says they are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Technique {
    MindMapping,
    Scamper,
    SixThinkingHats,
    RandomWordAssociation,
    ReverseBrainstorming,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::MindMapping,
        Technique::Scamper,
        Technique::SixThinkingHats,
        Technique::RandomWordAssociation,
        Technique::ReverseBrainstorming,
    ];

    /// Levels run from 1 (a little stuck) to 5 (completely stuck). Anything
    /// else gets Six Thinking Hats.
    pub fn for_stuck_level(level: i64) -> Self {
        match level {
            1 => Technique::MindMapping,
            2 => Technique::Scamper,
            4 => Technique::RandomWordAssociation,
            5 => Technique::ReverseBrainstorming,
            _ => Technique::SixThinkingHats,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Technique::MindMapping => "Mind Mapping",
            Technique::Scamper => "SCAMPER",
            Technique::SixThinkingHats => "Six Thinking Hats",
            Technique::RandomWordAssociation => "Random Word Association",
            Technique::ReverseBrainstorming => "Reverse Brainstorming",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Technique::MindMapping => {
                "Start with your central idea and branch out with related concepts."
            }
            Technique::Scamper => {
                "Consider how you can Substitute, Combine, Adapt, Modify, Put to other use, \
                 Eliminate, or Reverse aspects of your idea."
            }
            Technique::SixThinkingHats => {
                "Look at the problem from different perspectives (facts, emotions, caution, \
                 benefits, creativity, process)."
            }
            Technique::RandomWordAssociation => {
                "Pick a random word and force connections between it and your problem."
            }
            Technique::ReverseBrainstorming => {
                "Instead of solving the problem, think about how to cause it or make it worse, \
                 then reverse your solutions."
            }
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.description())
    }
}
