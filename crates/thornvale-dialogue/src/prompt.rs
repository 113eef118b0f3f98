//! Prompt builder - composes an NPC's full state into one generation prompt
//!
//! Each context section has a dedicated formatter; rendering is a single
//! pass over a fixed template with named slots, and unused slots render
//! empty. One builder serves many requests via `reset`.

use thornvale_core::Character;
use thornvale_mind::{
    Affinity, BehavioralProfile, DriftMetrics, Memory, MemoryContent, MoodState, Personality,
};

/// Where the NPC is standing and what surrounds them.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentContext {
    pub location: String,
    pub time_of_day: String,
    pub weather: String,
    pub nearby: Vec<String>,
}

#[derive(Default)]
pub struct PromptBuilder {
    identity: String,
    personality: String,
    state: String,
    environment: String,
    speaker: String,
    memories: String,
    drift: String,
    topic: String,
    utterance: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every section for the next request.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    pub fn identity(&mut self, character: &Character) -> &mut Self {
        self.identity = format!(
            "You are {}, a {} of this world.",
            character.name, character.species
        );
        self
    }

    pub fn personality(&mut self, personality: &Personality) -> &mut Self {
        self.personality = format!(
            "Personality - openness {:.0}, conscientiousness {:.0}, extraversion {:.0}, \
             agreeableness {:.0}, neuroticism {:.0} (each out of 100).",
            personality.openness,
            personality.conscientiousness,
            personality.extraversion,
            personality.agreeableness,
            personality.neuroticism,
        );
        self
    }

    pub fn current_state(
        &mut self,
        mood: &MoodState,
        intent_descriptor: &str,
        urgency: f64,
        condition: &str,
    ) -> &mut Self {
        self.state = format!(
            "Right now you feel {}. You are {} (urgency {:.0}/100). Physically you are {}.",
            mood.kind.as_str(),
            intent_descriptor,
            urgency,
            condition,
        );
        self
    }

    pub fn environment(&mut self, env: &EnvironmentContext) -> &mut Self {
        let nearby = if env.nearby.is_empty() {
            "no one else nearby".to_string()
        } else {
            format!("nearby: {}", env.nearby.join(", "))
        };
        self.environment = format!(
            "You are at {}. It is {}, the weather {}; {}.",
            env.location, env.time_of_day, env.weather, nearby
        );
        self
    }

    pub fn speaker(&mut self, name: &str, affinity: &Affinity) -> &mut Self {
        self.speaker = format!(
            "{} is speaking to you. Toward them you hold affection {:.0}, trust {:.0}, fear {:.0} \
             (each from -100 to 100).",
            name, affinity.affection, affinity.trust, affinity.fear
        );
        self
    }

    pub fn memories(&mut self, memories: &[Memory]) -> &mut Self {
        if memories.is_empty() {
            self.memories.clear();
            return self;
        }
        let mut lines = vec!["You remember:".to_string()];
        for memory in memories {
            lines.push(format!("- {}", describe_memory(memory)));
        }
        self.memories = lines.join("\n");
        self
    }

    pub fn drift(
        &mut self,
        baseline: &BehavioralProfile,
        current: &BehavioralProfile,
        metrics: &DriftMetrics,
    ) -> &mut Self {
        let traits = if metrics.affected_traits.is_empty() {
            "overall manner".to_string()
        } else {
            metrics.affected_traits.join(", ")
        };
        self.drift = format!(
            "Your behavior has been drifting from your old self ({} drift in {}; \
             e.g. aggression was {:.2}, now {:.2}). {}",
            metrics.level.as_str(),
            traits,
            baseline.aggression,
            current.aggression,
            metrics.level.instruction(),
        );
        self
    }

    pub fn topic(&mut self, topic: &str) -> &mut Self {
        if topic.is_empty() {
            self.topic.clear();
        } else {
            self.topic = format!("The conversation is about {topic}.");
        }
        self
    }

    pub fn utterance(&mut self, utterance: &str) -> &mut Self {
        self.utterance = format!(
            "They say: \"{utterance}\"\nReply in character with one short line of spoken dialogue \
             and nothing else."
        );
        self
    }

    /// Render the fixed template. Empty sections contribute nothing.
    pub fn render(&self) -> String {
        [
            &self.identity,
            &self.personality,
            &self.state,
            &self.environment,
            &self.speaker,
            &self.memories,
            &self.drift,
            &self.topic,
            &self.utterance,
        ]
        .iter()
        .filter(|section| !section.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

fn describe_memory(memory: &Memory) -> String {
    match &memory.content {
        MemoryContent::Observation { description, .. } => format!("seeing {description}"),
        MemoryContent::Conversation { heard, topic, .. } => {
            format!("talking about {topic}; they said \"{heard}\"")
        }
        MemoryContent::Event { description } => description.clone(),
        MemoryContent::Relationship { .. } => {
            format!("a moment that changed how you feel ({})", memory.dominant_emotion)
        }
    }
}
