//! Dialogue and area orchestrators - the end-to-end per-request pipelines
//!
//! The dialogue contract never errors for LLM or parse failures; those paths
//! return an affinity-selected fallback line with `used_fallback` set, and
//! skip every state mutation. Only the initial state fetch is fatal.

use crate::cache::{area_key, context_hash, dialogue_key, FingerprintCache};
use crate::intent::select_intent;
use crate::prompt::{EnvironmentContext, PromptBuilder};
use crate::repository::{CharacterStore, MemoryStore, RelationshipStore, RepositoryError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use thornvale_core::{DialogueResponse, EntityId, Priority};
use thornvale_llm::{parse_response, TextGenerator, ValidationConfig};
use thornvale_mind::{infer_reaction, Affinity, EmotionProfile, Memory, MemoryContent};
use thornvale_pipeline::{fallback_template, DegradationController, FallbackDomain};
use tracing::{debug, warn};

/// Affinity-selected static lines for when the generator cannot answer.
fn fallback_line(affinity: &Affinity) -> &'static str {
    if affinity.affection > 50.0 {
        "Hm? Oh - good to see you. Forgive me, my mind is elsewhere."
    } else if affinity.affection < -20.0 {
        "They grunt and say nothing."
    } else if affinity.fear > 50.0 {
        "They glance away, refusing to meet your eyes."
    } else {
        "They give a silent nod."
    }
}

/// Affinity deltas implied by the NPC's own emotional reaction.
fn sentiment_deltas(reaction: &str) -> (f64, f64) {
    match reaction {
        "joy" | "excited" => (2.0, 1.0),
        "anger" => (-3.0, -2.0),
        "fear" => (0.0, -1.0),
        _ => (0.0, 0.0),
    }
}

pub struct DialogueOrchestrator {
    characters: Arc<dyn CharacterStore>,
    memories: Arc<dyn MemoryStore>,
    relationships: Arc<dyn RelationshipStore>,
    generator: Arc<dyn TextGenerator>,
    cache: Arc<FingerprintCache>,
    degradation: Arc<DegradationController>,
    validation: ValidationConfig,
    model: String,
}

impl DialogueOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        characters: Arc<dyn CharacterStore>,
        memories: Arc<dyn MemoryStore>,
        relationships: Arc<dyn RelationshipStore>,
        generator: Arc<dyn TextGenerator>,
        cache: Arc<FingerprintCache>,
        degradation: Arc<DegradationController>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            characters,
            memories,
            relationships,
            generator,
            cache,
            degradation,
            validation: ValidationConfig::default(),
            model: model.into(),
        }
    }

    /// One utterance through the whole pipeline.
    pub async fn generate_dialogue(
        &self,
        npc: EntityId,
        speaker: EntityId,
        utterance: &str,
    ) -> Result<DialogueResponse, RepositoryError> {
        // 1. State fetch - the only fatal stretch.
        let character = self.characters.character(npc).await?;
        let personality = self.characters.personality(npc).await?;
        let mood = self.characters.mood(npc).await?;
        let desires = self.characters.desires(npc).await?;
        let speaker_character = self.characters.character(speaker).await?;
        let relationship = self.relationships.get_or_create(npc, speaker).await?;
        let recent = self.memories.recent(npc, 5).await?;
        let drift = self.relationships.drift(npc).await?;

        // 2. Intent from the desire profile.
        let intent = select_intent(&desires);

        // 3. Cache probe. A hit returns without touching any state.
        let drift_level = drift
            .as_ref()
            .map(|d| d.metrics.level.as_str())
            .unwrap_or("none");
        let fingerprint = context_hash(
            mood.kind.as_str(),
            intent.kind.as_str(),
            relationship.affinity.affection,
            relationship.affinity.trust,
            relationship.affinity.fear,
            drift_level,
        );
        let key = dialogue_key(npc, speaker, intent.kind.as_str(), &fingerprint);
        if let Some(text) = self.cache.get(&key) {
            debug!(%npc, %speaker, "dialogue cache hit");
            let (emotional_reaction, emotional_weight) = infer_reaction(&text);
            return Ok(DialogueResponse {
                text,
                emotional_reaction,
                emotional_weight,
                used_fallback: false,
            });
        }

        // 4. Prompt assembly.
        let urgency = desires
            .top_need()
            .map(|(_, need)| need.value)
            .unwrap_or(0.0);
        let mut builder = PromptBuilder::new();
        builder
            .identity(&character)
            .personality(&personality)
            .current_state(&mood, intent.descriptor, urgency, "in good health")
            .speaker(&speaker_character.name, &relationship.affinity)
            .memories(&recent)
            .topic(intent.kind.as_str())
            .utterance(utterance);
        if let Some(snapshot) = &drift {
            builder.drift(&snapshot.baseline, &snapshot.current, &snapshot.metrics);
        }
        let prompt = builder.render();

        // 5. Generation, degraded or failed paths fall back.
        let generated = if self.degradation.should_bypass(Priority::Normal) {
            debug!(tier = self.degradation.tier().as_str(), "bypassing llm");
            None
        } else {
            let started = Instant::now();
            match self.generator.generate(&self.model, &prompt).await {
                Ok(raw) => {
                    self.degradation.record_success(started.elapsed());
                    match parse_response(&raw, &self.validation) {
                        Ok(text) => Some(text),
                        Err(e) => {
                            warn!(%npc, error = %e, "generated dialogue rejected");
                            None
                        }
                    }
                }
                Err(e) => {
                    if e.is_upstream() {
                        self.degradation.record_failure();
                    }
                    warn!(%npc, error = %e, "dialogue generation failed");
                    None
                }
            }
        };

        let (text, used_fallback) = match generated {
            Some(text) => (text, false),
            None => (fallback_line(&relationship.affinity).to_string(), true),
        };

        // 6. Emotional reaction from the final text.
        let (emotional_reaction, emotional_weight) = infer_reaction(&text);

        // 7. Post-generation state writes, fire-and-forget. Fallback lines
        //    leave no trace.
        if !used_fallback {
            self.cache.set(key, text.clone());
            self.spawn_state_update(
                npc,
                speaker,
                utterance.to_string(),
                text.clone(),
                intent.kind.as_str().to_string(),
                emotional_reaction.clone(),
                emotional_weight,
                relationship,
            );
        }

        Ok(DialogueResponse {
            text,
            emotional_reaction,
            emotional_weight,
            used_fallback,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_state_update(
        &self,
        npc: EntityId,
        speaker: EntityId,
        heard: String,
        spoken: String,
        topic: String,
        reaction: String,
        weight: f64,
        mut relationship: thornvale_mind::Relationship,
    ) {
        let memories = self.memories.clone();
        let relationships = self.relationships.clone();

        tokio::spawn(async move {
            let now = Utc::now();
            let mut emotions = EmotionProfile::new();
            emotions.set(&reaction, weight.max(0.05));
            let memory = Memory::new(
                npc,
                MemoryContent::Conversation {
                    participant: speaker,
                    heard,
                    spoken,
                    outcome: reaction.clone(),
                    topic,
                },
                emotions,
                weight,
                now,
            );
            if let Err(e) = memories.store(memory).await {
                warn!(%npc, error = %e, "conversation memory write failed");
            }

            let (affection, trust) = sentiment_deltas(&reaction);
            if affection != 0.0 || trust != 0.0 {
                relationship.affinity.apply(affection, trust, 0.0);
                relationship.last_interaction = now;
                if let Err(e) = relationships.save(relationship).await {
                    warn!(%npc, error = %e, "relationship update failed");
                }
            }
        });
    }
}

/// What the area pipeline needs to fingerprint and describe a location.
#[derive(Clone, Debug)]
pub struct AreaRequest {
    pub area: String,
    pub world_id: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub weather: String,
    pub time_of_day: String,
    pub season: String,
    pub perception: f64,
    pub notable: Vec<String>,
}

/// Mirror of the dialogue pipeline for generated area prose: probe the area
/// cache by bucketed perception, generate, fall back to the static area
/// template, cache successes.
pub struct AreaOrchestrator {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<FingerprintCache>,
    degradation: Arc<DegradationController>,
    validation: ValidationConfig,
    model: String,
}

impl AreaOrchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        cache: Arc<FingerprintCache>,
        degradation: Arc<DegradationController>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            cache,
            degradation,
            validation: ValidationConfig {
                max_code_points: 1200,
                ..ValidationConfig::default()
            },
            model: model.into(),
        }
    }

    /// Returns the description and whether the fallback template served it.
    pub async fn describe_area(&self, request: &AreaRequest) -> (String, bool) {
        let key = area_key(
            &request.area,
            &request.world_id,
            request.x,
            request.y,
            request.z,
            &request.weather,
            &request.time_of_day,
            &request.season,
            request.perception,
        );
        if let Some(text) = self.cache.get(&key) {
            debug!(area = %request.area, "area cache hit");
            return (text, false);
        }

        if self.degradation.should_bypass(Priority::Low) {
            return (fallback_template(FallbackDomain::Area).to_string(), true);
        }

        let prompt = self.area_prompt(request);
        let started = Instant::now();
        match self.generator.generate(&self.model, &prompt).await {
            Ok(raw) => {
                self.degradation.record_success(started.elapsed());
                match parse_response(&raw, &self.validation) {
                    Ok(text) => {
                        self.cache.set(key, text.clone());
                        (text, false)
                    }
                    Err(e) => {
                        warn!(area = %request.area, error = %e, "area prose rejected");
                        (fallback_template(FallbackDomain::Area).to_string(), true)
                    }
                }
            }
            Err(e) => {
                if e.is_upstream() {
                    self.degradation.record_failure();
                }
                warn!(area = %request.area, error = %e, "area generation failed");
                (fallback_template(FallbackDomain::Area).to_string(), true)
            }
        }
    }

    fn area_prompt(&self, request: &AreaRequest) -> String {
        let env = EnvironmentContext {
            location: request.area.clone(),
            time_of_day: request.time_of_day.clone(),
            weather: request.weather.clone(),
            nearby: request.notable.clone(),
        };
        let detail = match crate::cache::perception_bucket(request.perception) {
            0 => "Describe only what an inattentive eye would catch.",
            1 => "Describe the obvious features and one smaller detail.",
            2 => "Describe the scene attentively, including subtle details.",
            _ => "Describe the scene as a keen observer would, down to faint traces.",
        };
        let mut builder = PromptBuilder::new();
        builder.environment(&env).topic(&format!(
            "describing this place in {} during {}",
            request.season, request.time_of_day
        ));
        format!(
            "{}\n\n{}\nWrite a short second-person room description, prose only.",
            builder.render(),
            detail
        )
    }
}
