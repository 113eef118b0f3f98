//! Tests for thornvale-mind: cross-module flows the engines feed each other

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thornvale_core::EntityId;
use thornvale_mind::*;

// ===========================================================================
// Event -> emotion -> memory
// ===========================================================================

#[test]
fn a_threat_becomes_a_vivid_fearful_memory() {
    let now = Utc::now();
    let npc = EntityId::new();
    let personality = Personality::new(50.0, 50.0, 50.0, 50.0, 80.0);

    let (emotions, weight) = analyze_event(&EmotionalEvent::Threat, &personality);
    let memory = Memory::new(
        npc,
        MemoryContent::Event {
            description: "cornered by bandits on the north road".into(),
        },
        emotions,
        weight,
        now,
    )
    .with_tags(["bandits", "north_road"]);

    assert_eq!(memory.dominant_emotion, "fear");
    assert_eq!(memory.clarity, 1.0);
    assert!(memory.emotional_weight > 0.9);

    // A heavy memory consolidates the next day instead of fading.
    let mut memories = vec![memory];
    memories[0].clarity = 0.85;
    consolidate_memories(&mut memories, now + Duration::hours(12));
    assert!(memories[0].clarity > 0.85);
}

#[test]
fn congruent_recall_surfaces_the_matching_past() {
    let now = Utc::now();
    let npc = EntityId::new();
    let personality = Personality::default();

    let (fear_profile, fear_weight) = analyze_event(&EmotionalEvent::Threat, &personality);
    let (joy_profile, joy_weight) = analyze_event(
        &EmotionalEvent::Gift {
            value: 500.0,
            wealth: 100.0,
        },
        &personality,
    );

    let memories = vec![
        Memory::new(
            npc,
            MemoryContent::Event {
                description: "the ambush at the ford".into(),
            },
            fear_profile.clone(),
            fear_weight,
            now - Duration::days(30),
        ),
        Memory::new(
            npc,
            MemoryContent::Event {
                description: "a stranger's unexpected generosity".into(),
            },
            joy_profile,
            joy_weight,
            now - Duration::days(2),
        ),
    ];

    let recalled = recall_congruent(&memories, &fear_profile, now);
    assert_eq!(recalled.len(), 1);
    assert!(matches!(
        &recalled[0].content,
        MemoryContent::Event { description } if description.contains("ambush")
    ));
}

// ===========================================================================
// Interaction -> relationship -> drift -> reaction
// ===========================================================================

#[test]
fn a_souring_friendship_registers_as_drift() {
    let now = Utc::now();
    let mut rel = Relationship::new(EntityId::new(), EntityId::new(), now);

    // Years of mild manners set the baseline.
    for _ in 0..20 {
        rel.observe_behavior(BehavioralProfile {
            aggression: 0.1,
            honesty: 0.8,
            sociability: 0.6,
            ..Default::default()
        });
    }
    rel.roll_baseline();
    for _ in 0..10 {
        rel.roll_baseline();
    }
    let settled = rel.baseline;

    // A violent month floods the rolling window.
    for _ in 0..20 {
        rel.observe_behavior(BehavioralProfile {
            aggression: 0.9,
            honesty: 0.8,
            sociability: 0.2,
            ..Default::default()
        });
    }

    let metrics = compute_drift(&settled, &rel.current_behavior());
    assert!(metrics.score > 0.5);
    assert!(metrics
        .affected_traits
        .contains(&"aggression".to_string()));

    let reaction = react_to_drift(&metrics).expect("drift above threshold must react");
    rel.affinity.apply(reaction.affection_delta, reaction.trust_delta, 0.0);
    assert!(rel.affinity.affection != 0.0);
}

#[test]
fn violence_then_silence_decays_toward_indifference_but_fear_holds() {
    let now = Utc::now();
    let mut rel = Relationship::new(EntityId::new(), EntityId::new(), now);
    rel.apply_interaction(InteractionKind::Violence, now);

    let fear_before = rel.affinity.fear;
    assert!(fear_before > 0.0);

    rel.decay_inactivity(3650.0);
    assert_eq!(rel.affinity.fear, fear_before);
    assert_eq!(rel.affinity.trust, 0.0);
}

// ===========================================================================
// Desire -> intent pressure under personality
// ===========================================================================

#[test]
fn starving_scholar_still_prioritizes_food() {
    let scholar = Archetype::Scholar.preset();
    let mut profile = DesireProfile::new();
    let ctx = TickContext {
        alone: true,
        idle: true,
        near_unexplored: true,
        ..Default::default()
    };

    // Three simulated days without food.
    profile.tick(&scholar, &ctx, 72.0);

    let ranked = profile.sorted_by_priority(&scholar);
    let top: Vec<&str> = ranked.iter().take(3).map(|(n, _)| n.as_str()).collect();
    assert!(top.contains(&"thirst"), "ranked: {ranked:?}");
    assert!(top.contains(&"hunger"), "ranked: {ranked:?}");
}

// ===========================================================================
// Genetics -> personality -> mood duration
// ===========================================================================

#[test]
fn inherited_neuroticism_lengthens_moods() {
    let mut rng = StdRng::seed_from_u64(21);
    let anxious_line = Genome::uniform(TraitGenes::homozygous_dominant());
    let child = inherit_with_rate(&anxious_line, &anxious_line, 0.0, &mut rng);
    let personality = express(&child);
    assert_eq!(personality.neuroticism, 70.0);

    let mood = MoodState::trigger(MoodKind::Anxious, 6.0, &personality);
    assert!((mood.remaining_hours - 10.2).abs() < 1e-9);
}

#[test]
fn lifecycle_trauma_compounds_with_inheritance() {
    let mut personality = express(&Genome::uniform(TraitGenes::heterozygous()));
    let born_with = personality.neuroticism;
    personality.apply_experience(LifecycleEvent::Trauma);
    assert_eq!(personality.neuroticism, born_with + 20.0);
}
