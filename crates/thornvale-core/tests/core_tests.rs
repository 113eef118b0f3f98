//! Tests for thornvale-core: ids, character model, wire types, priority, errors

use thornvale_core::*;

// ===========================================================================
// EntityId
// ===========================================================================

#[test]
fn entity_id_is_unique_and_displayable() {
    let a = EntityId::new();
    let b = EntityId::new();
    assert_ne!(a, b);
    assert_eq!(format!("{a}").len(), 36);
}

#[test]
fn entity_id_round_trips_through_string() {
    let id = EntityId::new();
    let parsed: EntityId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn entity_id_serde_is_transparent() {
    let id = EntityId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let back: EntityId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}

#[test]
fn entity_id_orders_consistently() {
    let mut ids: Vec<EntityId> = (0..8).map(|_| EntityId::new()).collect();
    ids.sort();
    let mut resorted = ids.clone();
    resorted.sort();
    assert_eq!(ids, resorted);
}

// ===========================================================================
// Attributes and pools
// ===========================================================================

#[test]
fn attribute_bucket_sums() {
    let attrs = Attributes {
        might: 1,
        agility: 2,
        endurance: 3,
        vitality: 4,
        speed: 5,
        intellect: 6,
        willpower: 7,
        cunning: 8,
        presence: 9,
        discipline: 10,
        perception: 11,
        intuition: 12,
        attunement: 13,
        awareness: 14,
        empathy: 15,
    };
    assert_eq!(attrs.physical_sum(), 15);
    assert_eq!(attrs.mental_sum(), 40);
    assert_eq!(attrs.sensory_sum(), 65);
}

#[test]
fn secondary_pools_derive_from_attributes() {
    let attrs = Attributes {
        vitality: 10,
        endurance: 6,
        agility: 4,
        discipline: 5,
        intellect: 8,
        attunement: 7,
        willpower: 9,
        presence: 3,
        ..Default::default()
    };
    let pools = SecondaryPools::derive(&attrs);
    assert_eq!(pools.hp_max, 20 + 30 + 6);
    assert_eq!(pools.stamina_max, 15 + 12 + 4);
    assert_eq!(pools.focus_max, 15 + 10 + 8);
    assert_eq!(pools.mana_max, 10 + 14 + 9);
    assert_eq!(pools.nerve_max, 10 + 18 + 3);
}

#[test]
fn character_new_derives_pools() {
    let attrs = Attributes {
        vitality: 5,
        ..Default::default()
    };
    let c = Character::new("Brannoc", "human", attrs);
    assert_eq!(c.name, "Brannoc");
    assert_eq!(c.species, "human");
    assert_eq!(c.pools.hp_max, 20 + 15);
}

// ===========================================================================
// Priority
// ===========================================================================

#[test]
fn priority_ordering_is_strict() {
    assert!(Priority::Critical < Priority::High);
    assert!(Priority::High < Priority::Normal);
    assert!(Priority::Normal < Priority::Low);
}

#[test]
fn priority_index_matches_all_order() {
    for (i, p) in Priority::ALL.iter().enumerate() {
        assert_eq!(p.index(), i);
    }
}

#[test]
fn priority_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), r#""critical""#);
    assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), r#""low""#);
}

// ===========================================================================
// Wire types
// ===========================================================================

#[test]
fn ai_request_decodes_with_missing_optionals() {
    let req: AiRequest = serde_json::from_str(r#"{"prompt": "say hi"}"#).unwrap();
    assert_eq!(req.prompt, "say hi");
    assert!(req.id.is_empty());
    assert!(req.model.is_empty());
}

#[test]
fn ai_response_ok_omits_error_field() {
    let resp = AiResponse::ok("req-1", "hello");
    let json = serde_json::to_string(&resp).unwrap();
    assert!(!json.contains("error"));
    assert!(json.contains("hello"));
}

#[test]
fn ai_response_err_carries_error() {
    let resp = AiResponse::err("req-2", "upstream unavailable");
    let json = serde_json::to_string(&resp).unwrap();
    assert!(json.contains("upstream unavailable"));
    assert!(resp.response.is_empty());
}

#[test]
fn ai_job_stamps_enqueue_time() {
    let req = AiRequest {
        id: "r".into(),
        prompt: "p".into(),
        model: "m".into(),
    };
    let job = AiJob::new(req, "ai.response.r", Priority::Normal);
    assert_eq!(job.reply, "ai.response.r");
    assert!(job.enqueued_at <= chrono::Utc::now());
}

// ===========================================================================
// Error helpers
// ===========================================================================

#[test]
fn error_helpers_format() {
    let e = Error::malformed("bad json");
    assert!(e.to_string().contains("bad json"));
    let e = Error::QueueFull {
        priority: "critical".into(),
    };
    assert!(e.to_string().contains("critical"));
}
