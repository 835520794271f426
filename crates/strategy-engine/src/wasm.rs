//! WASM bindings for in-browser play and match replay
//!
//! Moves cross the boundary as the harness wire bits: `1` cooperates,
//! `0` defects.

#![cfg(feature = "wasm")]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::{
    build_profiles, run_match, try_decide, Controller, EngineConfig, Histories, Move,
    OpponentId, ReferenceOpponent,
};

fn to_moves(bits: &[u8]) -> Vec<Move> {
    bits.iter().copied().map(Move::from_bit).collect()
}

fn to_histories(raw: BTreeMap<OpponentId, Vec<u8>>) -> Histories {
    raw.into_iter().map(|(id, bits)| (id, to_moves(&bits))).collect()
}

fn parse_config(json: Option<String>) -> Result<EngineConfig, JsError> {
    match json {
        Some(json) => EngineConfig::from_json(&json)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e))),
        None => Ok(EngineConfig::default()),
    }
}

/// Decide the next move of a single game
///
/// # Arguments
/// * `my_history` - Our moves as wire bits
/// * `opponent_history` - Opponent's moves as wire bits, same length
/// * `round_limit` - Total rounds if known
/// * `config_json` - Optional JSON EngineConfig (forgiveness policy and seed)
#[wasm_bindgen]
pub fn decide_move(
    my_history: &[u8],
    opponent_history: &[u8],
    round_limit: Option<u32>,
    config_json: Option<String>,
) -> Result<u8, JsError> {
    let config = parse_config(config_json)?;
    let forgiver = config.forgiveness.forgiver(config.seed, 0);
    let chosen = try_decide(
        &to_moves(my_history),
        &to_moves(opponent_history),
        round_limit.map(|r| r as usize),
        &forgiver,
    )
    .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(chosen.to_bit())
}

#[derive(Deserialize)]
struct RoundRequest {
    current_id: OpponentId,
    my_histories: BTreeMap<OpponentId, Vec<u8>>,
    opponent_histories: BTreeMap<OpponentId, Vec<u8>>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

#[derive(Serialize)]
struct RoundResponse {
    #[serde(rename = "move")]
    chosen: u8,
    next_opponent: OpponentId,
}

/// Play one multi-opponent round
///
/// Takes `{current_id, my_histories, opponent_histories, config?}` as JSON
/// and returns `{move, next_opponent}`.
#[wasm_bindgen]
pub fn play_round(request_json: &str) -> Result<JsValue, JsError> {
    let request: RoundRequest = serde_json::from_str(request_json)
        .map_err(|e| JsError::new(&format!("Invalid request: {}", e)))?;

    let controller = Controller::with_config(request.config.unwrap_or_default())
        .map_err(|e| JsError::new(&e.to_string()))?;
    let (chosen, next_opponent) = controller
        .try_play(
            request.current_id,
            &to_histories(request.my_histories),
            &to_histories(request.opponent_histories),
        )
        .map_err(|e| JsError::new(&e.to_string()))?;

    let response = RoundResponse {
        chosen: chosen.to_bit(),
        next_opponent,
    };
    serde_wasm_bindgen::to_value(&response)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Reputation profiles for every opponent in `opponent_histories`
#[wasm_bindgen]
pub fn opponent_profiles(my_histories_json: &str, opponent_histories_json: &str) -> Result<JsValue, JsError> {
    let mine: BTreeMap<OpponentId, Vec<u8>> = serde_json::from_str(my_histories_json)
        .map_err(|e| JsError::new(&format!("Invalid histories: {}", e)))?;
    let theirs: BTreeMap<OpponentId, Vec<u8>> = serde_json::from_str(opponent_histories_json)
        .map_err(|e| JsError::new(&format!("Invalid histories: {}", e)))?;

    let profiles = build_profiles(&to_histories(mine), &to_histories(theirs));

    serde_wasm_bindgen::to_value(&profiles)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Replay a game against a reference opponent with full round details
///
/// # Arguments
/// * `opponent_json` - JSON serialized ReferenceOpponent, e.g. `"TitForTat"`
/// * `round_count` - Length of the game
/// * `announce_length` - Whether the engine knows the length
/// * `config_json` - Optional JSON EngineConfig
#[wasm_bindgen]
pub fn replay_match(
    opponent_json: &str,
    round_count: u32,
    announce_length: bool,
    config_json: Option<String>,
) -> Result<JsValue, JsError> {
    let opponent: ReferenceOpponent = serde_json::from_str(opponent_json)
        .map_err(|e| JsError::new(&format!("Invalid opponent: {}", e)))?;
    let config = parse_config(config_json)?;

    let result = run_match(&config, &opponent, round_count as usize, announce_length);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Engine moves of a replayed game as wire bits
#[wasm_bindgen]
pub fn replay_engine_moves(
    opponent_json: &str,
    round_count: u32,
    announce_length: bool,
    config_json: Option<String>,
) -> Result<js_sys::Uint8Array, JsError> {
    let opponent: ReferenceOpponent = serde_json::from_str(opponent_json)
        .map_err(|e| JsError::new(&format!("Invalid opponent: {}", e)))?;
    let config = parse_config(config_json)?;

    let bits: Vec<u8> = run_match(&config, &opponent, round_count as usize, announce_length)
        .engine_history()
        .into_iter()
        .map(Move::to_bit)
        .collect();
    Ok(js_sys::Uint8Array::from(&bits[..]))
}
