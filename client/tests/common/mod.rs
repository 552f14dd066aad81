#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use client::gateway::{
    ActionRequest, ActionResult, CombatRecord, Gateway, GatewayError, JoinReply, LogEvent,
    ServerInfo, StartReply,
};
use client::presets::CharacterSheet;
use client::snapshot::{CharacterSnapshot, GameSnapshot, GameStatus, GridPos, MatchSnapshot};

/// Scripted gateway double. Responses are queued per endpoint; the last
/// queued response repeats forever so steady-state polling can be modeled.
/// Every call is recorded for order/count assertions.
#[derive(Default)]
pub struct FakeGateway {
    states: RefCell<HashMap<String, VecDeque<Result<GameSnapshot, GatewayError>>>>,
    matches: RefCell<VecDeque<Result<MatchSnapshot, GatewayError>>>,
    action_results: RefCell<VecDeque<Result<ActionResult, GatewayError>>>,
    joined: RefCell<u32>,
    pub state_queries: RefCell<Vec<String>>,
    pub match_queries: RefCell<u32>,
    pub actions: RefCell<Vec<ActionRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_state(&self, character_id: &str, response: Result<GameSnapshot, GatewayError>) {
        self.states
            .borrow_mut()
            .entry(character_id.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_match(&self, response: Result<MatchSnapshot, GatewayError>) {
        self.matches.borrow_mut().push_back(response);
    }

    pub fn push_action_result(&self, response: Result<ActionResult, GatewayError>) {
        self.action_results.borrow_mut().push_back(response);
    }

    pub fn state_query_count(&self) -> usize {
        self.state_queries.borrow().len()
    }
}

fn pop_sticky<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn not_found(what: &str) -> GatewayError {
    GatewayError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl Gateway for FakeGateway {
    fn ping(&self) -> Result<ServerInfo, GatewayError> {
        Ok(ServerInfo::default())
    }

    fn join_game(&self, _sheet: &CharacterSheet) -> Result<JoinReply, GatewayError> {
        let mut joined = self.joined.borrow_mut();
        *joined += 1;
        Ok(JoinReply {
            character_id: format!("char-{joined}"),
            message: None,
        })
    }

    fn start_game(&self) -> Result<StartReply, GatewayError> {
        Ok(StartReply::default())
    }

    fn query_match(&self) -> Result<MatchSnapshot, GatewayError> {
        *self.match_queries.borrow_mut() += 1;
        pop_sticky(&mut self.matches.borrow_mut()).unwrap_or_else(|| Err(not_found("game")))
    }

    fn query_state(&self, character_id: &str) -> Result<GameSnapshot, GatewayError> {
        self.state_queries
            .borrow_mut()
            .push(character_id.to_string());
        let mut states = self.states.borrow_mut();
        match states.get_mut(character_id) {
            Some(queue) => pop_sticky(queue).unwrap_or_else(|| Err(not_found("character"))),
            None => Err(not_found("character")),
        }
    }

    fn submit_action(&self, request: &ActionRequest) -> Result<ActionResult, GatewayError> {
        self.actions.borrow_mut().push(request.clone());
        pop_sticky(&mut self.action_results.borrow_mut()).unwrap_or_else(|| Ok(ActionResult::default()))
    }

    fn query_log(&self) -> Result<Vec<LogEvent>, GatewayError> {
        Ok(Vec::new())
    }

    fn query_history(&self) -> Result<Vec<CombatRecord>, GatewayError> {
        Ok(Vec::new())
    }
}

pub fn character(id: &str, name: &str, x: i32, y: i32, hp: i32, max_hp: i32) -> CharacterSnapshot {
    CharacterSnapshot {
        id: id.to_string(),
        name: name.to_string(),
        position: GridPos::new(x, y),
        current_hp: hp,
        max_hp,
        speed: 30,
    }
}

pub fn state(
    status: GameStatus,
    round: u32,
    is_your_turn: bool,
    me: Option<CharacterSnapshot>,
    others: Vec<CharacterSnapshot>,
    winner_id: Option<&str>,
) -> GameSnapshot {
    GameSnapshot {
        status,
        round,
        is_your_turn,
        your_character: me,
        visible_characters: others,
        winner_id: winner_id.map(str::to_string),
    }
}
