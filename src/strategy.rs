//! The settlement strategy game: a small resource simulation.
//!
//! Days advance only through `end_turn`; gather/chop/build are immediate
//! actions spending the day's free workers or stockpiled wood. Yields are
//! sampled per call, so tests treat them as bounded ranges rather than
//! exact values.

use crate::schema::StrategyActions;
use crate::session::{required_u32, EngineError, GameResult, GameSession, Phase, StepOutcome};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wood cost of one shelter.
pub const SHELTER_WOOD_COST: i64 = 5;

/// Number of people one shelter houses.
pub const SHELTER_CAPACITY: u32 = 2;

/// Resource counters for the settlement.
///
/// `free_workers` stays within `[0, population]` between turns; food may
/// dip negative transiently, and negative food at the end of a day is the
/// loss condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementState {
    pub day: u32,
    pub population: u32,
    pub free_workers: u32,
    pub shelters: u32,
    pub food: i64,
    pub wood: i64,
    pub score: i64,
}

impl SettlementState {
    /// The standard opening position.
    pub fn new() -> Self {
        Self {
            day: 1,
            population: 5,
            free_workers: 5,
            shelters: 1,
            food: 10,
            wood: 5,
            score: 0,
        }
    }

    /// People with a roof tonight.
    pub fn sheltered(&self) -> u32 {
        (self.shelters * SHELTER_CAPACITY).min(self.population)
    }

    fn status(&self) -> String {
        format!(
            "Day {}: {} settlers ({} free), {} shelters, {} food, {} wood. Score {}.",
            self.day,
            self.population,
            self.free_workers,
            self.shelters,
            self.food,
            self.wood,
            self.score
        )
    }
}

impl Default for SettlementState {
    fn default() -> Self {
        Self::new()
    }
}

/// A running settlement game.
pub struct SettlementSession {
    state: SettlementState,
    phase: Phase,
}

impl SettlementSession {
    pub fn new() -> Self {
        Self::with_state(SettlementState::new())
    }

    /// Start from an arbitrary position. Used by tests and scenario setups.
    pub fn with_state(state: SettlementState) -> Self {
        Self {
            state,
            phase: Phase::Uninitialized,
        }
    }

    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    // ------------------------------------------------------------------
    // Immediate actions
    // ------------------------------------------------------------------

    fn do_gather(&mut self, args: &Value) -> Result<String, EngineError> {
        let workers = required_u32("gather", args, "workers")?;
        if workers < 1 {
            return Ok("You must send at least one worker.".to_string());
        }
        if workers > self.state.free_workers {
            return Ok(format!(
                "Only {} workers are free; you can't send {}.",
                self.state.free_workers, workers
            ));
        }

        let mut rng = rand::thread_rng();
        let gained: i64 = (0..workers).map(|_| rng.gen_range(2..=4i64)).sum();
        self.state.free_workers -= workers;
        self.state.food += gained;
        Ok(format!(
            "{workers} workers forage and return with {gained} food. {}",
            self.state.status()
        ))
    }

    fn do_chop(&mut self, args: &Value) -> Result<String, EngineError> {
        let workers = required_u32("chop", args, "workers")?;
        if workers < 1 {
            return Ok("You must send at least one worker.".to_string());
        }
        if workers > self.state.free_workers {
            return Ok(format!(
                "Only {} workers are free; you can't send {}.",
                self.state.free_workers, workers
            ));
        }

        let mut rng = rand::thread_rng();
        let gained: i64 = (0..workers).map(|_| rng.gen_range(1..=2i64)).sum();
        self.state.free_workers -= workers;
        self.state.wood += gained;
        Ok(format!(
            "{workers} workers fell trees and haul back {gained} wood. {}",
            self.state.status()
        ))
    }

    fn do_build(&mut self, args: &Value) -> Result<String, EngineError> {
        let shelters = required_u32("build", args, "shelters")?;
        if shelters < 1 {
            return Ok("You must build at least one shelter.".to_string());
        }
        let cost = i64::from(shelters) * SHELTER_WOOD_COST;
        if cost > self.state.wood {
            return Ok(format!(
                "Building {shelters} shelters needs {cost} wood; you have {}.",
                self.state.wood
            ));
        }

        self.state.wood -= cost;
        self.state.shelters += shelters;
        Ok(format!(
            "{shelters} new shelters go up. {}",
            self.state.status()
        ))
    }

    // ------------------------------------------------------------------
    // End of day
    // ------------------------------------------------------------------

    /// Advance the day: reset workers, feed everyone, score, then check
    /// loss, win, growth in that order. Growth never applies on a
    /// terminal day.
    fn do_end_turn(&mut self) -> StepOutcome {
        let s = &mut self.state;
        s.day += 1;
        s.free_workers = s.population;

        let sheltered = s.sheltered();
        let unsheltered = s.population - sheltered;
        let consumed = i64::from(sheltered) + 2 * i64::from(unsheltered);
        s.food -= consumed;
        s.score += i64::from(sheltered) + s.food.max(0) / 2;

        if s.food < 0 {
            self.phase = Phase::Terminal;
            let s = &self.state;
            return StepOutcome::Ended {
                result: GameResult {
                    description: format!(
                        "The stores run empty and the settlement starves on day {}.",
                        s.day
                    ),
                    metadata: json!({
                        "win": false,
                        "survived_days": s.day,
                        "score": s.score,
                        "population": s.population,
                    }),
                },
            };
        }

        if s.population >= 20 && s.shelters >= 10 {
            self.phase = Phase::Terminal;
            let s = &self.state;
            return StepOutcome::Ended {
                result: GameResult {
                    description: format!(
                        "With {} settlers housed in {} shelters, the settlement stands on its own. You win!",
                        s.population, s.shelters
                    ),
                    metadata: json!({
                        "win": true,
                        "days": s.day,
                        "population": s.population,
                        "shelters": s.shelters,
                        "food": s.food,
                        "wood": s.wood,
                        "score": s.score,
                    }),
                },
            };
        }

        let mut narrative = format!(
            "Night falls. {} sheltered, {} in the open; {} food eaten.",
            sheltered, unsheltered, consumed
        );
        if s.food > i64::from(s.population) * 3 && s.shelters * SHELTER_CAPACITY >= s.population {
            s.population += 1;
            s.free_workers += 1;
            narrative.push_str(" A newcomer joins the settlement.");
        }
        narrative.push_str(&format!("\n{}", s.status()));

        StepOutcome::Continue {
            narrative,
            actions: StrategyActions::all(),
        }
    }
}

impl Default for SettlementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for SettlementSession {
    fn start(&mut self) -> Result<StepOutcome, EngineError> {
        match self.phase {
            Phase::Uninitialized => {}
            Phase::Ready => return Err(EngineError::AlreadyStarted),
            Phase::Terminal => return Err(EngineError::SessionEnded),
        }
        self.phase = Phase::Ready;

        Ok(StepOutcome::Continue {
            narrative: format!(
                "Your band settles in a forest clearing.\n{}",
                self.state.status()
            ),
            actions: StrategyActions::all(),
        })
    }

    fn step(&mut self, action: &str, args: &Value) -> Result<StepOutcome, EngineError> {
        match self.phase {
            Phase::Uninitialized => return Err(EngineError::NotStarted),
            Phase::Terminal => return Err(EngineError::SessionEnded),
            Phase::Ready => {}
        }

        let narrative = match action {
            "gather" => self.do_gather(args)?,
            "chop" => self.do_chop(args)?,
            "build" => self.do_build(args)?,
            "end_turn" => return Ok(self.do_end_turn()),
            other => format!("'{other}' is not something the settlement can do."),
        };

        Ok(StepOutcome::Continue {
            narrative,
            actions: StrategyActions::all(),
        })
    }

    fn cleanup(&mut self) {
        // In-memory only; nothing to release.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> SettlementSession {
        let mut session = SettlementSession::new();
        session.start().unwrap();
        session
    }

    #[test]
    fn test_opening_position() {
        let s = SettlementState::new();
        assert_eq!(
            (s.day, s.population, s.free_workers, s.shelters, s.food, s.wood, s.score),
            (1, 5, 5, 1, 10, 5, 0)
        );
    }

    #[test]
    fn test_gather_yield_is_bounded() {
        let mut session = started();
        session.step("gather", &json!({ "workers": 3 })).unwrap();

        let s = session.state();
        assert_eq!(s.free_workers, 2);
        // 3 workers bring 2-4 food each.
        assert!((16..=22).contains(&s.food), "food was {}", s.food);
        assert_eq!(s.wood, 5);
    }

    #[test]
    fn test_chop_yield_is_bounded() {
        let mut session = started();
        session.step("chop", &json!({ "workers": 2 })).unwrap();

        let s = session.state();
        assert_eq!(s.free_workers, 3);
        assert!((7..=9).contains(&s.wood), "wood was {}", s.wood);
        assert_eq!(s.food, 10);
    }

    #[test]
    fn test_gather_shortfall_changes_nothing() {
        let mut session = started();
        let outcome = session.step("gather", &json!({ "workers": 9 })).unwrap();

        assert!(outcome.narrative().contains("Only 5 workers are free"));
        let s = session.state();
        assert_eq!((s.food, s.wood, s.free_workers), (10, 5, 5));
    }

    #[test]
    fn test_build_and_wood_shortfall() {
        let mut session = started();
        let outcome = session.step("build", &json!({ "shelters": 1 })).unwrap();
        assert!(!outcome.is_ended());
        assert_eq!(session.state().shelters, 2);
        assert_eq!(session.state().wood, 0);

        let outcome = session.step("build", &json!({ "shelters": 1 })).unwrap();
        assert!(outcome.narrative().contains("needs 5 wood"));
        assert_eq!(session.state().shelters, 2);
    }

    #[test]
    fn test_end_turn_worked_example() {
        // From the opening position: 2 sheltered, 3 unsheltered, 8 food
        // eaten, no growth because 2 food is not above 15.
        let mut session = started();
        let outcome = session.step("end_turn", &json!({})).unwrap();
        assert!(!outcome.is_ended());

        let s = session.state();
        assert_eq!(s.day, 2);
        assert_eq!(s.food, 2);
        assert_eq!(s.population, 5);
        assert_eq!(s.free_workers, 5);
        assert_eq!(s.score, 2 + 1);
    }

    #[test]
    fn test_starvation_reports_survived_days() {
        let mut session = SettlementSession::with_state(SettlementState {
            food: 3,
            ..SettlementState::new()
        });
        session.start().unwrap();

        let outcome = session.step("end_turn", &json!({})).unwrap();
        let result = outcome.result().expect("starvation ends the game");
        assert_eq!(result.metadata["win"], false);
        assert_eq!(result.metadata["survived_days"], 2);
        assert!(matches!(
            session.step("end_turn", &json!({})),
            Err(EngineError::SessionEnded)
        ));
    }

    #[test]
    fn test_win_condition() {
        let mut session = SettlementSession::with_state(SettlementState {
            population: 20,
            free_workers: 20,
            shelters: 10,
            food: 100,
            ..SettlementState::new()
        });
        session.start().unwrap();

        let outcome = session.step("end_turn", &json!({})).unwrap();
        let result = outcome.result().expect("win ends the game");
        assert_eq!(result.metadata["win"], true);
        assert_eq!(result.metadata["population"], 20);
        assert_eq!(result.metadata["shelters"], 10);
    }

    #[test]
    fn test_growth_when_fed_and_housed() {
        // 3 shelters house 6 of 5 settlers; 30 food feeds everyone with
        // plenty left over, so the settlement grows.
        let mut session = SettlementSession::with_state(SettlementState {
            shelters: 3,
            food: 30,
            ..SettlementState::new()
        });
        session.start().unwrap();

        session.step("end_turn", &json!({})).unwrap();
        let s = session.state();
        assert_eq!(s.population, 6);
        assert_eq!(s.free_workers, 6);
    }

    #[test]
    fn test_unrecognized_action_soft_fails() {
        let mut session = started();
        let outcome = session.step("attack", &json!({})).unwrap();
        assert!(outcome.narrative().contains("not something"));
        assert!(!outcome.is_ended());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut session = started();
        let outcome = session.step("gather", &json!({ "workers": 0 })).unwrap();
        assert!(outcome.narrative().contains("at least one"));
        assert_eq!(session.state().free_workers, 5);
    }
}
