//! Per-unit decision policy: role dispatch, then an ordered priority chain.

use autopilot_core::{CivId, TurnContext, UnitId, UnitRole, World};
use tracing::{debug, trace};

use crate::config::AutomationConfig;
use crate::context::{AutomationContext, Services, UnitTurn};
use crate::error::AutomationError;
use crate::planners;

/// What a rule did with the unit's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The rule acted; later rules are skipped.
    Handled,
    /// The rule did not apply and left the unit untouched.
    NotApplicable,
}

/// One step of the priority chain.
pub trait Rule {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        ctx: &mut AutomationContext<'_>,
        turn: &mut UnitTurn,
    ) -> Result<Outcome, AutomationError>;
}

/// Loots a ruin in range; ends the decision only if that used up the turn.
pub struct LootRuins;

impl Rule for LootRuins {
    fn name(&self) -> &'static str {
        "loot-ruins"
    }

    fn evaluate(
        &self,
        ctx: &mut AutomationContext<'_>,
        turn: &mut UnitTurn,
    ) -> Result<Outcome, AutomationError> {
        let moved = planners::try_go_to_ruin(ctx, turn)?;
        Ok(if moved && !turn.can_act(ctx.world) {
            Outcome::Handled
        } else {
            Outcome::NotApplicable
        })
    }
}

/// Heals and ends the decision when health is below the threshold.
pub struct HealBelow(pub i32);

impl Rule for HealBelow {
    fn name(&self) -> &'static str {
        "heal"
    }

    fn evaluate(
        &self,
        ctx: &mut AutomationContext<'_>,
        turn: &mut UnitTurn,
    ) -> Result<Outcome, AutomationError> {
        let wounded = ctx.world.unit(turn.unit).is_some_and(|u| u.health < self.0);
        if !wounded {
            return Ok(Outcome::NotApplicable);
        }
        planners::heal_unit(ctx, turn)?;
        Ok(Outcome::Handled)
    }
}

/// Always handles the turn by exploring.
pub struct Explore;

impl Rule for Explore {
    fn name(&self) -> &'static str {
        "explore"
    }

    fn evaluate(
        &self,
        ctx: &mut AutomationContext<'_>,
        turn: &mut UnitTurn,
    ) -> Result<Outcome, AutomationError> {
        let radius = ctx.config.explore_radius;
        planners::explore(ctx, turn, radius)?;
        Ok(Outcome::Handled)
    }
}

type Step = fn(&mut AutomationContext<'_>, &mut UnitTurn) -> Result<Outcome, AutomationError>;

/// A rule backed by a planner function.
pub struct PlannerRule {
    name: &'static str,
    step: Step,
}

impl PlannerRule {
    pub const fn new(name: &'static str, step: Step) -> Self {
        Self { name, step }
    }
}

impl Rule for PlannerRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(
        &self,
        ctx: &mut AutomationContext<'_>,
        turn: &mut UnitTurn,
    ) -> Result<Outcome, AutomationError> {
        (self.step)(ctx, turn)
    }
}

/// The standard priority chain for military units.
pub fn default_chain(config: &AutomationConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(LootRuins),
        Box::new(PlannerRule::new("upgrade", planners::try_upgrade)),
        Box::new(PlannerRule::new("accompany-founder", planners::try_accompany_settler)),
        Box::new(HealBelow(config.heal_below_critical)),
        Box::new(PlannerRule::new("attack", planners::try_attack)),
        Box::new(PlannerRule::new("garrison", planners::try_garrison)),
        Box::new(HealBelow(config.heal_below_wounded)),
        Box::new(PlannerRule::new(
            "advance-on-enemy",
            planners::try_advance_towards_close_enemy,
        )),
        Box::new(HealBelow(config.heal_below_full)),
        Box::new(PlannerRule::new(
            "head-for-enemy-city",
            planners::try_head_towards_enemy_city,
        )),
        Box::new(Explore),
    ]
}

/// Decides automated units one at a time against the live world.
pub struct UnitAutomation {
    services: Services,
    config: AutomationConfig,
    chain: Vec<Box<dyn Rule>>,
}

impl UnitAutomation {
    pub fn new(services: Services, config: AutomationConfig, chain: Vec<Box<dyn Rule>>) -> Self {
        Self {
            services,
            config,
            chain,
        }
    }

    /// Reference collaborators and the default chain.
    pub fn standard(config: AutomationConfig) -> Self {
        let services = Services::standard(&config);
        let chain = default_chain(&config);
        Self::new(services, config, chain)
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    fn context<'a>(&'a self, world: &'a mut World, turn: TurnContext) -> AutomationContext<'a> {
        AutomationContext {
            world,
            services: &self.services,
            config: &self.config,
            turn,
        }
    }

    /// Plays one unit's turn. A missing unit is a no-op.
    pub fn decide(
        &self,
        world: &mut World,
        turn: TurnContext,
        unit: UnitId,
    ) -> Result<(), AutomationError> {
        let Some(role) = world.unit_kind(unit).map(|k| k.role()) else {
            trace!("unit {unit}: gone before its decision");
            return Ok(());
        };
        let mut ctx = self.context(world, turn);
        let mut unit_turn = UnitTurn::new(unit);

        match role {
            UnitRole::Founder => return planners::automate_settler(&mut ctx, &mut unit_turn),
            UnitRole::Worker => return self.services.workers.automate_worker(ctx.world, unit),
            UnitRole::NavalImprover => {
                return planners::automate_work_boats(&mut ctx, &mut unit_turn)
            }
            UnitRole::Special => {
                trace!("unit {unit}: no automation for this kind");
                return Ok(());
            }
            UnitRole::Combat => {}
        }

        for rule in &self.chain {
            if !unit_turn.can_act(ctx.world) {
                break;
            }
            match rule.evaluate(&mut ctx, &mut unit_turn)? {
                Outcome::Handled => {
                    debug!("unit {unit}: handled by {}", rule.name());
                    break;
                }
                Outcome::NotApplicable => trace!("unit {unit}: {} not applicable", rule.name()),
            }
        }
        Ok(())
    }

    /// Explore-only automation for units the player set to explore.
    pub fn automated_explore(
        &self,
        world: &mut World,
        turn: TurnContext,
        unit: UnitId,
    ) -> Result<(), AutomationError> {
        let mut ctx = self.context(world, turn);
        let mut unit_turn = UnitTurn::new(unit);
        if !unit_turn.can_act(ctx.world) {
            return Ok(());
        }
        planners::automated_explore(&mut ctx, &mut unit_turn)
    }

    /// Decides every automated unit of `civ` in id order and returns how many
    /// were decided. Units removed by an earlier decision are skipped.
    pub fn decide_civilization(
        &self,
        world: &mut World,
        turn: TurnContext,
        civ: CivId,
    ) -> Result<usize, AutomationError> {
        let mut decided = 0;
        for unit in world.units_of(civ) {
            if !world.unit(unit).is_some_and(|u| u.automated) {
                continue;
            }
            self.decide(world, turn, unit)?;
            decided += 1;
        }
        debug!("civ {}: decided {decided} units on turn {}", civ.0, turn.turn);
        Ok(decided)
    }
}
