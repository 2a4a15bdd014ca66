use autopilot_core::{Hex, TurnContext, UnitId, World};
use autopilot_nav::{to_milli, HexNavigator, MovementRange, Navigator};
use tracing::trace;

use crate::actions::{ActionCatalog, StandardActionCatalog};
use crate::combat::{CombatResolver, StrengthCombatResolver};
use crate::config::AutomationConfig;
use crate::error::AutomationError;
use crate::ranker::{TileValuer, YieldTileValuer};

/// Tile-improvement automation for workers, owned by the host game.
pub trait WorkerAutomation {
    fn automate_worker(&self, world: &mut World, unit: UnitId) -> Result<(), AutomationError>;
}

/// Leaves workers where they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleWorkers;

impl WorkerAutomation for IdleWorkers {
    fn automate_worker(&self, _world: &mut World, unit: UnitId) -> Result<(), AutomationError> {
        trace!("unit {unit}: worker automation not provided");
        Ok(())
    }
}

/// The external collaborators a decision consults.
pub struct Services {
    pub navigator: Box<dyn Navigator>,
    pub combat: Box<dyn CombatResolver>,
    pub actions: Box<dyn ActionCatalog>,
    pub valuer: Box<dyn TileValuer>,
    pub workers: Box<dyn WorkerAutomation>,
}

impl Services {
    /// Reference implementations of every collaborator.
    pub fn standard(config: &AutomationConfig) -> Self {
        Self {
            navigator: Box::new(HexNavigator),
            combat: Box::new(StrengthCombatResolver),
            actions: Box::new(StandardActionCatalog::from_config(config)),
            valuer: Box::new(YieldTileValuer),
            workers: Box::new(IdleWorkers),
        }
    }
}

/// Everything a planner may read or act through while deciding one unit.
pub struct AutomationContext<'a> {
    pub world: &'a mut World,
    pub services: &'a Services,
    pub config: &'a AutomationConfig,
    pub turn: TurnContext,
}

impl<'a> AutomationContext<'a> {
    // These borrow the services, not the context, so `world` stays usable.
    pub fn navigator(&self) -> &'a dyn Navigator {
        self.services.navigator.as_ref()
    }

    pub fn actions(&self) -> &'a dyn ActionCatalog {
        self.services.actions.as_ref()
    }
}

/// The unit being decided plus its cached movement range.
///
/// `refresh` recomputes the range only when the unit's position or remaining
/// movement changed since the last computation, so calling it is always safe.
#[derive(Debug, Clone)]
pub struct UnitTurn {
    pub unit: UnitId,
    range: MovementRange,
    computed_for: Option<(Hex, u32)>,
}

impl UnitTurn {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            range: MovementRange::new(Hex::default(), 0),
            computed_for: None,
        }
    }

    pub fn refresh(&mut self, ctx: &AutomationContext<'_>) -> &MovementRange {
        let state = ctx
            .world
            .unit(self.unit)
            .map(|u| (u.position, to_milli(u.movement)));
        if state != self.computed_for || state.is_none() {
            self.range = match state {
                Some(_) => ctx.navigator().movement_range(ctx.world, self.unit),
                None => MovementRange::new(Hex::default(), 0),
            };
            self.computed_for = state;
        }
        &self.range
    }

    /// Whether the unit still exists and can act this turn.
    pub fn can_act(&self, world: &World) -> bool {
        world.unit(self.unit).is_some_and(|u| u.has_movement_left())
    }
}
