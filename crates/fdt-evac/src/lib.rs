//! `fdt-evac` — evacuation modelling and planning.
//!
//! Evacuation is encoded as a Markov Decision Process:
//!
//! - **State**: per-zone flood depth and evacuated count, per-shelter
//!   occupancy, time step ([`EvacuationState`]).
//! - **Action**: one `(zone, shelter)` pair, encoded as
//!   `zone_index * shelter_count + shelter_index`.
//! - **Transition / reward**: [`EvacuationEnv::step`].
//!
//! A [`Policy`] maps an observation to a probability per action.  The
//! [`EvacuationPlanner`] queries it once and turns the distribution into a
//! concrete plan; [`run_episode`] rolls a policy through a whole episode.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`records`]  | `ZoneRecord`, `ShelterRecord`, `RouteRecord`, CSV loading     |
//! | [`env`]      | `EvacuationEnv`, `EvacuationState`, `StepOutcome`             |
//! | [`policy`]   | `Policy` trait, `ActorCritic`, `UniformPolicy`                |
//! | [`planner`]  | `EvacuationPlanner`, `PlanningRequest`, `EvacuationPlan`      |
//! | [`routes`]   | route selection, closures, `filter_routes`                    |
//! | [`shelters`] | `quick_recommendations`, `ShelterCapacityOverview`            |
//! | [`rollout`]  | `run_episode`, `EpisodeSummary`                               |
//! | [`error`]    | `EvacError`, `EvacResult<T>`                                  |

pub mod env;
pub mod error;
pub mod planner;
pub mod policy;
pub mod records;
pub mod rollout;
pub mod routes;
pub mod shelters;


pub use env::{ActionOutcome, EvacuationEnv, EvacuationState, StepInfo, StepOutcome};
pub use error::{EvacError, EvacResult};
pub use planner::{EvacuationPlan, EvacuationPlanner, PlanningRequest, RecommendedRoute};
pub use policy::{ActorCritic, ActorCriticParams, Policy, UniformPolicy};
pub use records::{RouteRecord, RouteStatus, ShelterRecord, ZoneRecord, load_records, read_records};
pub use rollout::{ActionSelection, EpisodeSummary, run_episode};
pub use routes::{filter_routes, roads_to_close, select_route};
pub use shelters::{ShelterCapacity, ShelterCapacityOverview, ShelterRecommendation, quick_recommendations};
