//! Scenario builder.

use smallvec::SmallVec;

use crate::ball::Ball;
use crate::core::{DiceStream, Match, MatchConfig, SetupError, TeamId, TeamMap, Transcript, UnitId};
use crate::pitch::Position;
use crate::rules::{Phase, TurnState};
use crate::units::{RosterKind, Skill, Stats, Unit, UnitState};

#[derive(Clone, Debug)]
enum Template {
    Role(String),
    Custom(Stats),
}

#[derive(Clone, Debug)]
struct Placement {
    team: TeamId,
    template: Template,
    at: Position,
    skills: SmallVec<[Skill; 4]>,
    state: UnitState,
}

#[derive(Clone, Copy, Debug)]
enum BallSpec {
    Loose(Position),
    Carried(UnitId),
    OffPitch,
}

/// Builder for a match already in active play.
///
/// Units get ids in the order they are added, starting at `UnitId(1)`, so
/// the n-th `unit`/`custom` call yields `UnitId(n)`.
///
/// ```
/// use gridball::scenario::ScenarioBuilder;
/// use gridball::{Position, TeamId, UnitId};
///
/// let m = ScenarioBuilder::new("drill")
///     .unit(TeamId::HOME, "Blitzer", Position::new(5, 7))
///     .unit(TeamId::AWAY, "Apprentice", Position::new(6, 7))
///     .ball_carried(UnitId(1))
///     .build()?;
///
/// assert_eq!(m.ball().carrier(), Some(UnitId(1)));
/// assert_eq!(m.active_team(), Some(TeamId::HOME));
/// # Ok::<(), gridball::core::SetupError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    id: String,
    config: MatchConfig,
    rosters: TeamMap<RosterKind>,
    dice: DiceStream,
    placements: Vec<Placement>,
    ball: BallSpec,
    active: TeamId,
    half: u8,
    turns: TeamMap<u8>,
    rerolls: TeamMap<u8>,
    score: TeamMap<u8>,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self {
            id: "scenario".to_string(),
            config: MatchConfig::default(),
            rosters: TeamMap::new(|t| {
                if t == TeamId::HOME {
                    RosterKind::Watch
                } else {
                    RosterKind::Academy
                }
            }),
            dice: DiceStream::seeded(0),
            placements: Vec::new(),
            ball: BallSpec::OffPitch,
            active: TeamId::HOME,
            half: 1,
            turns: TeamMap::with_value(0),
            rerolls: TeamMap::with_value(0),
            score: TeamMap::with_value(0),
        }
    }
}

impl ScenarioBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn roster(mut self, team: TeamId, roster: RosterKind) -> Self {
        self.rosters[team] = roster;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.dice = DiceStream::seeded(seed);
        self
    }

    /// Scripted die faces, consumed in order before a fixed fallback stream.
    #[must_use]
    pub fn dice(mut self, faces: impl IntoIterator<Item = u8>) -> Self {
        self.dice = DiceStream::scripted(faces);
        self
    }

    /// Add a unit of a roster role.
    #[must_use]
    pub fn unit(mut self, team: TeamId, role: impl Into<String>, at: Position) -> Self {
        self.placements.push(Placement {
            team,
            template: Template::Role(role.into()),
            at,
            skills: SmallVec::new(),
            state: UnitState::Standing,
        });
        self
    }

    /// Add a unit with explicit stats and no skills.
    #[must_use]
    pub fn custom(mut self, team: TeamId, stats: Stats, at: Position) -> Self {
        self.placements.push(Placement {
            team,
            template: Template::Custom(stats),
            at,
            skills: SmallVec::new(),
            state: UnitState::Standing,
        });
        self
    }

    /// Give the most recently added unit a skill.
    #[must_use]
    pub fn skill(mut self, skill: Skill) -> Self {
        if let Some(last) = self.placements.last_mut() {
            if !last.skills.contains(&skill) {
                last.skills.push(skill);
            }
        }
        self
    }

    /// Set the most recently added unit's state (Standing, Prone, Stunned).
    #[must_use]
    pub fn state(mut self, state: UnitState) -> Self {
        if let Some(last) = self.placements.last_mut() {
            last.state = state;
        }
        self
    }

    #[must_use]
    pub fn ball_loose(mut self, at: Position) -> Self {
        self.ball = BallSpec::Loose(at);
        self
    }

    #[must_use]
    pub fn ball_carried(mut self, carrier: UnitId) -> Self {
        self.ball = BallSpec::Carried(carrier);
        self
    }

    /// The team to act. Defaults to home.
    #[must_use]
    pub fn active(mut self, team: TeamId) -> Self {
        self.active = team;
        self
    }

    #[must_use]
    pub fn half(mut self, half: u8) -> Self {
        self.half = half.clamp(1, 2);
        self
    }

    /// Turns `team` has started this half, including the current one.
    #[must_use]
    pub fn turns(mut self, team: TeamId, turns: u8) -> Self {
        self.turns[team] = turns;
        self
    }

    #[must_use]
    pub fn rerolls(mut self, team: TeamId, rerolls: u8) -> Self {
        self.rerolls[team] = rerolls;
        self
    }

    #[must_use]
    pub fn score(mut self, team: TeamId, score: u8) -> Self {
        self.score[team] = score;
        self
    }

    /// Build the match in ActivePlay.
    ///
    /// Fails on an unknown role, an out-of-bounds or doubly used cell, or a
    /// ball carrier that is not a standing unit of the scenario.
    pub fn build(self) -> Result<Match, SetupError> {
        let mut m = Match::new(self.id, self.config, self.rosters, self.dice);
        let mut log = Transcript::new();

        for placement in self.placements {
            if !m.pitch.in_bounds(placement.at) {
                return Err(SetupError::OutOfBounds(placement.at));
            }
            if m.pitch.is_occupied(placement.at) {
                return Err(SetupError::Occupied(placement.at));
            }

            let id = m.allocate_unit_id();
            let mut unit = match &placement.template {
                Template::Role(name) => {
                    let spec = m
                        .team(placement.team)
                        .roster
                        .role(name)
                        .ok_or_else(|| SetupError::UnknownRole(name.clone()))?;
                    Unit::from_role(id, placement.team, spec)
                }
                Template::Custom(stats) => Unit::new(id, placement.team, "Custom", *stats),
            };
            for skill in placement.skills {
                unit = unit.with_skill(skill);
            }
            unit.state = placement.state;

            m.units.insert(id, unit);
            m.team_mut(placement.team).units.push(id);
            m.relocate(id, placement.at, &mut log);
        }

        m.ball = match self.ball {
            BallSpec::OffPitch => Ball::OffPitch,
            BallSpec::Loose(at) if m.pitch.in_bounds(at) => Ball::Loose(at),
            BallSpec::Loose(at) => return Err(SetupError::OutOfBounds(at)),
            BallSpec::Carried(id) => match m.unit(id) {
                Some(unit) if unit.is_standing() => Ball::Carried(id),
                _ => return Err(SetupError::UnknownUnit(id)),
            },
        };

        for team in TeamId::both() {
            m.team_mut(team).rerolls = self.rerolls[team];
            m.team_mut(team).ready = true;
        }
        m.score = self.score;
        m.turn_counters = self.turns;
        if m.turn_counters[self.active] == 0 {
            m.turn_counters[self.active] = 1;
        }
        m.half = self.half;
        m.phase = Phase::ActivePlay;
        m.turn = Some(TurnState::new(self.active));
        Ok(m)
    }
}
