// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Review team composition.
//
// Two shapes are supported:
// - Panel: one coordinator who opens, synthesizes and closes, plus K >= 1
//   participants who speak in fixed order every round.
// - Individual: one primary reviewer and one critic who critiques the review.

use crate::domain::agent::Agent;
use crate::domain::error::ReviewError;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Team {
    Panel {
        coordinator: Agent,
        participants: Vec<Agent>,
    },
    Individual {
        primary: Agent,
        critic: Agent,
    },
}

/// Seat an agent occupies in a team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Coordinator,
    Participant,
    Primary,
    Critic,
}

impl Team {
    pub fn panel(coordinator: Agent, participants: Vec<Agent>) -> Self {
        Team::Panel {
            coordinator,
            participants,
        }
    }

    pub fn individual(primary: Agent, critic: Agent) -> Self {
        Team::Individual { primary, critic }
    }

    /// Enforce roster constraints; must pass before any backend call
    pub fn validate(&self) -> Result<(), ReviewError> {
        match self {
            Team::Panel {
                coordinator,
                participants,
            } => {
                if participants.is_empty() {
                    return Err(ReviewError::InvalidTeam(
                        "panel review requires at least one participant".to_string(),
                    ));
                }
                if participants.contains(coordinator) {
                    return Err(ReviewError::InvalidTeam(format!(
                        "coordinator '{}' must not also be a participant",
                        coordinator.title
                    )));
                }
                let mut seen = HashSet::new();
                for participant in participants {
                    if !seen.insert(participant) {
                        return Err(ReviewError::InvalidTeam(format!(
                            "participant '{}' appears more than once",
                            participant.title
                        )));
                    }
                }
                Ok(())
            }
            Team::Individual { primary, critic } => {
                if primary == critic {
                    return Err(ReviewError::InvalidTeam(format!(
                        "critic '{}' cannot review its own critique",
                        critic.title
                    )));
                }
                Ok(())
            }
        }
    }

    /// Agents in speaking order, each with its seat
    pub fn speaking_order(&self) -> Vec<(Seat, &Agent)> {
        match self {
            Team::Panel {
                coordinator,
                participants,
            } => std::iter::once((Seat::Coordinator, coordinator))
                .chain(participants.iter().map(|p| (Seat::Participant, p)))
                .collect(),
            Team::Individual { primary, critic } => {
                vec![(Seat::Primary, primary), (Seat::Critic, critic)]
            }
        }
    }

    /// Coordinator or primary; the only speaker of the final round
    pub fn lead(&self) -> &Agent {
        match self {
            Team::Panel { coordinator, .. } => coordinator,
            Team::Individual { primary, .. } => primary,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Team::Panel { participants, .. } => participants.len() + 1,
            Team::Individual { .. } => 2,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Team::Panel { .. } => "panel",
            Team::Individual { .. } => "individual",
        }
    }
}
