use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Probability that a node starts occupied.
    pub occupation_frac: f64,
    /// Per-generation probability that an occupied node dies.
    pub p_death: f64,
    /// Friendliness every node starts with.
    pub initial_friendliness: f64,
    /// Probability that an offspring is placed at the nearest empty site
    /// rather than a uniformly random one.
    pub local_reproduction: f64,
    /// Probability that an offspring's inherited friendliness mutates.
    pub mutation: f64,
    /// Payoff for defecting against a cooperator.
    pub temptation: f64,
    /// Payoff for mutual cooperation.
    pub reward: f64,
    /// Payoff for mutual defection.
    pub punishment: f64,
    /// Payoff for cooperating against a defector.
    pub sucker: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            occupation_frac: 0.6,
            p_death: 0.05,
            initial_friendliness: 0.0,
            local_reproduction: 0.9,
            mutation: 0.2,
            temptation: 1.1,
            reward: 1.0,
            punishment: 0.0,
            sucker: -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidOccupationFrac,
    InvalidDeathProbability,
    InvalidInitialFriendliness,
    InvalidLocalReproduction,
    InvalidMutationProbability,
    NonFinitePayoff,
    PayoffOrderingViolated {
        temptation: f64,
        reward: f64,
        punishment: f64,
        sucker: f64,
    },
}

impl std::fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimConfigError::InvalidOccupationFrac => {
                write!(f, "occupation_frac must be a probability in [0, 1]")
            }
            SimConfigError::InvalidDeathProbability => {
                write!(f, "p_death must be a probability in [0, 1]")
            }
            SimConfigError::InvalidInitialFriendliness => {
                write!(f, "initial_friendliness must lie in [0, 1]")
            }
            SimConfigError::InvalidLocalReproduction => {
                write!(f, "local_reproduction must be a probability in [0, 1]")
            }
            SimConfigError::InvalidMutationProbability => {
                write!(f, "mutation must be a probability in [0, 1]")
            }
            SimConfigError::NonFinitePayoff => {
                write!(f, "payoff entries must be finite")
            }
            SimConfigError::PayoffOrderingViolated {
                temptation,
                reward,
                punishment,
                sucker,
            } => write!(
                f,
                "payoffs must satisfy temptation > reward > punishment > sucker \
                 (got {temptation}, {reward}, {punishment}, {sucker})"
            ),
        }
    }
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_probabilities()?;
        self.validate_payoffs()?;
        Ok(())
    }

    fn validate_probabilities(&self) -> Result<(), SimConfigError> {
        if !probability(self.occupation_frac) {
            return Err(SimConfigError::InvalidOccupationFrac);
        }
        if !probability(self.p_death) {
            return Err(SimConfigError::InvalidDeathProbability);
        }
        if !probability(self.initial_friendliness) {
            return Err(SimConfigError::InvalidInitialFriendliness);
        }
        if !probability(self.local_reproduction) {
            return Err(SimConfigError::InvalidLocalReproduction);
        }
        if !probability(self.mutation) {
            return Err(SimConfigError::InvalidMutationProbability);
        }
        Ok(())
    }

    fn validate_payoffs(&self) -> Result<(), SimConfigError> {
        let payoffs = [self.temptation, self.reward, self.punishment, self.sucker];
        if payoffs.iter().any(|p| !p.is_finite()) {
            return Err(SimConfigError::NonFinitePayoff);
        }
        // Strict Prisoner's Dilemma ordering.
        if !(self.temptation > self.reward
            && self.reward > self.punishment
            && self.punishment > self.sucker)
        {
            return Err(SimConfigError::PayoffOrderingViolated {
                temptation: self.temptation,
                reward: self.reward,
                punishment: self.punishment,
                sucker: self.sucker,
            });
        }
        Ok(())
    }
}

fn probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_temptation_not_above_reward() {
        let config = SimConfig {
            temptation: 1.0,
            reward: 1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::PayoffOrderingViolated { .. })
        ));
    }

    #[test]
    fn rejects_reward_not_above_punishment() {
        let config = SimConfig {
            reward: 0.0,
            punishment: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::PayoffOrderingViolated { .. })
        ));
    }

    #[test]
    fn rejects_punishment_not_above_sucker() {
        let config = SimConfig {
            punishment: -1.0,
            sucker: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::PayoffOrderingViolated { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_payoff() {
        let config = SimConfig {
            temptation: f64::NAN,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::NonFinitePayoff));
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        let cases = [
            (
                SimConfig {
                    occupation_frac: 1.5,
                    ..SimConfig::default()
                },
                SimConfigError::InvalidOccupationFrac,
            ),
            (
                SimConfig {
                    p_death: -0.1,
                    ..SimConfig::default()
                },
                SimConfigError::InvalidDeathProbability,
            ),
            (
                SimConfig {
                    initial_friendliness: 2.0,
                    ..SimConfig::default()
                },
                SimConfigError::InvalidInitialFriendliness,
            ),
            (
                SimConfig {
                    local_reproduction: f64::NAN,
                    ..SimConfig::default()
                },
                SimConfigError::InvalidLocalReproduction,
            ),
            (
                SimConfig {
                    mutation: 1.01,
                    ..SimConfig::default()
                },
                SimConfigError::InvalidMutationProbability,
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn partial_config_json_deserializes_with_defaults() {
        let json = r#"{
            "seed": 7,
            "occupation_frac": 1.0
        }"#;
        let config: SimConfig = serde_json::from_str(json).expect("partial config should parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.occupation_frac, 1.0);
        assert_eq!(config.p_death, SimConfig::default().p_death);
        assert_eq!(config.temptation, SimConfig::default().temptation);
        assert_eq!(config.validate(), Ok(()));
    }
}
