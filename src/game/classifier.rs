use serde::{ Serialize, Deserialize };
use thiserror::Error;
use super::config::NUM_FEATURES;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("model expects {expected} weights, found {actual}")]
pub struct ArityError {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Deserialize)]
struct RawRoleModel {
    weights: Vec<f32>,
    bias: f32,
}

/// Logistic model over the ball offset `[dx, dy]` seen from a player.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "RawRoleModel")]
pub struct RoleModel {
    pub weights: [f32; NUM_FEATURES],
    pub bias: f32,
}

impl TryFrom<RawRoleModel> for RoleModel {
    type Error = ArityError;

    fn try_from(raw: RawRoleModel) -> Result<Self, Self::Error> {
        let actual = raw.weights.len();
        let weights = raw.weights.try_into().map_err(|_| ArityError {
            expected: NUM_FEATURES,
            actual,
        })?;
        Ok(Self { weights, bias: raw.bias })
    }
}

#[inline(always)]
pub fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

/// Probability of the positive action for the given features.
pub fn decide(model: &RoleModel, features: [f32; NUM_FEATURES]) -> f32 {
    let z = model
        .weights
        .iter()
        .zip(features)
        .fold(model.bias, |z, (w, f)| z + w * f);
    sigmoid(z)
}

impl RoleModel {
    /// True when the model's probability is strictly above `threshold`.
    pub fn predicts(&self, features: [f32; NUM_FEATURES], threshold: f32) -> bool {
        decide(self, features) > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_logit_is_even_odds() {
        let model = RoleModel { weights: [0.0, 0.0], bias: 0.0 };
        assert_eq!(decide(&model, [12.0, -4.0]), 0.5);
        assert!(!model.predicts([12.0, -4.0], 0.5));
    }

    #[test]
    fn weights_and_bias_combine_linearly() {
        let model = RoleModel { weights: [1.0, -2.0], bias: 0.5 };
        // z = 0.5 + 3 - 2 = 1.5
        let p = decide(&model, [3.0, 1.0]);
        assert!((p - sigmoid(1.5)).abs() < 1e-6);
        assert!(model.predicts([3.0, 1.0], 0.5));
        assert!(!model.predicts([-3.0, 1.0], 0.5));
    }

    #[test]
    fn output_stays_in_unit_interval() {
        let model = RoleModel { weights: [0.01, 0.01], bias: 0.0 };
        for f in [-700.0, -1.0, 0.0, 1.0, 700.0] {
            let p = decide(&model, [f, f]);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn parses_model_json() {
        let model: RoleModel = serde_json::from_str(r#"{"weights":[0.25,-1.5],"bias":0.1}"#).unwrap();
        assert_eq!(model.weights, [0.25, -1.5]);
        assert_eq!(model.bias, 0.1);
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = serde_json::from_str::<RoleModel>(r#"{"weights":[1.0,2.0,3.0],"bias":0}"#).unwrap_err();
        assert!(err.to_string().contains("expects 2 weights, found 3"));
    }
}
