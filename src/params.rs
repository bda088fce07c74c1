//! Sampling parameters that can be a constant, a range or a list of choices.
//!
//! JSON forms: `{"fixed": 0.2}`, `{"range": [0.1, 0.4]}`,
//! `{"choices": [0.5, 1.0, 2.0]}`.

use crate::error::{Result, SynthError};
use rand::distributions::uniform::SampleUniform;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter<T> {
    Fixed(T),
    /// Uniform draw in the closed interval; bounds may be given in any order.
    Range(T, T),
    Choices(Vec<T>),
}

impl<T> Parameter<T>
where
    T: Copy + PartialOrd + SampleUniform,
{
    /// Draw one concrete value.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T> {
        match self {
            Parameter::Fixed(v) => Ok(*v),
            Parameter::Range(a, b) => {
                let (lo, hi) = if a <= b { (*a, *b) } else { (*b, *a) };
                Ok(rng.gen_range(lo..=hi))
            }
            Parameter::Choices(values) => values
                .choose(rng)
                .copied()
                .ok_or_else(|| SynthError::InvalidParameter("empty choice list".into())),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Parameter::Choices(values) if values.is_empty() => Err(SynthError::InvalidParameter(
                "empty choice list".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl<T> From<T> for Parameter<T> {
    fn from(value: T) -> Self {
        Parameter::Fixed(value)
    }
}

/// Draw from `a + (b - a) * u`, `u` in `[0, 1)`.
///
/// Unlike `gen_range` this accepts `b < a` and then yields values below `a`,
/// which the text-box sampler relies on to detect boxes that cannot fit.
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    a + (b - a) * rng.gen::<f32>()
}
