use std::str::FromStr;

use thiserror::Error;

use super::physics::{ArcadeWorld, BodyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenProperty {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => t * (2.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Ease::SineInOut => 0.5 * (1.0 - (std::f32::consts::PI * t).cos()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ease '{0}'")]
pub struct UnknownEase(pub String);

impl FromStr for Ease {
    type Err = UnknownEase;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Linear" | "Power0" => Ok(Ease::Linear),
            "Quad.easeIn" | "Power1.easeIn" => Ok(Ease::QuadIn),
            "Quad.easeOut" | "Power1.easeOut" | "Power1" => Ok(Ease::QuadOut),
            "Quad.easeInOut" | "Power1.easeInOut" => Ok(Ease::QuadInOut),
            "Sine.easeInOut" => Ok(Ease::SineInOut),
            other => Err(UnknownEase(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    Times(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenConfig {
    pub target: BodyId,
    pub property: TweenProperty,
    pub to: f32,
    pub duration_ms: f32,
    pub ease: Ease,
    pub yoyo: bool,
    pub repeat: Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    Playing,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Tween {
    id: TweenId,
    config: TweenConfig,
    from: f32,
    elapsed_ms: f64,
    state: TweenState,
}

impl Tween {
    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    pub fn start_value(&self) -> f32 {
        self.from
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    fn cycle_ms(&self) -> f64 {
        let one_way = self.config.duration_ms as f64;
        if self.config.yoyo {
            one_way * 2.0
        } else {
            one_way
        }
    }

    fn advance(&mut self, dt_ms: f64) -> f32 {
        if self.state == TweenState::Complete {
            return self.end_value();
        }
        let cycle = self.cycle_ms();
        if cycle <= 0.0 {
            self.state = TweenState::Complete;
            return self.end_value();
        }

        self.elapsed_ms += dt_ms.max(0.0);
        match self.config.repeat {
            Repeat::Forever => {
                self.elapsed_ms %= cycle;
            }
            Repeat::Times(count) => {
                let total = cycle * (count as f64 + 1.0);
                if self.elapsed_ms >= total {
                    self.state = TweenState::Complete;
                    return self.end_value();
                }
            }
        }
        self.value_at(self.elapsed_ms % cycle)
    }

    fn value_at(&self, cycle_elapsed_ms: f64) -> f32 {
        let one_way = self.config.duration_ms as f64;
        let progress = if cycle_elapsed_ms < one_way {
            cycle_elapsed_ms / one_way
        } else {
            1.0 - (cycle_elapsed_ms - one_way) / one_way
        };
        let eased = self.config.ease.apply(progress as f32);
        self.from + (self.config.to - self.from) * eased
    }

    fn end_value(&self) -> f32 {
        if self.config.yoyo {
            self.from
        } else {
            self.config.to
        }
    }
}

/// Owns running tweens and writes their values onto physics bodies.
#[derive(Debug, Default)]
pub struct TweenManager {
    tweens: Vec<Tween>,
}

impl TweenManager {
    /// Starts a tween from the target's current value. Returns `None` when the
    /// target body does not exist.
    pub fn add(&mut self, config: TweenConfig, physics: &ArcadeWorld) -> Option<TweenId> {
        let body = physics.body(config.target)?;
        let from = match config.property {
            TweenProperty::X => body.position().x,
            TweenProperty::Y => body.position().y,
        };
        let id = TweenId(self.tweens.len() as u32);
        self.tweens.push(Tween {
            id,
            config,
            from,
            elapsed_ms: 0.0,
            state: TweenState::Playing,
        });
        Some(id)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn advance(&mut self, dt_seconds: f32, physics: &mut ArcadeWorld) {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return;
        }
        let dt_ms = dt_seconds as f64 * 1000.0;
        for tween in &mut self.tweens {
            if tween.state == TweenState::Complete {
                continue;
            }
            let value = tween.advance(dt_ms);
            let Some(body) = physics.body_mut(tween.config.target) else {
                continue;
            };
            match tween.config.property {
                TweenProperty::X => body.set_x(value),
                TweenProperty::Y => body.set_y(value),
            }
        }
    }
}
