//! Player movement and status effects
//!
//! Status precedence is boost > slip > control lock > normal. The status is
//! derived from the timers each tick rather than stored, so it can never
//! drift out of sync with them.

use glam::Vec2;

use super::state::{Arena, Direction, Player};
use super::torus::{heading, wrap_point};
use crate::consts::*;

/// Movement status for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Crate boost active
    Boosted,
    /// Sliding out of a mud patch at triple speed
    Slipping,
    /// Slip has worn off but steering is still locked
    Stunned,
    Normal,
}

/// Color indicator the renderer paints the player with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTint {
    Neutral,
    Boosted,
    Muddy,
}

/// What a chaser hit did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still invincible from the last hit
    Ignored,
    /// Lost a life, back at the center
    Respawned,
    /// Out of lives
    Dead,
}

impl Player {
    pub fn status(&self, now: f64) -> Status {
        if now < self.speed_boost_until {
            Status::Boosted
        } else if self.slip > 0.0 {
            Status::Slipping
        } else if !self.controllable(now) {
            Status::Stunned
        } else {
            Status::Normal
        }
    }

    pub fn tint(&self, now: f64) -> PlayerTint {
        match self.status(now) {
            Status::Boosted => PlayerTint::Boosted,
            Status::Slipping | Status::Stunned => PlayerTint::Muddy,
            Status::Normal => PlayerTint::Neutral,
        }
    }

    /// Speed for a given status
    pub fn speed_for(status: Status) -> f32 {
        match status {
            Status::Boosted => PLAYER_BOOST_SPEED,
            Status::Slipping => PLAYER_SPEED * SLIP_SPEED_FACTOR,
            Status::Stunned | Status::Normal => PLAYER_SPEED,
        }
    }

    #[inline]
    pub fn controllable(&self, now: f64) -> bool {
        now >= self.control_disabled_until
    }

    #[inline]
    pub fn is_invincible(&self, now: f64) -> bool {
        now <= self.invincible_until
    }

    /// Apply a direction input; ignored while steering is locked.
    /// Returns whether the heading changed.
    pub fn steer(&mut self, dir: Direction, now: f64) -> bool {
        if !self.controllable(now) {
            return false;
        }
        self.heading = dir.angle();
        true
    }

    /// Move one tick along the current heading and wrap
    pub fn advance(&mut self, now: f64, arena: &Arena) -> Status {
        let status = self.status(now);
        let speed = Self::speed_for(status);
        if status == Status::Slipping {
            self.slip *= SLIP_DECAY;
            if self.slip < SLIP_EPSILON {
                self.slip = 0.0;
            }
        }
        self.pos = wrap_point(self.pos + heading(self.heading) * speed, arena);
        status
    }

    /// Slide into mud. Returns false if steering was already locked.
    pub fn hit_mud(&mut self, mud_size: f32, now: f64) -> bool {
        if !self.controllable(now) {
            return false;
        }
        self.control_disabled_until =
            now + MUD_LOCK_BASE_MS + f64::from(mud_size) * MUD_LOCK_PER_SIZE_MS;
        self.slip = 1.0;
        self.speed_boost_until = 0.0;
        true
    }

    /// Touched by a chaser
    pub fn take_hit(&mut self, now: f64, respawn_at: Vec2) -> HitOutcome {
        if self.is_invincible(now) {
            return HitOutcome::Ignored;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return HitOutcome::Dead;
        }
        self.pos = respawn_at;
        self.heading = 0.0;
        self.invincible_until = now + INVINCIBLE_MS;
        HitOutcome::Respawned
    }

    /// Smashed a speed crate
    pub fn grant_boost(&mut self, now: f64) {
        self.speed_boost_until = now + SPEED_BOOST_MS;
    }
}
