//! Canvas 2D renderer
//!
//! Draws straight from `GameState`; nothing here feeds back into the
//! simulation. Animation phases (blink, eye roll) run off the sim clock so
//! they freeze with the game.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::highscores::HighScoreBoard;
use crate::settings::Settings;
use crate::sim::{Chaser, GamePhase, GameState, MudPatch, PlayerTint};

const MUD_BASE: &str = "#3d2817";
const MUD_SPOT: &str = "#4a3423";
const MUD_SHINE: &str = "#5c412c";
const CHASER_GREEN: &str = "green";
const KEY_GOLD: &str = "gold";
const CRATE_WOOD: &str = "#8B4513";
const CRATE_GRAIN: &str = "#654321";
const BOLT_BLUE: &str = "#00BFFF";
const BOLT_GLOW: &str = "rgba(0, 191, 255, 0.3)";

/// Invincibility blink half-period
const BLINK_MS: f64 = 300.0;

fn tint_color(tint: PlayerTint) -> &'static str {
    match tint {
        PlayerTint::Neutral => "yellow",
        PlayerTint::Boosted => "skyblue",
        PlayerTint::Muddy => "#8B4513",
    }
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    /// Draw one frame for the current phase
    pub fn render(&self, state: &GameState, settings: &Settings, scores: &HighScoreBoard) {
        let result = match state.phase {
            GamePhase::Start => self.render_start(state, scores),
            GamePhase::Playing => self.render_playing(state, settings),
            GamePhase::GameOver => self.render_game_over(scores),
        };
        if let Err(e) = result {
            log::warn!("Render failed: {e:?}");
        }
    }

    fn clear(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn circle(&self, x: f64, y: f64, r: f64, color: &str) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn render_start(&self, state: &GameState, scores: &HighScoreBoard) -> Result<(), JsValue> {
        self.clear("#000033");
        for star in &state.stars {
            self.circle(
                f64::from(star.pos.x),
                f64::from(star.pos.y),
                f64::from(star.radius),
                "yellow",
            )?;
        }

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let ctx = &self.ctx;
        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        ctx.set_font("60px monospace");
        ctx.fill_text("Welcome to Escapae!", cx, cy - 100.0)?;

        ctx.set_font("30px monospace");
        ctx.fill_text(
            "Deep underground, collect golden keys while avoiding giant slimes",
            cx,
            cy - 20.0,
        )?;
        ctx.fill_text(
            "and mud patches. Find enough keys to help you escapae!",
            cx,
            cy + 20.0,
        )?;

        ctx.set_font("40px monospace");
        ctx.fill_text("Press SPACE or click Start to begin your escape", cx, cy + 100.0)?;

        ctx.set_font("24px monospace");
        ctx.fill_text(&format!("High Score: {}", scores.global), cx, cy + 160.0)?;
        Ok(())
    }

    fn render_playing(&self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        self.clear("black");
        let now = state.clock_ms;

        for mud in &state.mud {
            self.draw_mud(mud)?;
        }

        let player = &state.player;
        let blink_off = player.is_invincible(now) && (now / BLINK_MS).floor() as i64 % 2 == 1;
        if !blink_off {
            self.circle(
                f64::from(player.pos.x),
                f64::from(player.pos.y),
                f64::from(player.size / 2.0),
                tint_color(player.tint(now)),
            )?;
        }

        for chaser in &state.chasers {
            self.draw_chaser(chaser, now, settings.show_ai_labels)?;
        }
        for key in &state.collectibles {
            self.draw_key(f64::from(key.pos.x), f64::from(key.pos.y), f64::from(key.size))?;
        }
        self.draw_hud(state)?;
        for c in &state.crates {
            self.draw_crate(f64::from(c.pos.x), f64::from(c.pos.y));
        }

        if state.paused {
            let ctx = &self.ctx;
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            ctx.fill_rect(0.0, 0.0, self.width, self.height);
            ctx.set_fill_style_str("white");
            ctx.set_font("60px monospace");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text("PAUSED", self.width / 2.0, self.height / 2.0)?;
        }
        Ok(())
    }

    fn draw_mud(&self, mud: &MudPatch) -> Result<(), JsValue> {
        let (x, y) = (f64::from(mud.pos.x), f64::from(mud.pos.y));
        self.circle(x, y, f64::from(mud.size / 2.0), MUD_BASE)?;
        for spot in &mud.spots {
            let sx = x + f64::from(spot.angle.cos() * spot.dist);
            let sy = y + f64::from(spot.angle.sin() * spot.dist);
            self.circle(sx, sy, f64::from(spot.size / 2.0), MUD_SPOT)?;
        }
        for shine in &mud.shine {
            let sx = x + f64::from(shine.angle.cos() * shine.dist);
            let sy = y + f64::from(shine.angle.sin() * shine.dist);
            self.circle(sx, sy, f64::from(mud.size / 8.0), MUD_SHINE)?;
        }
        Ok(())
    }

    /// Green square with rolling eyes, or its AI number in debug mode
    fn draw_chaser(&self, chaser: &Chaser, now: f64, labels: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (f64::from(chaser.pos.x), f64::from(chaser.pos.y));
        let size = f64::from(chaser.size);
        ctx.set_fill_style_str(CHASER_GREEN);
        ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);

        if labels {
            ctx.set_fill_style_str("white");
            ctx.set_font("12px monospace");
            ctx.set_text_align("left");
            ctx.set_text_baseline("alphabetic");
            ctx.fill_text(&chaser.ai.number().to_string(), x - 4.0, y + 4.0)?;
            return Ok(());
        }

        let eye_dx = size / 4.0;
        let eye_dy = -size / 4.0;
        let eye_r = size / 8.0;
        let pupil_r = size / 16.0;
        let roll = (now / 250.0 + x / 100.0 + y / 100.0) % TAU;
        let pupil_off = eye_r / 2.0;
        for ex in [x - eye_dx, x + eye_dx] {
            let ey = y + eye_dy;
            self.circle(ex, ey, eye_r, "white")?;
            self.circle(
                ex + roll.cos() * pupil_off,
                ey + roll.sin() * pupil_off,
                pupil_r,
                "black",
            )?;
        }
        Ok(())
    }

    fn draw_key(&self, x: f64, y: f64, size: f64) -> Result<(), JsValue> {
        self.circle(x, y, size / 3.0, KEY_GOLD)?;
        let shaft_w = size / 4.0;
        self.ctx.fill_rect(x, y - shaft_w / 2.0, size, shaft_w);
        self.ctx
            .fill_rect(x + size, y - shaft_w / 2.0, shaft_w, shaft_w);
        Ok(())
    }

    fn draw_crate(&self, x: f64, y: f64) {
        let ctx = &self.ctx;
        let half = f64::from(CRATE_SIZE) / 2.0;
        ctx.set_fill_style_str(CRATE_WOOD);
        ctx.fill_rect(x - half, y - half, half * 2.0, half * 2.0);

        // Planks
        ctx.set_stroke_style_str(CRATE_GRAIN);
        ctx.set_line_width(2.0);
        for i in -2..=2 {
            let ly = y + f64::from(i) * 5.0;
            ctx.begin_path();
            ctx.move_to(x - half, ly);
            ctx.line_to(x + half, ly);
            ctx.stroke();
        }
        ctx.begin_path();
        ctx.move_to(x - half, y - half);
        ctx.line_to(x - half, y + half);
        ctx.move_to(x + half, y - half);
        ctx.line_to(x + half, y + half);
        ctx.stroke();

        // Lightning bolt with a soft glow pass
        let size = f64::from(CRATE_SIZE);
        ctx.set_stroke_style_str(BOLT_BLUE);
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(x, y - size / 3.0);
        ctx.line_to(x + size / 4.0, y);
        ctx.line_to(x - size / 4.0, y);
        ctx.line_to(x, y + size / 3.0);
        ctx.stroke();
        ctx.set_stroke_style_str(BOLT_GLOW);
        ctx.set_line_width(6.0);
        ctx.stroke();
    }

    fn draw_hud(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_font("30px monospace");
        ctx.set_text_baseline("alphabetic");
        ctx.set_text_align("left");
        ctx.set_fill_style_str("yellow");
        for i in 0..PLAYER_LIVES {
            let heart = if i < state.player.lives { "♥" } else { "♡" };
            ctx.fill_text(heart, 20.0 + f64::from(i) * 35.0, 40.0)?;
        }

        ctx.set_fill_style_str("white");
        ctx.set_text_align("right");
        ctx.fill_text(&format!("Score: {}", state.score), self.width - 20.0, 40.0)?;
        Ok(())
    }

    fn render_game_over(&self, scores: &HighScoreBoard) -> Result<(), JsValue> {
        self.clear("black");
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        ctx.set_fill_style_str("red");
        ctx.set_font("80px monospace");
        ctx.fill_text("GAME OVER", cx, cy)?;

        if let Some(best) = scores.last_result {
            ctx.set_fill_style_str("white");
            ctx.set_font("40px monospace");
            ctx.fill_text(&format!("High Score: {best}"), cx, cy + 80.0)?;
        }
        Ok(())
    }
}
