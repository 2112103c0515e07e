//! Draws a [`GameState`] back to front
//!
//! Sky, far hills, near hills, walls, enemies, player, ground, then HUD and
//! overlays. World coordinates are scaled independently on each axis to fit
//! the buffer.

use std::f32::consts::TAU;

use super::pixel_buf::{PixelBuf, Rgb, draw_number, number_width};
use crate::config::Config;
use crate::consts::GROUND_PATTERN_WIDTH;
use crate::sim::{Aabb, BackgroundLayer, GamePhase, GameState, LayerKind};

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const WALL_DARK: Rgb = Rgb(0, 100, 0);
const WALL: Rgb = Rgb(34, 139, 34);
const WALL_HI: Rgb = Rgb(100, 190, 60);
const ENEMY: Rgb = Rgb(200, 50, 60);
const ENEMY_DARK: Rgb = Rgb(130, 25, 35);
const BIRD: Rgb = Rgb(245, 200, 66);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const EYE: Rgb = Rgb(255, 255, 255);
const PUPIL: Rgb = Rgb(20, 20, 20);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(220, 195, 120);

/// Maps world pixels onto buffer pixels
#[derive(Debug, Clone, Copy)]
struct Viewport {
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(config: &Config, buf: &PixelBuf) -> Self {
        Self {
            sx: buf.width() as f32 / config.screen_width,
            sy: buf.height() as f32 / config.screen_height,
        }
    }

    fn x(&self, wx: f32) -> i32 {
        (wx * self.sx).round() as i32
    }

    fn y(&self, wy: f32) -> i32 {
        (wy * self.sy).round() as i32
    }

    fn fill(&self, buf: &mut PixelBuf, rect: &Aabb, c: Rgb) {
        let x0 = self.x(rect.min.x);
        let y0 = self.y(rect.min.y);
        let x1 = self.x(rect.max.x).max(x0 + 1);
        let y1 = self.y(rect.max.y).max(y0 + 1);
        buf.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
    }
}

/// Render a full frame of the game into `buf`
pub fn draw(buf: &mut PixelBuf, state: &GameState, config: &Config) {
    if buf.width() == 0 || buf.height() < 2 {
        return;
    }
    let view = Viewport::new(config, buf);

    draw_sky(buf, &view, config);
    for layer in &state.layers {
        match layer.kind {
            LayerKind::FarHills => draw_hills(buf, &view, config, layer, HILL_FAR, [3.0, 5.0], 70.0),
            LayerKind::NearHills => draw_hills(buf, &view, config, layer, HILL_NEAR, [4.0, 7.0], 40.0),
            LayerKind::Ground => {}
        }
    }
    draw_obstacles(buf, &view, state);
    draw_enemies(buf, &view, state);
    draw_player(buf, &view, state);
    if let Some(ground) = state.layers.iter().find(|l| l.kind == LayerKind::Ground) {
        draw_ground(buf, &view, config, ground);
    }

    draw_number(buf, buf.width() as i32 / 2, 2, state.score, WHITE, SHADOW);
    draw_best(buf, state.best);

    match state.phase {
        GamePhase::Start => draw_title(buf, state.time_ticks),
        GamePhase::GameOver => draw_game_over(buf, state),
        GamePhase::Playing => {}
    }
}

fn draw_sky(buf: &mut PixelBuf, view: &Viewport, config: &Config) {
    let sky_h = view.y(config.sky_height()).max(1);
    for y in 0..sky_h {
        let t = (y as u32 * 256 / sky_h as u32).min(256) as u16;
        buf.fill_rect(0, y, buf.width() as i32, 1, Rgb::lerp(SKY_TOP, SKY_BOT, t));
    }
}

/// Rolling hills whose profile repeats every `screen_width`, so wrapping the
/// layer offset never shows a seam
fn draw_hills(
    buf: &mut PixelBuf,
    view: &Viewport,
    config: &Config,
    layer: &BackgroundLayer,
    colour: Rgb,
    harmonics: [f32; 2],
    height: f32,
) {
    let base = config.sky_height();
    for x in 0..buf.width() as i32 {
        let wx = x as f32 / view.sx + layer.offset;
        let phase = wx / layer.tile_width * TAU;
        let profile = 0.6 + 0.25 * (phase * harmonics[0]).sin() + 0.15 * (phase * harmonics[1]).sin();
        let top = view.y(base - height * profile);
        buf.fill_rect(x, top, 1, view.y(base) - top, colour);
    }
}

fn draw_obstacles(buf: &mut PixelBuf, view: &Viewport, state: &GameState) {
    for obstacle in &state.obstacles {
        for wall in [obstacle.top_wall(), obstacle.bottom_wall()] {
            if wall.is_empty() {
                continue;
            }
            view.fill(buf, &wall, WALL);
            // Highlight stripe and dark rim, like a lit pipe
            let stripe = Aabb::new(
                glam::Vec2::new(wall.min.x + wall.size().x * 0.2, wall.min.y),
                glam::Vec2::new(wall.min.x + wall.size().x * 0.35, wall.max.y),
            );
            view.fill(buf, &stripe, WALL_HI);
            let x0 = view.x(wall.min.x);
            let x1 = view.x(wall.max.x) - 1;
            let y0 = view.y(wall.min.y);
            let y1 = view.y(wall.max.y);
            buf.fill_rect(x0, y0, 1, y1 - y0, WALL_DARK);
            buf.fill_rect(x1, y0, 1, y1 - y0, WALL_DARK);
        }
        // Rim at the mouth of each wall
        let mouth_top = view.y(obstacle.gap_top()) - 1;
        let mouth_bot = view.y(obstacle.gap_bottom());
        let x0 = view.x(obstacle.x);
        let w = view.x(obstacle.right()) - x0;
        buf.fill_rect(x0, mouth_top, w, 1, WALL_DARK);
        buf.fill_rect(x0, mouth_bot, w, 1, WALL_DARK);
    }
}

fn draw_enemies(buf: &mut PixelBuf, view: &Viewport, state: &GameState) {
    for enemy in &state.enemies {
        let bounds = enemy.bounds();
        view.fill(buf, &bounds.shrink(enemy.size * 0.1), ENEMY);
        // Flapping wings above and below the body
        let flap = if (enemy.bob_phase * 4.0).sin() > 0.0 { 0.0 } else { enemy.size * 0.1 };
        let wing = Aabb::new(
            glam::Vec2::new(bounds.min.x + enemy.size * 0.3, bounds.min.y + flap),
            glam::Vec2::new(bounds.max.x - enemy.size * 0.3, bounds.min.y + enemy.size * 0.2 + flap),
        );
        view.fill(buf, &wing, ENEMY_DARK);
        let ex = view.x(bounds.min.x + enemy.size * 0.25);
        let ey = view.y(bounds.min.y + enemy.size * 0.35);
        buf.set(ex, ey, EYE);
        buf.set(ex + 1, ey, PUPIL);
    }
}

fn draw_player(buf: &mut PixelBuf, view: &Viewport, state: &GameState) {
    let player = &state.player;
    let body = player.bounds();
    let s = player.size;
    view.fill(buf, &body.shrink(s * 0.08), BIRD);

    // Wing beats every few ticks while climbing
    let wing_up = player.vel < 0.0 && state.time_ticks % 8 < 4;
    let wing_y = if wing_up { body.min.y + s * 0.3 } else { body.min.y + s * 0.5 };
    let wing = Aabb::new(
        glam::Vec2::new(body.min.x + s * 0.1, wing_y),
        glam::Vec2::new(body.min.x + s * 0.5, wing_y + s * 0.25),
    );
    view.fill(buf, &wing, BIRD_WING);

    let beak = Aabb::new(
        glam::Vec2::new(body.max.x - s * 0.1, body.min.y + s * 0.45),
        glam::Vec2::new(body.max.x + s * 0.15, body.min.y + s * 0.65),
    );
    view.fill(buf, &beak, BIRD_BEAK);

    let ex = view.x(body.max.x - s * 0.3);
    let ey = view.y(body.min.y + s * 0.25);
    buf.set(ex, ey, EYE);
    buf.set(ex + 1, ey, PUPIL);
}

fn draw_ground(buf: &mut PixelBuf, view: &Viewport, config: &Config, layer: &BackgroundLayer) {
    let gy = view.y(config.sky_height());
    let w = buf.width() as i32;
    for x in 0..w {
        let wx = x as f32 / view.sx + layer.offset;
        let band = (wx / (GROUND_PATTERN_WIDTH / 2.0)) as i32 % 2 == 0;
        buf.set(x, gy, if band { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
        for y in (gy + 2)..buf.height() as i32 {
            let stripe = ((wx * view.sx) as i32 + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

/// Best score, right-aligned in the top corner
fn draw_best(buf: &mut PixelBuf, best: u32) {
    let width = number_width(best);
    let left = buf.width() as i32 - 2 - width;
    draw_number(buf, left + width / 2, 2, best, BIRD, SHADOW);
}

/// The start prompt shows for two thirds of every second
fn prompt_visible(time_ticks: u64) -> bool {
    time_ticks % 60 < 40
}

fn draw_title(buf: &mut PixelBuf, time_ticks: u64) {
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 4;
    let letters = 6;
    let char_w = (buf.width() as i32 / 20).max(3);
    let char_h = (buf.height() as i32 / 10).max(4);
    let sx = cx - letters * char_w / 2;
    for i in 0..letters {
        let bx = sx + i * char_w;
        buf.fill_rect(bx + 1, cy + 1, char_w - 1, char_h, SHADOW);
        buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD);
    }
    // Blinking "press to start" bar
    if prompt_visible(time_ticks) {
        let bar_w = letters * char_w * 2 / 3;
        buf.fill_rect(cx - bar_w / 2, cy + char_h + 4, bar_w, 2, WHITE);
    }
}

fn draw_game_over(buf: &mut PixelBuf, state: &GameState) {
    buf.dim();

    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;
    let panel_w = (buf.width() as i32 / 3).max(20);
    let panel_h = 18;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

    draw_number(buf, cx, py + 3, state.score, WHITE, SHADOW);
    draw_number(buf, cx, py + 10, state.best, BIRD, SHADOW);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_draw_every_phase() {
        let config = Config::default();
        let mut state = GameState::new(11, &config);
        let mut buf = PixelBuf::new(80, 48);

        draw(&mut buf, &state, &config);
        // Top-left is sky
        assert_eq!(buf.get(0, 0), SKY_TOP);

        let flap = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &config, &flap, crate::consts::SIM_DT);
        for _ in 0..200 {
            tick(&mut state, &config, &TickInput::default(), crate::consts::SIM_DT);
            draw(&mut buf, &state, &config);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        draw(&mut buf, &state, &config);
    }

    #[test]
    fn test_draw_tiny_buffer_does_not_panic() {
        let config = Config::default();
        let state = GameState::new(1, &config);
        for (w, h) in [(0, 0), (1, 1), (1, 2), (3, 4)] {
            let mut buf = PixelBuf::new(w, h);
            draw(&mut buf, &state, &config);
        }
    }

    #[test]
    fn test_player_is_drawn() {
        let config = Config::default();
        let state = GameState::new(1, &config);
        let mut buf = PixelBuf::new(160, 120);
        draw(&mut buf, &state, &config);
        let view = Viewport::new(&config, &buf);
        let c = state.player.pos;
        // Body colour somewhere in the lower half of the bird
        let x = view.x(c.x - 10.0) as usize;
        let y = view.y(c.y + 15.0) as usize;
        assert_eq!(buf.get(x, y), BIRD);
    }

    #[test]
    fn test_best_shown_during_play() {
        let config = Config::default();
        let mut state = GameState::new(1, &config);
        state.phase = GamePhase::Playing;
        state.best = 7;
        let mut buf = PixelBuf::new(80, 48);
        draw(&mut buf, &state, &config);
        // Top row of the 7 glyph, right-aligned two pixels from the edge
        for x in 75..78 {
            assert_eq!(buf.get(x, 2), BIRD);
        }
    }

    #[test]
    fn test_start_prompt_blinks() {
        let config = Config::default();
        let mut state = GameState::new(1, &config);
        let mut buf = PixelBuf::new(80, 48);
        let cx = 40;
        let bar_y = (48 / 4 + (48 / 10).max(4) + 4) as usize;

        state.time_ticks = 10;
        assert!(prompt_visible(state.time_ticks));
        draw(&mut buf, &state, &config);
        assert_eq!(buf.get(cx, bar_y), WHITE);

        state.time_ticks = 50;
        assert!(!prompt_visible(state.time_ticks));
        draw(&mut buf, &state, &config);
        assert_ne!(buf.get(cx, bar_y), WHITE);
    }
}
