use arboard::Clipboard;
use gridcaster::{CellCode, Config, EventLog, Frame, InputEvent, Movement, RayHit, Simulation};
use macroquad::prelude::*;
use std::path::Path;

/// Never run more than this many ticks per rendered frame
const MAX_TICKS_PER_DRAW: u32 = 5;

const COLOR_EMPTY: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const COLOR_RAYS: Color = Color::new(247.0 / 255.0, 220.0 / 255.0, 111.0 / 255.0, 1.0);
const COLOR_PLAYER: Color = Color::new(0.0, 0.0, 1.0, 1.0);
const COLOR_FLOOR: Color = Color::new(213.0 / 255.0, 43.0 / 255.0, 30.0 / 255.0, 1.0);
const COLOR_CEILING: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const COLOR_CROSSHAIR: Color = Color::new(28.0 / 255.0, 40.0 / 255.0, 51.0 / 255.0, 1.0);
const COLOR_CROSSHAIR_CENTER: Color = Color::new(146.0 / 255.0, 43.0 / 255.0, 33.0 / 255.0, 1.0);

/// Minimap color for a wall cell
fn minimap_color(code: CellCode) -> Option<Color> {
    match code {
        0 => None,
        1 => Some(Color::new(0.5, 0.5, 0.5, 1.0)),
        _ => Some(Color::new(0.0, 0.0, 0.0, 1.0)),
    }
}

/// Wall color for a ray hit; vertical hits use the darker shade
fn wall_color(ray: &RayHit) -> Option<Color> {
    let color = match (ray.code?, ray.is_vertical()) {
        (0, _) => return None,
        (1, false) => Color::from_rgba(0x01, 0x3a, 0xa6, 255),
        (1, true) => Color::from_rgba(0x01, 0x29, 0x75, 255),
        (_, false) => Color::from_rgba(0x00, 0x80, 0x00, 255),
        (_, true) => Color::from_rgba(0x00, 0x64, 0x00, 255),
    };
    Some(color)
}

fn is_shift_down() -> bool {
    is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift)
}

/// Viewer state: owns the simulation and acts as its scheduler, input and renderer
struct ViewerState {
    sim: Simulation,
    config: Config,
    event_log: Option<EventLog>,
    last_frame: Option<Frame>,
    tick_accumulator: f32,
    last_mouse_x: Option<f32>,
    cursor_grabbed: bool,
    status_timer: f32,
    ticks_since_status: u32,
}

impl ViewerState {
    fn new(config: Config, sim: Simulation) -> Self {
        let event_log = if config.logging.record_events {
            Some(EventLog::new())
        } else {
            None
        };

        ViewerState {
            sim,
            config,
            event_log,
            last_frame: None,
            tick_accumulator: 0.0,
            last_mouse_x: None,
            cursor_grabbed: false,
            status_timer: 0.0,
            ticks_since_status: 0,
        }
    }

    /// Apply an input event, recording it if enabled
    fn send(&mut self, event: InputEvent) {
        if let Some(log) = &mut self.event_log {
            log.log(self.sim.frames_run(), event.clone());
        }
        event.apply(&mut self.sim);
    }

    fn handle_input(&mut self) {
        let walk = self.config.player.walk_speed;
        let speed = if is_shift_down() {
            walk * self.config.player.sprint_multiplier
        } else {
            walk
        };

        let bindings = [
            (KeyCode::W, Movement::Forward, speed),
            (KeyCode::Z, Movement::Forward, speed),
            (KeyCode::S, Movement::Backward, -speed),
            (KeyCode::A, Movement::StrafeLeft, speed),
            (KeyCode::Q, Movement::StrafeLeft, speed),
            (KeyCode::D, Movement::StrafeRight, speed),
        ];

        for (key, movement, speed) in bindings {
            if is_key_pressed(key) {
                self.send(InputEvent::SetMovement { movement, speed });
            }
        }
        if bindings.iter().any(|(key, _, _)| is_key_released(*key)) {
            self.send(InputEvent::Stop);
        }

        let (mouse_x, _) = mouse_position();
        if let Some(last_x) = self.last_mouse_x {
            let dx = mouse_x - last_x;
            if dx != 0.0 {
                let delta = dx.to_radians() * self.config.player.mouse_sensitivity;
                self.send(InputEvent::Rotate { delta });
            }
        }
        self.last_mouse_x = Some(mouse_x);

        if is_key_pressed(KeyCode::Space) {
            self.send(InputEvent::ResetPose);
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            self.send(InputEvent::ClearFacingCell);
        }

        if is_key_pressed(KeyCode::Tab) {
            self.cursor_grabbed = !self.cursor_grabbed;
            set_cursor_grab(self.cursor_grabbed);
            show_mouse(!self.cursor_grabbed);
        }

        if is_key_pressed(KeyCode::C) {
            self.copy_to_clipboard();
        }
    }

    /// Run as many fixed-period ticks as the elapsed time allows
    fn update(&mut self, elapsed: f32) {
        let tick = self.config.render.tick_ms.max(1) as f32 / 1000.0;
        self.tick_accumulator += elapsed;

        let columns = screen_width().max(0.0) as usize;
        let height = screen_height();

        let mut ticks = 0;
        while self.tick_accumulator >= tick && ticks < MAX_TICKS_PER_DRAW {
            self.tick_accumulator -= tick;
            let frame = self.sim.frame(columns, height);
            if let Some((x, y)) = frame.cleared {
                println!("Cleared cell ({}, {})", x, y);
            }
            self.last_frame = Some(frame);
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_DRAW {
            // drop the backlog instead of spiralling
            self.tick_accumulator = 0.0;
        }

        self.ticks_since_status += ticks;
        self.status_timer += elapsed;
        if self.status_timer >= 1.0 {
            if self.config.logging.verbose {
                let player = self.sim.player();
                println!(
                    "ticks/s: {:.1} pos: ({:.1}, {:.1}) angle: {:.2}",
                    self.ticks_since_status as f32 / self.status_timer,
                    player.x,
                    player.y,
                    player.angle
                );
            }
            self.status_timer = 0.0;
            self.ticks_since_status = 0;
        }
    }

    fn draw(&self) {
        clear_background(COLOR_EMPTY);

        if let Some(frame) = &self.last_frame {
            self.draw_scene(frame);
            self.draw_minimap(frame);
        }
    }

    fn draw_scene(&self, frame: &Frame) {
        for (i, (ray, column)) in frame.rays.iter().zip(&frame.columns).enumerate() {
            let x = i as f32;
            if let Some(color) = wall_color(ray) {
                draw_rectangle(x, column.wall_top, 1.0, column.wall_height(), color);
            }
            draw_rectangle(x, column.wall_bottom, 1.0, column.floor_height(), COLOR_FLOOR);
            draw_rectangle(x, 0.0, 1.0, column.ceiling_height(), COLOR_CEILING);
        }

        let scale = self.config.render.crosshair_scale;
        let (cx, cy) = (screen_width() / 2.0, screen_height() / 2.0);
        draw_rectangle(cx - scale, cy - 2.0 * scale, scale, 3.0 * scale, COLOR_CROSSHAIR);
        draw_rectangle(cx - 2.0 * scale, cy - scale, 3.0 * scale, scale, COLOR_CROSSHAIR);
        draw_rectangle(cx - scale, cy - scale, scale, scale, COLOR_CROSSHAIR_CENTER);
    }

    fn draw_minimap(&self, frame: &Frame) {
        let scale = self.config.render.minimap_scale;
        let grid = self.sim.grid();
        let player = self.sim.player();
        let cell_size = grid.cell_size * scale;

        // cells
        for (y, row) in grid.rows_iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                if let Some(color) = minimap_color(code) {
                    draw_rectangle(x as f32 * cell_size, y as f32 * cell_size, cell_size, cell_size, color);
                }
            }
        }

        // rays
        let origin = (player.x, player.y);
        for ray in &frame.rays {
            let (end_x, end_y) = ray.end_point(origin);
            if !end_x.is_finite() || !end_y.is_finite() {
                continue;
            }
            draw_line(origin.0 * scale, origin.1 * scale, end_x * scale, end_y * scale, 1.0, COLOR_RAYS);
        }

        // player
        let half = player.size / 2.0;
        draw_rectangle(player.x * scale - half, player.y * scale - half, player.size, player.size, COLOR_PLAYER);

        // heading
        let length = player.size * 2.0;
        draw_line(
            player.x * scale,
            player.y * scale,
            (player.x + player.angle.cos() * length) * scale,
            (player.y + player.angle.sin() * length) * scale,
            1.0,
            COLOR_PLAYER,
        );
    }

    fn copy_to_clipboard(&self) {
        let map_text = self.sim.grid().to_text();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(map_text) {
                    println!("Failed to copy to clipboard: {}", e);
                } else {
                    println!("Map copied to clipboard!");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save_event_log(&mut self) {
        let frames_run = self.sim.frames_run();
        if let Some(log) = &mut self.event_log {
            log.finish(frames_run);
            let path = Path::new(&self.config.logging.event_log_path);
            match log.save_to_file(path) {
                Ok(()) => println!("Saved {} events to {}", log.events().len(), path.display()),
                Err(e) => eprintln!("Failed to save event log: {:#}", e),
            }
        }
    }
}

#[macroquad::main("Gridcaster")]
async fn main() {
    let config = Config::load();
    let sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return;
        }
    };

    let mut state = ViewerState::new(config, sim);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.handle_input();
        state.update(get_frame_time());
        state.draw();

        next_frame().await
    }

    state.save_event_log();
}
