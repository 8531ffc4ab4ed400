mod particles;

use anyhow::anyhow;
use clap::Parser;
use line_2d::Coord;
use particles::ParticleOverlay;
use rand::{SeedableRng, rngs::StdRng};
use sdl2::{
    event::Event,
    keyboard::Keycode,
    pixels::{Color, PixelFormatEnum},
    rect::Rect,
    render::Canvas,
    surface::Surface,
    video::Window,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};
use vibewave_audio::AudioEngine;
use vibewave_core::{
    AnimationClock, Mood, ToastKind, ToastSlot, WaveDims, WavePoint,
    classify, tracked_point, volatility, wave_points,
};
use vibewave_export::{
    InitialConfig, MoodSnapshot, parse_query, share::valid_frequency,
    share::valid_volatility, share_url, write_history_json, write_snapshot,
};
use vibewave_history::{SessionRecorder, SessionSnapshot};
use vibewave_persist::PersistData;

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);
const TITLE_REFRESH: Duration = Duration::from_secs(1);
const SHARE_BASE_URL: &str = "https://vibewave.app";
const WINDOW_KEY: &str = "vibewave";

#[derive(Parser)]
struct Args {
    /// Starting mood (euphoric, optimistic, neutral, pessimistic, despair)
    #[arg(long)]
    mood: Option<String>,
    /// Starting wave frequency, accepted if strictly between 0 and 10
    #[arg(long)]
    freq: Option<f32>,
    /// Starting volatility, accepted if between 0 and 1
    #[arg(long)]
    vol: Option<f32>,
    /// Share link to restore state from; explicit flags take precedence
    #[arg(long)]
    share: Option<String>,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 280)]
    height: u32,
    /// Start with audio muted
    #[arg(long)]
    mute: bool,
    /// Start with the particle overlay disabled
    #[arg(long)]
    no_particles: bool,
    /// Directory snapshot/history/frame exports are written into
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
struct WindowPosition {
    x: i32,
    y: i32,
}

impl PersistData for WindowPosition {
    const NAME: &'static str = "window_position";
}

fn initial_config(args: &Args) -> InitialConfig {
    let mut config = args
        .share
        .as_deref()
        .map(parse_query)
        .unwrap_or_default();
    // Flags use the same validation rules as the share link: invalid values
    // are silently dropped.
    if let Some(mood) = args.mood.as_deref().and_then(|s| s.parse().ok()) {
        config.mood = mood;
    }
    if let Some(frequency) = args.freq {
        if valid_frequency(frequency) {
            config.frequency = frequency;
        }
    }
    if let Some(vol) = args.vol {
        if valid_volatility(vol) {
            config.volatility = vol;
        }
    }
    config
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn wall_clock() -> String {
    let secs = epoch_ms() / 1000 % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn mood_color(mood: Mood) -> Color {
    let hex = mood.color().trim_start_matches('#');
    let channel = |i: usize| {
        u8::from_str_radix(hex.get(i..i + 2).unwrap_or("ff"), 16)
            .unwrap_or(0xff)
    };
    Color::RGB(channel(0), channel(2), channel(4))
}

fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::RGB(0x16, 0xa3, 0x4a),
        ToastKind::Error => Color::RGB(0xdc, 0x26, 0x26),
        ToastKind::Info => Color::RGB(0x25, 0x63, 0xeb),
    }
}

fn print_help() {
    println!("VIBEWAVE CONTROLS");
    println!("  space  randomize mood and wave");
    println!("  p      pause/resume");
    println!("  r      reset the cycle");
    println!("  1-5    preset moods (euphoric..despair)");
    println!("  m      toggle audio");
    println!("  h      show mood history statistics");
    println!("  d      dump full history to a JSON file");
    println!("  c      clear mood history");
    println!("  x      export the current mood as JSON");
    println!("  e      export the current frame as BMP");
    println!("  s      copy a share link to the clipboard");
    println!("  v      toggle the particle overlay");
    println!("  ?      this help");
}

fn print_statistics(recorder: &SessionRecorder) {
    let Some(stats) = recorder.statistics() else {
        println!("MOOD_HISTORY: no sessions recorded yet");
        return;
    };
    println!("MOOD_HISTORY");
    println!("  sessions:       {}", stats.total_sessions);
    println!("  total time:     {}s", stats.total_time_ms / 1000);
    println!(
        "  avg volatility: {:.0}%",
        stats.avg_volatility * 100.0
    );
    println!("  avg frequency:  {:.1}x", stats.avg_frequency);
    println!("  dominant mood:  {}", stats.dominant_mood);
    for mood_count in &stats.distribution {
        println!(
            "    {:<12} {:>3} ({}%)",
            mood_count.mood.to_string(),
            mood_count.count,
            mood_count.percentage
        );
    }
}

fn draw_wave(
    canvas: &mut Canvas<Window>,
    points: &[WavePoint],
    color: Color,
) {
    canvas.set_draw_color(color);
    let mut coord_iter = points.iter().map(|point| Coord {
        x: point.x as i32,
        y: point.y as i32,
    });
    let Some(mut prev) = coord_iter.next() else {
        return;
    };
    for coord in coord_iter {
        for Coord { x, y } in line_2d::coords_between(prev, coord) {
            let _ = canvas.fill_rect(Rect::new(x, y, 2, 2));
        }
        prev = coord;
    }
}

fn export_frame(
    canvas: &Canvas<Window>,
    dir: &Path,
    mood: Mood,
    timestamp_ms: u64,
) -> anyhow::Result<PathBuf> {
    let (width, height) = canvas.output_size().map_err(|e| anyhow!(e))?;
    let mut pixels = canvas
        .read_pixels(None, PixelFormatEnum::RGB24)
        .map_err(|e| anyhow!(e))?;
    let surface = Surface::from_data(
        &mut pixels,
        width,
        height,
        width * 3,
        PixelFormatEnum::RGB24,
    )
    .map_err(|e| anyhow!(e))?;
    // No text rendering in this window, so the annotation lives in the file
    // name.
    let path = dir.join(format!(
        "vibewave-frame-{}-{}.bmp",
        mood, timestamp_ms
    ));
    surface.save_bmp(&path).map_err(|e| anyhow!(e))?;
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = initial_config(&args);
    let dims = WaveDims {
        width: args.width as f32,
        center_y: args.height as f32 / 2.0,
        amplitude: args.height as f32 / 2.8,
        wave_length: args.width as f32,
    };
    let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
    let mut window_builder =
        video_subsystem.window("VIBEWAVE", args.width, args.height);
    window_builder.always_on_top();
    if let Some(WindowPosition { x, y }) = WindowPosition::load_(WINDOW_KEY) {
        window_builder.position(x, y);
    }
    let window = window_builder.build()?;
    let mut canvas = window
        .into_canvas()
        .target_texture()
        .present_vsync()
        .build()?;
    canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
    let clipboard = video_subsystem.clipboard();
    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;

    let mut rng = StdRng::from_os_rng();
    let mut clock = AnimationClock::new();
    // A mood arriving via flag or share link starts the clock on that
    // mood's preset; a bare launch starts from the canonical defaults.
    let mood_requested = args
        .mood
        .as_deref()
        .and_then(|s| s.parse::<Mood>().ok())
        .is_some()
        || args
            .share
            .as_deref()
            .is_some_and(|s| parse_query(s).mood != InitialConfig::default().mood);
    if mood_requested {
        clock.set_preset(config.mood, &mut rng);
    }
    if (config.frequency - 1.0).abs() > f32::EPSILON {
        let mut state = clock.state();
        state.frequency = config.frequency;
        clock = AnimationClock::with_state(state);
    }
    let mut recorder = SessionRecorder::load(Instant::now(), epoch_ms());
    let audio = match AudioEngine::new() {
        Ok(audio) => {
            audio.set_enabled(!args.mute);
            Some(audio)
        }
        Err(e) => {
            log::warn!("audio init failed, continuing silent: {}", e);
            None
        }
    };

    let mut points: Vec<WavePoint> = Vec::new();
    let mut toast = ToastSlot::new();
    let mut overlay = ParticleOverlay::new(Instant::now());
    let mut particles_on = !args.no_particles;
    let mut current_mood = config.mood;
    let mut current_volatility = config.volatility;
    let mut last_title_refresh = Instant::now() - TITLE_REFRESH;
    let mut prev_tick_complete = Instant::now();

    'main_loop: loop {
        let now = Instant::now();
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => match keycode {
                    Keycode::Space => {
                        clock.randomize(&mut rng);
                        toast.show("WAVE_RANDOMIZED", ToastKind::Info, now);
                    }
                    Keycode::P => clock.toggle_pause(),
                    Keycode::R => {
                        clock.reset();
                        toast.show("CYCLE_RESET", ToastKind::Info, now);
                    }
                    Keycode::Num1
                    | Keycode::Num2
                    | Keycode::Num3
                    | Keycode::Num4
                    | Keycode::Num5 => {
                        let index = match keycode {
                            Keycode::Num1 => 0,
                            Keycode::Num2 => 1,
                            Keycode::Num3 => 2,
                            Keycode::Num4 => 3,
                            _ => 4,
                        };
                        let mood = Mood::ALL[index];
                        clock.set_preset(mood, &mut rng);
                        toast.show(mood.style().label, ToastKind::Info, now);
                    }
                    Keycode::Slash => print_help(),
                    Keycode::M => match &audio {
                        Some(audio) => {
                            let enabled = !audio.is_enabled();
                            audio.set_enabled(enabled);
                            toast.show(
                                if enabled { "AUDIO_ON" } else { "AUDIO_OFF" },
                                ToastKind::Info,
                                now,
                            );
                        }
                        None => toast.show(
                            "AUDIO_UNAVAILABLE",
                            ToastKind::Error,
                            now,
                        ),
                    },
                    Keycode::H => print_statistics(&recorder),
                    Keycode::D => match recorder
                        .export_json()
                        .and_then(|json| {
                            write_history_json(
                                &args.export_dir,
                                &json,
                                epoch_ms(),
                            )
                        }) {
                        Ok(path) => {
                            log::info!(
                                "history written to {}",
                                path.display()
                            );
                            toast.show(
                                "HISTORY_EXPORTED",
                                ToastKind::Success,
                                now,
                            );
                        }
                        Err(e) => {
                            log::warn!("history export failed: {}", e);
                            toast.show(
                                "HISTORY_EXPORT_FAILED",
                                ToastKind::Error,
                                now,
                            );
                        }
                    },
                    Keycode::C => {
                        recorder.clear();
                        toast.show("HISTORY_CLEARED", ToastKind::Info, now);
                    }
                    Keycode::X => {
                        let snapshot = MoodSnapshot::capture(
                            current_mood,
                            clock.state(),
                            current_volatility,
                            &points,
                            epoch_ms(),
                        );
                        match write_snapshot(&args.export_dir, &snapshot) {
                            Ok(path) => {
                                log::info!(
                                    "snapshot written to {}",
                                    path.display()
                                );
                                toast.show(
                                    "SNAPSHOT_SAVED",
                                    ToastKind::Success,
                                    now,
                                );
                            }
                            Err(e) => {
                                log::warn!("snapshot export failed: {}", e);
                                toast.show(
                                    "SNAPSHOT_FAILED",
                                    ToastKind::Error,
                                    now,
                                );
                            }
                        }
                    }
                    Keycode::E => {
                        match export_frame(
                            &canvas,
                            &args.export_dir,
                            current_mood,
                            epoch_ms(),
                        ) {
                            Ok(path) => {
                                log::info!(
                                    "frame written to {}",
                                    path.display()
                                );
                                toast.show(
                                    "FRAME_SAVED",
                                    ToastKind::Success,
                                    now,
                                );
                            }
                            Err(e) => {
                                log::warn!("frame export failed: {}", e);
                                toast.show(
                                    "FRAME_EXPORT_FAILED",
                                    ToastKind::Error,
                                    now,
                                );
                            }
                        }
                    }
                    Keycode::S => {
                        let url = share_url(
                            SHARE_BASE_URL,
                            current_mood,
                            clock.state().frequency,
                            current_volatility,
                        );
                        match clipboard.set_clipboard_text(&url) {
                            Ok(()) => toast.show(
                                "LINK_COPIED",
                                ToastKind::Success,
                                now,
                            ),
                            Err(e) => {
                                log::warn!("clipboard copy failed: {}", e);
                                toast.show(
                                    "COPY_FAILED",
                                    ToastKind::Error,
                                    now,
                                );
                            }
                        }
                    }
                    Keycode::V => {
                        particles_on = !particles_on;
                        if !particles_on {
                            overlay.clear();
                        }
                    }
                    _ => (),
                },
                _ => (),
            }
        }

        // State progression happens strictly before anything derived from it
        // is recomputed.
        clock.tick();
        let state = clock.state();
        wave_points(state.time, state.frequency, dims, &mut points);
        current_volatility = volatility(&points, dims.amplitude);
        let dot = tracked_point(state.time, &points).unwrap_or(WavePoint {
            x: 0.0,
            y: dims.center_y,
        });
        current_mood = classify(dot.y, current_volatility, dims);
        // Quantize volatility for change detection so frame-to-frame jitter
        // doesn't re-arm the debounce forever.
        recorder.observe(
            SessionSnapshot {
                mood: current_mood,
                frequency: state.frequency,
                volatility: (current_volatility * 10.0).round() / 10.0,
            },
            now,
        );
        recorder.poll(now, epoch_ms());
        if let Some(audio) = &audio {
            audio.set_voice(current_mood, state.frequency, current_volatility);
        }

        let color = mood_color(current_mood);
        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.set_draw_color(Color::RGB(0x20, 0x20, 0x20));
        let _ = canvas.fill_rect(Rect::new(
            0,
            dims.center_y as i32,
            args.width,
            1,
        ));
        draw_wave(&mut canvas, &points, color);
        canvas.set_draw_color(Color::RGB(0xff, 0xff, 0xff));
        let _ = canvas.fill_rect(Rect::new(
            dot.x as i32 - 3,
            dot.y as i32 - 3,
            6,
            6,
        ));
        overlay.update(
            dot.x,
            dot.y,
            current_mood.intensity() * current_volatility.max(0.2),
            particles_on,
            now,
        );
        overlay.draw(&mut canvas, color);
        if let Some(visible) = toast.current(now) {
            canvas.set_draw_color(toast_color(visible.kind));
            let _ = canvas.fill_rect(Rect::new(0, 0, args.width, 6));
        }
        canvas.present();

        if now.duration_since(last_title_refresh) >= TITLE_REFRESH {
            last_title_refresh = now;
            let status = format!(
                "VIBEWAVE [{}] {} f={:.1} v={:.0}%{}",
                wall_clock(),
                current_mood.style().label,
                state.frequency,
                current_volatility * 100.0,
                if clock.is_paused() { " [PAUSED]" } else { "" },
            );
            let _ = canvas.window_mut().set_title(&status);
        }

        if let Some(period_to_sleep) = (prev_tick_complete + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
        prev_tick_complete = Instant::now();
    }

    let (x, y) = canvas.window().position();
    WindowPosition { x, y }.save_(WINDOW_KEY);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(
            std::iter::once("vibewave").chain(extra.iter().copied()),
        )
    }

    #[test]
    fn flags_override_share_link() {
        let parsed = args(&[
            "--share",
            "https://vibewave.app?mood=despair&freq=2.8",
            "--mood",
            "euphoric",
        ]);
        let config = initial_config(&parsed);
        assert_eq!(config.mood, Mood::Euphoric);
        assert_eq!(config.frequency, 2.8);
    }

    #[test]
    fn invalid_flags_are_silently_ignored() {
        let parsed =
            args(&["--mood", "grumpy", "--freq", "15", "--vol", "2"]);
        let config = initial_config(&parsed);
        assert_eq!(config, InitialConfig::default());
    }

    #[test]
    fn mood_colors_parse_to_rgb() {
        let color = mood_color(Mood::Despair);
        assert_eq!((color.r, color.g, color.b), (0xef, 0x44, 0x44));
    }

    #[test]
    fn wall_clock_formats_as_hh_mm_ss() {
        let clock = wall_clock();
        assert_eq!(clock.len(), 8);
        assert_eq!(clock.as_bytes()[2], b':');
        assert_eq!(clock.as_bytes()[5], b':');
    }
}
