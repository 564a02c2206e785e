//! Desktop preview for curio-led-engine
//!
//! Loads a device configuration, drives every strand into a window and sends
//! light commands through the command queue, the same way the HTTP and
//! pub/sub layers do on the device.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use clap::Parser;
use curio_led_engine::{
    Color, CommandQueue, DeviceConfig, DriverError, LightCommand, LightController, OutputDriver,
    strand::lock_strand,
};
use eframe::egui;
use log::{error, info, warn};

/// Command queue size
const COMMAND_QUEUE_SIZE: usize = 16;

/// Queue between the UI and the controller
static COMMANDS: CommandQueue<COMMAND_QUEUE_SIZE> = CommandQueue::<COMMAND_QUEUE_SIZE>::new();

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

#[derive(Parser, Debug)]
#[command(version, about = "Preview LED strand animations in a window")]
struct Args {
    /// Device configuration file
    #[arg(default_value = "config.yaml")]
    config: PathBuf,

    /// Mode to start instead of the configured default
    #[arg(short, long)]
    mode: Option<String>,
}

/// Last frame flushed to one strand.
type FrameBuffer = Arc<Mutex<Vec<Color>>>;

/// Output driver keeping the last flushed frame for the window.
struct WindowDriver {
    frame: FrameBuffer,
}

impl OutputDriver for WindowDriver {
    fn write(&mut self, colors: &[Color]) -> Result<(), DriverError> {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        frame.clear();
        frame.extend_from_slice(colors);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = DeviceConfig::load(&args.config).inspect_err(|err| {
        error!("Failed to load {}: {err}", args.config.display());
    })?;
    info!(
        "Loaded {} strands from {}",
        config.strands.len(),
        args.config.display()
    );

    let app = PreviewApp::new(config, args.mode.as_deref())?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("Curio LED Preview"),
        ..Default::default()
    };
    eframe::run_native(
        "curio-led-preview",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )?;
    Ok(())
}

fn send(command: LightCommand) {
    if let Err(err) = COMMANDS.push(command) {
        warn!("{err}");
    }
}

struct PreviewApp {
    controller: LightController,
    /// Strand names and their flushed frames, in configuration order
    frames: Vec<(String, FrameBuffer)>,

    // UI state
    color: [u8; 3],
    payload: String,
    animate_strand: String,
    animate_spec: String,
    led_size: f32,
}

impl PreviewApp {
    fn new(config: DeviceConfig, mode: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let buffers: Vec<FrameBuffer> = config
            .strands
            .values()
            .map(|strand| Arc::new(Mutex::new(vec![Color::BLACK; strand.size])))
            .collect();
        let drivers = buffers
            .iter()
            .map(|frame| {
                Box::new(WindowDriver {
                    frame: Arc::clone(frame),
                }) as Box<dyn OutputDriver + Send>
            })
            .collect();

        let mut controller = LightController::new(config, drivers)?;
        match mode {
            Some(mode) => controller.switch_mode(mode)?,
            None => controller.start()?,
        }

        let frames = controller
            .strands()
            .iter()
            .map(|strand| lock_strand(strand).name().to_owned())
            .zip(buffers)
            .collect::<Vec<_>>();
        let animate_strand = frames
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        Ok(Self {
            controller,
            frames,
            color: [255, 180, 100],
            payload: String::new(),
            animate_strand,
            animate_spec: "rainbow, fast".to_owned(),
            led_size: LED_SIZE,
        })
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Mode:");
            let mut selected = self.controller.current_mode().to_owned();
            egui::ComboBox::from_id_salt("mode_selector")
                .selected_text(selected.as_str())
                .show_ui(ui, |ui| {
                    for mode in self.controller.modes() {
                        ui.selectable_value(&mut selected, mode.clone(), mode.as_str());
                    }
                });
            if selected != self.controller.current_mode() {
                send(LightCommand::SwitchMode(selected));
            }

            ui.add_space(8.0);
            if ui.button("Clear").clicked() {
                send(LightCommand::Clear);
            }
            if ui.button("Stop").clicked() {
                send(LightCommand::StopAll);
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Color:");
            if ui.color_edit_button_srgb(&mut self.color).changed() {
                let [r, g, b] = self.color;
                send(LightCommand::SetColor(Color::new(r, g, b)));
            }

            ui.add_space(8.0);
            ui.label("Payload:");
            let response = ui.text_edit_singleline(&mut self.payload);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                if let Some(command) = LightCommand::decode(&self.payload) {
                    send(command);
                }
                self.payload.clear();
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Animate:");
            egui::ComboBox::from_id_salt("strand_selector")
                .selected_text(self.animate_strand.as_str())
                .show_ui(ui, |ui| {
                    for (name, _) in &self.frames {
                        ui.selectable_value(&mut self.animate_strand, name.clone(), name.as_str());
                    }
                });
            ui.text_edit_singleline(&mut self.animate_spec);
            if ui.button("Run").clicked() {
                send(LightCommand::Animate {
                    strand: self.animate_strand.clone(),
                    pixels: None,
                    spec: self.animate_spec.clone(),
                });
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
        });
    }

    fn strands(&self, ui: &mut egui::Ui) {
        let led_pitch = self.led_size + LED_GAP;

        for (name, buffer) in &self.frames {
            let frame = buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            ui.label(format!("{name} ({} LEDs)", frame.len()));

            let available_width = ui.available_width();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = frame.len().div_ceil(leds_per_row).max(1);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in frame.iter().enumerate() {
                let row = i / leds_per_row;
                let col = i % leds_per_row;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let color = egui::Color32::from_rgb(pixel.r(), pixel.g(), pixel.b());
                painter.rect_filled(rect, 3.0, color);
            }

            ui.add_space(8.0);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.process_pending(&COMMANDS);

        // Generations draw from their own threads
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.controls(ui);
            ui.add_space(8.0);
            ui.label(self.controller.status());
            if let Some(generation) = self.controller.generation() {
                ui.label(format!(
                    "Generation {}: {} animations, running for {:.1}s",
                    generation.id,
                    generation.animations.len(),
                    generation.started_at.elapsed().as_secs_f32()
                ));
            }
            ui.add_space(16.0);
            self.strands(ui);
        });
    }
}
